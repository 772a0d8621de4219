//! Diesel row models for issue persistence.

use super::schema::{hashtags, issue_hashtags, issues, leaders};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query and insert row for issue records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = issues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IssueRow {
    /// Issue identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Optional image URL.
    pub image_url: Option<String>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Reporting user.
    pub reporter_id: uuid::Uuid,
    /// Tagged leader.
    pub leader_id: uuid::Uuid,
    /// Derived status label.
    pub status: String,
    /// Leader confirmation flag.
    pub is_leader_resolved: bool,
    /// Reporter confirmation flag.
    pub is_user_confirmed: bool,
    /// Community flag counter.
    pub flag_count: i64,
    /// Users whose flag was counted.
    pub flagged_by: Vec<uuid::Uuid>,
    /// Optimistic concurrency version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query and insert row for leader records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = leaders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LeaderRow {
    /// Leader identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Office held.
    pub designation: String,
    /// Solved issue counter.
    pub solved_problems: i64,
    /// Profile picture URL.
    pub profile_picture: Option<String>,
    /// Linked login account.
    pub account_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query row for hashtag counters.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = hashtags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HashtagRow {
    /// Case-folded name.
    pub name: String,
    /// Number of distinct tagged issues.
    pub usage_count: i64,
}

/// Insert model for hashtag pairings.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = issue_hashtags)]
pub struct NewIssueHashtagRow {
    /// Hashtag name.
    pub hashtag: String,
    /// Tagged issue.
    pub issue_id: uuid::Uuid,
}
