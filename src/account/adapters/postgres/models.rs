//! Diesel row models for account persistence.

use super::schema::{follows, profiles, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query and insert row for users.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Login name as registered.
    pub username: String,
    /// Case-folded login name.
    pub username_key: String,
    /// Optional email address.
    pub email: Option<String>,
    /// Registration timestamp.
    pub joined_at: DateTime<Utc>,
}

/// Query and insert row for profiles, without follow sets.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProfileRow {
    /// Owning user.
    pub user_id: uuid::Uuid,
    /// Display name.
    pub real_name: String,
    /// Contact address.
    pub contact_email: String,
    /// Free-text biography.
    pub bio: String,
    /// Reputation score.
    pub reputation: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for follow relations.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = follows)]
pub struct NewFollowRow {
    /// Following user.
    pub follower_id: uuid::Uuid,
    /// Followed user.
    pub followee_id: uuid::Uuid,
}
