//! Diesel row models for notification persistence.

use super::schema::notifications;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query and insert row for notifications.
///
/// The insertion sequence is assigned by the database and never written.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    /// Notification identifier.
    pub id: uuid::Uuid,
    /// Receiving user.
    pub recipient_id: uuid::Uuid,
    /// Acting user.
    pub sender_id: uuid::Uuid,
    /// Stored notification kind.
    pub kind: String,
    /// Linked issue.
    pub issue_id: Option<uuid::Uuid>,
    /// Linked comment.
    pub comment_id: Option<uuid::Uuid>,
    /// Linked chat room.
    pub room_id: Option<uuid::Uuid>,
    /// Rendered text.
    pub text: String,
    /// Read flag.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
