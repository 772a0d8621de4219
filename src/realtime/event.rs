//! Outbound socket events.
//!
//! Every event serialises to a small JSON object carrying a `type`
//! discriminator; issue updates add an `action` discriminator.

use crate::{
    account::domain::UserId,
    chat::domain::{ChatMessageId, RoomId},
    issue::domain::{IssueId, IssueStatus},
    notification::domain::{Notification, NotificationId, NotificationKind},
    social::domain::CommentId,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Event pushed to subscribers of a channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum OutboundEvent {
    /// A message posted to a chat room.
    #[serde(rename = "chat.message")]
    ChatMessage(ChatMessagePayload),
    /// A notification for the channel's recipient.
    #[serde(rename = "notification_message")]
    Notification(NotificationPayload),
    /// Acknowledges a mark-read request on the notification socket.
    #[serde(rename = "notification_marked_read")]
    NotificationMarkedRead {
        /// The notification that was marked read.
        notification_id: NotificationId,
    },
    /// A change to an issue.
    #[serde(rename = "issue_update")]
    IssueUpdate(IssueUpdate),
    /// Rejection of an inbound frame, sent only to the originating socket.
    #[serde(rename = "error")]
    Error {
        /// Human-readable reason.
        message: String,
    },
}

/// Chat message broadcast body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessagePayload {
    /// Persisted message identifier.
    pub message_id: ChatMessageId,
    /// Room the message was posted to.
    pub room_id: RoomId,
    /// Message text.
    pub message: String,
    /// Sending user.
    pub sender_id: UserId,
    /// Sending user's login name.
    pub sender_username: String,
    /// Optional attachment URL.
    pub file_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Notification push body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    /// Persisted notification identifier.
    pub id: NotificationId,
    /// Notification category.
    pub notification_type: NotificationKind,
    /// User whose action triggered the notification.
    pub sender_id: UserId,
    /// Rendered text.
    pub text: String,
    /// Linked issue, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<IssueId>,
    /// Linked comment, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<CommentId>,
    /// Linked chat room, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationPayload {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id(),
            notification_type: notification.kind(),
            sender_id: notification.sender(),
            text: notification.text().to_owned(),
            issue_id: notification.issue(),
            comment_id: notification.comment(),
            room_id: notification.room(),
            created_at: notification.created_at(),
        }
    }
}

/// Comment body carried by issue updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentPayload {
    /// Comment identifier.
    pub comment_id: CommentId,
    /// Thread root when the comment is a reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
    /// Author's login name.
    pub username: String,
    /// Comment text.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Issue channel update, discriminated by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum IssueUpdate {
    /// A comment or reply was posted.
    NewComment(CommentPayload),
    /// The issue's like set changed.
    LikeUpdate {
        /// User who toggled the like.
        user_id: UserId,
        /// Whether the user now likes the issue.
        liked: bool,
        /// Like count after the toggle.
        like_count: u64,
    },
    /// The resolution status changed.
    StatusChanged {
        /// Status after the change.
        status: IssueStatus,
        /// Leader resolution flag.
        is_leader_resolved: bool,
        /// Citizen confirmation flag.
        is_user_confirmed: bool,
    },
    /// The issue was flagged.
    Flagged {
        /// Flag count after the change.
        flag_count: u64,
    },
}
