//! Notification aggregate.

use super::{NotificationDomainError, NotificationId, NotificationKind};
use crate::account::domain::UserId;
use crate::chat::domain::RoomId;
use crate::issue::domain::IssueId;
use crate::social::domain::CommentId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Records a notification links to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationLinks {
    /// Linked issue.
    pub issue: Option<IssueId>,
    /// Linked comment.
    pub comment: Option<CommentId>,
    /// Linked chat room.
    pub room: Option<RoomId>,
}

impl NotificationLinks {
    /// No linked records.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            issue: None,
            comment: None,
            room: None,
        }
    }

    /// Links an issue.
    #[must_use]
    pub const fn issue(issue: IssueId) -> Self {
        Self {
            issue: Some(issue),
            comment: None,
            room: None,
        }
    }

    /// Links a comment and its issue.
    #[must_use]
    pub const fn comment(issue: IssueId, comment: CommentId) -> Self {
        Self {
            issue: Some(issue),
            comment: Some(comment),
            room: None,
        }
    }

    /// Links a chat room.
    #[must_use]
    pub const fn room(room: RoomId) -> Self {
        Self {
            issue: None,
            comment: None,
            room: Some(room),
        }
    }
}

/// A durable notice to one user about another user's action.
///
/// Notifications are append-only; only the read flag changes after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    recipient: UserId,
    sender: UserId,
    kind: NotificationKind,
    links: NotificationLinks,
    text: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedNotificationData {
    /// Persisted identifier.
    pub id: NotificationId,
    /// Receiving user.
    pub recipient: UserId,
    /// Acting user.
    pub sender: UserId,
    /// Notification category.
    pub kind: NotificationKind,
    /// Related records.
    pub links: NotificationLinks,
    /// Rendered text.
    pub text: String,
    /// Read flag.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Reconstructs a notification from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedNotificationData) -> Self {
        Self {
            id: data.id,
            recipient: data.recipient,
            sender: data.sender,
            kind: data.kind,
            links: data.links,
            text: data.text,
            is_read: data.is_read,
            created_at: data.created_at,
        }
    }

    /// Creates an unread notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationDomainError::SelfNotification`] when sender and
    /// recipient coincide and [`NotificationDomainError::EmptyText`] for
    /// blank text.
    pub fn new(
        recipient: UserId,
        sender: UserId,
        kind: NotificationKind,
        links: NotificationLinks,
        text: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, NotificationDomainError> {
        if recipient == sender {
            return Err(NotificationDomainError::SelfNotification(sender));
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(NotificationDomainError::EmptyText);
        }
        Ok(Self {
            id: NotificationId::new(),
            recipient,
            sender,
            kind,
            links,
            text,
            is_read: false,
            created_at: clock.utc(),
        })
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the notified user.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        self.recipient
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn sender(&self) -> UserId {
        self.sender
    }

    /// Returns the category.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Returns the linked issue, if any.
    #[must_use]
    pub const fn issue(&self) -> Option<IssueId> {
        self.links.issue
    }

    /// Returns the linked comment, if any.
    #[must_use]
    pub const fn comment(&self) -> Option<CommentId> {
        self.links.comment
    }

    /// Returns the linked chat room, if any.
    #[must_use]
    pub const fn room(&self) -> Option<RoomId> {
        self.links.room
    }

    /// Returns the rendered text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the recipient has read the notification.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the notification read; returns whether it was unread.
    pub const fn mark_read(&mut self) -> bool {
        let was_unread = !self.is_read;
        self.is_read = true;
        was_unread
    }
}
