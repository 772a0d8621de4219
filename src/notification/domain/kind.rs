//! Notification categories.

use super::ParseNotificationKindError;
use serde::{Deserialize, Serialize};

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone followed the recipient.
    Follow,
    /// Someone liked the recipient's issue or comment.
    Like,
    /// Someone commented on the recipient's issue or replied to their comment.
    Comment,
    /// Someone mentioned the recipient in a comment.
    Mention,
    /// An issue the recipient leads was confirmed solved.
    IssueUpdate,
    /// The recipient's issue changed resolution status.
    StatusChange,
    /// Someone sent the recipient a chat message.
    Message,
}

impl NotificationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Mention => "mention",
            Self::IssueUpdate => "issue_update",
            Self::StatusChange => "status_change",
            Self::Message => "message",
        }
    }
}

impl TryFrom<&str> for NotificationKind {
    type Error = ParseNotificationKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "follow" => Ok(Self::Follow),
            "like" => Ok(Self::Like),
            "comment" => Ok(Self::Comment),
            "mention" => Ok(Self::Mention),
            "issue_update" => Ok(Self::IssueUpdate),
            "status_change" => Ok(Self::StatusChange),
            "message" => Ok(Self::Message),
            _ => Err(ParseNotificationKindError(value.to_owned())),
        }
    }
}
