//! Channel identities.

use crate::{account::domain::UserId, chat::domain::RoomId, issue::domain::IssueId};
use std::fmt;

/// Logical delivery group keyed by room, recipient or issue identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKey {
    /// Broadcast to every participant connected to a chat room.
    Room(RoomId),
    /// Notification stream of a single recipient.
    Notifications(UserId),
    /// Update stream for everyone viewing an issue.
    Issue(IssueId),
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Room(room) => write!(f, "chat_{room}"),
            Self::Notifications(user) => write!(f, "notifications_{user}"),
            Self::Issue(issue) => write!(f, "issue_{issue}"),
        }
    }
}
