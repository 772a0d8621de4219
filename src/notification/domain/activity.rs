//! Social actions that may produce a notification.

use super::{NotificationKind, NotificationLinks};
use crate::account::domain::UserId;
use crate::chat::domain::RoomId;
use crate::issue::domain::IssueId;
use crate::social::domain::CommentId;

/// What happened, with the context needed to render and link the
/// notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    /// The actor followed the recipient.
    Followed,
    /// The actor liked the recipient's issue.
    IssueLiked {
        /// Liked issue.
        issue: IssueId,
    },
    /// The actor liked the recipient's comment.
    CommentLiked {
        /// Issue the comment belongs to.
        issue: IssueId,
        /// Liked comment.
        comment: CommentId,
    },
    /// The actor commented on the recipient's issue.
    IssueCommented {
        /// Commented issue.
        issue: IssueId,
        /// New comment.
        comment: CommentId,
    },
    /// The actor replied to the recipient's comment.
    CommentReplied {
        /// Issue the thread belongs to.
        issue: IssueId,
        /// New reply.
        comment: CommentId,
    },
    /// The actor mentioned the recipient in a comment.
    Mentioned {
        /// Issue the comment belongs to.
        issue: IssueId,
        /// Comment carrying the mention.
        comment: CommentId,
    },
    /// The tagged leader marked the recipient's issue resolved.
    LeaderResolved {
        /// Resolved issue.
        issue: IssueId,
        /// Issue title.
        title: String,
    },
    /// The reporter confirmed the resolution of an issue the recipient leads.
    ReporterConfirmed {
        /// Solved issue.
        issue: IssueId,
        /// Issue title.
        title: String,
    },
    /// The actor sent a message to a room the recipient participates in.
    ChatMessage {
        /// Room the message was posted to.
        room: RoomId,
    },
}

impl ActivityEvent {
    /// Returns the notification category for the event.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::Followed => NotificationKind::Follow,
            Self::IssueLiked { .. } | Self::CommentLiked { .. } => NotificationKind::Like,
            Self::IssueCommented { .. } | Self::CommentReplied { .. } => NotificationKind::Comment,
            Self::Mentioned { .. } => NotificationKind::Mention,
            Self::LeaderResolved { .. } => NotificationKind::StatusChange,
            Self::ReporterConfirmed { .. } => NotificationKind::IssueUpdate,
            Self::ChatMessage { .. } => NotificationKind::Message,
        }
    }

    /// Returns the records the notification links to.
    #[must_use]
    pub const fn links(&self) -> NotificationLinks {
        match *self {
            Self::Followed => NotificationLinks::none(),
            Self::IssueLiked { issue }
            | Self::LeaderResolved { issue, .. }
            | Self::ReporterConfirmed { issue, .. } => NotificationLinks::issue(issue),
            Self::CommentLiked { issue, comment }
            | Self::IssueCommented { issue, comment }
            | Self::CommentReplied { issue, comment }
            | Self::Mentioned { issue, comment } => NotificationLinks::comment(issue, comment),
            Self::ChatMessage { room } => NotificationLinks::room(room),
        }
    }

    /// Returns the `minijinja` template for the notification text.
    ///
    /// Templates receive `sender` and, for resolution events, `title`.
    #[must_use]
    pub const fn template(&self) -> &'static str {
        match self {
            Self::Followed => "{{ sender }} started following you.",
            Self::IssueLiked { .. } => "{{ sender }} liked your issue.",
            Self::CommentLiked { .. } => "{{ sender }} liked your comment.",
            Self::IssueCommented { .. } => "{{ sender }} commented on your issue.",
            Self::CommentReplied { .. } => "{{ sender }} replied to your comment.",
            Self::Mentioned { .. } => "{{ sender }} mentioned you in a comment.",
            Self::LeaderResolved { .. } => {
                "{{ sender }} marked your issue \"{{ title }}\" as resolved. Please confirm the fix."
            }
            Self::ReporterConfirmed { .. } => {
                "{{ sender }} confirmed that \"{{ title }}\" is solved."
            }
            Self::ChatMessage { .. } => "{{ sender }} sent you a message.",
        }
    }

    /// Returns the issue title carried by resolution events.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::LeaderResolved { title, .. } | Self::ReporterConfirmed { title, .. } => {
                Some(title.as_str())
            }
            _ => None,
        }
    }
}

/// A social action performed by `actor` that concerns `recipient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    actor: UserId,
    recipient: UserId,
    event: ActivityEvent,
}

impl Activity {
    /// Describes an action by `actor` that concerns `recipient`.
    #[must_use]
    pub const fn new(actor: UserId, recipient: UserId, event: ActivityEvent) -> Self {
        Self {
            actor,
            recipient,
            event,
        }
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn actor(&self) -> UserId {
        self.actor
    }

    /// Returns the user to notify.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        self.recipient
    }

    /// Returns the event.
    #[must_use]
    pub const fn event(&self) -> &ActivityEvent {
        &self.event
    }

    /// Returns whether the actor would be notifying themselves.
    #[must_use]
    pub fn is_self_directed(&self) -> bool {
        self.actor == self.recipient
    }
}
