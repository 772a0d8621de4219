//! Error types for notification domain validation.

use crate::account::domain::UserId;
use thiserror::Error;

/// Errors returned while constructing notifications.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationDomainError {
    /// The actor and the recipient are the same user.
    #[error("user {0} cannot notify themselves")]
    SelfNotification(UserId),

    /// The rendered text is empty.
    #[error("notification text must not be empty")]
    EmptyText,
}

/// Error returned while parsing notification kinds from storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown notification type: {0}")]
pub struct ParseNotificationKindError(pub String);
