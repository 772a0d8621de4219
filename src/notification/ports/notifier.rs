//! Outbound port used by other contexts to report activity.

use crate::account::{domain::UserId, ports::AccountRepositoryError};
use crate::notification::{
    domain::{Activity, Notification, NotificationDomainError},
    ports::NotificationRepositoryError,
};
use crate::realtime::{ChannelKey, OutboundEvent};
use async_trait::async_trait;
use thiserror::Error;

/// Result type for activity delivery.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Delivers activity to the users and channels it concerns.
#[async_trait]
pub trait ActivityNotifier: Send + Sync {
    /// Records a notification for the activity's recipient and pushes it
    /// live.
    ///
    /// Returns `None` when the activity is self-directed and was
    /// suppressed.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when the notification cannot be rendered
    /// or stored. Live delivery failures are never errors.
    async fn notify(&self, activity: Activity) -> NotifierResult<Option<Notification>>;

    /// Pushes an ephemeral event to a channel and returns the number of
    /// subscribers reached.
    fn announce(&self, channel: &ChannelKey, event: &OutboundEvent) -> usize;

    /// Ends `member`'s live subscriptions to `channel` after they lose
    /// access to it, returning the number ended.
    fn revoke(&self, channel: &ChannelKey, member: UserId) -> usize;
}

/// Errors raised while delivering activity.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The acting user does not exist.
    #[error("unknown activity sender: {0}")]
    UnknownSender(UserId),

    /// The notification text template failed to render.
    #[error("failed to render notification text: {0}")]
    Render(String),

    /// The notification failed validation.
    #[error(transparent)]
    Domain(#[from] NotificationDomainError),

    /// The sender lookup failed.
    #[error(transparent)]
    Account(#[from] AccountRepositoryError),

    /// The notification could not be stored.
    #[error(transparent)]
    Repository(#[from] NotificationRepositoryError),
}
