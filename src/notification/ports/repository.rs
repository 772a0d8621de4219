//! Repository port for notification records.

use crate::account::domain::UserId;
use crate::notification::domain::{Notification, NotificationId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification repository operations.
pub type NotificationRepositoryResult<T> = Result<T, NotificationRepositoryError>;

/// Notification persistence contract.
///
/// Records are append-only apart from the read flag.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Appends a new notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationRepositoryError::Duplicate`] when the
    /// identifier already exists.
    async fn append(&self, notification: &Notification) -> NotificationRepositoryResult<()>;

    /// Finds a notification by identifier.
    async fn find(&self, id: NotificationId) -> NotificationRepositoryResult<Option<Notification>>;

    /// Returns a recipient's notifications, newest first.
    async fn list_for_recipient(
        &self,
        recipient: UserId,
    ) -> NotificationRepositoryResult<Vec<Notification>>;

    /// Counts a recipient's unread notifications.
    async fn unread_count(&self, recipient: UserId) -> NotificationRepositoryResult<u64>;

    /// Sets the read flag on one notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationRepositoryError::NotFound`] for unknown
    /// identifiers.
    async fn set_read(&self, id: NotificationId) -> NotificationRepositoryResult<()>;

    /// Marks every notification of `recipient` read and returns how many
    /// changed.
    async fn mark_all_read(&self, recipient: UserId) -> NotificationRepositoryResult<u64>;
}

/// Errors returned by notification repository implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationRepositoryError {
    /// A notification with the same identifier already exists.
    #[error("duplicate notification identifier: {0}")]
    Duplicate(NotificationId),

    /// The notification was not found.
    #[error("notification not found: {0}")]
    NotFound(NotificationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
