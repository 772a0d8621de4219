//! Recipient-facing notification operations.

use crate::account::domain::UserId;
use crate::notification::{
    domain::{Notification, NotificationId},
    ports::{NotificationRepository, NotificationRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Service-level errors for inbox operations.
#[derive(Debug, Clone, Error)]
pub enum InboxServiceError {
    /// The notification does not exist or belongs to another user.
    #[error("notification not found: {0}")]
    NotFound(NotificationId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] NotificationRepositoryError),
}

/// Result type for inbox operations.
pub type InboxServiceResult<T> = Result<T, InboxServiceError>;

/// A recipient's notifications and unread count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxSummary {
    /// Notifications, newest first.
    pub notifications: Vec<Notification>,
    /// Number of unread notifications.
    pub unread: u64,
}

/// Lists and acknowledges a recipient's notifications.
pub struct InboxService<N>
where
    N: NotificationRepository + ?Sized,
{
    notifications: Arc<N>,
}

impl<N> InboxService<N>
where
    N: NotificationRepository + ?Sized,
{
    /// Creates an inbox service.
    #[must_use]
    pub const fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }

    /// Returns the recipient's notifications and unread count.
    ///
    /// # Errors
    ///
    /// Returns [`InboxServiceError::Repository`] on persistence failure.
    pub async fn inbox(&self, recipient: UserId) -> InboxServiceResult<InboxSummary> {
        let notifications = self.notifications.list_for_recipient(recipient).await?;
        let unread = self.notifications.unread_count(recipient).await?;
        Ok(InboxSummary {
            notifications,
            unread,
        })
    }

    /// Marks one of the recipient's notifications read.
    ///
    /// # Errors
    ///
    /// Returns [`InboxServiceError::NotFound`] when the notification is
    /// unknown or addressed to someone else.
    pub async fn mark_read(
        &self,
        recipient: UserId,
        id: NotificationId,
    ) -> InboxServiceResult<()> {
        let notification = self
            .notifications
            .find(id)
            .await?
            .filter(|found| found.recipient() == recipient)
            .ok_or(InboxServiceError::NotFound(id))?;
        if notification.is_read() {
            return Ok(());
        }
        self.notifications.set_read(id).await?;
        debug!(notification = %id, recipient = %recipient, "notification marked read");
        Ok(())
    }

    /// Marks every notification of the recipient read.
    ///
    /// # Errors
    ///
    /// Returns [`InboxServiceError::Repository`] on persistence failure.
    pub async fn mark_all_read(&self, recipient: UserId) -> InboxServiceResult<u64> {
        Ok(self.notifications.mark_all_read(recipient).await?)
    }
}
