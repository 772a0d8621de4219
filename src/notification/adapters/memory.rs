//! In-memory notification repository.

use crate::account::domain::UserId;
use crate::notification::{
    domain::{Notification, NotificationId},
    ports::{NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory notification repository.
///
/// Records are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationRepository {
    records: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> NotificationRepositoryError {
    NotificationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn append(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        if records.iter().any(|stored| stored.id() == notification.id()) {
            return Err(NotificationRepositoryError::Duplicate(notification.id()));
        }
        records.push(notification.clone());
        Ok(())
    }

    async fn find(&self, id: NotificationId) -> NotificationRepositoryResult<Option<Notification>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.iter().find(|stored| stored.id() == id).cloned())
    }

    async fn list_for_recipient(
        &self,
        recipient: UserId,
    ) -> NotificationRepositoryResult<Vec<Notification>> {
        let records = self.records.read().map_err(poisoned)?;
        // Reverse insertion order breaks ties between equal timestamps.
        let mut listed: Vec<Notification> = records
            .iter()
            .rev()
            .filter(|stored| stored.recipient() == recipient)
            .cloned()
            .collect();
        listed.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(listed)
    }

    async fn unread_count(&self, recipient: UserId) -> NotificationRepositoryResult<u64> {
        let records = self.records.read().map_err(poisoned)?;
        let unread = records
            .iter()
            .filter(|stored| stored.recipient() == recipient && !stored.is_read())
            .count();
        Ok(u64::try_from(unread).unwrap_or(u64::MAX))
    }

    async fn set_read(&self, id: NotificationId) -> NotificationRepositoryResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        let stored = records
            .iter_mut()
            .find(|stored| stored.id() == id)
            .ok_or(NotificationRepositoryError::NotFound(id))?;
        stored.mark_read();
        Ok(())
    }

    async fn mark_all_read(&self, recipient: UserId) -> NotificationRepositoryResult<u64> {
        let mut records = self.records.write().map_err(poisoned)?;
        let changed = records
            .iter_mut()
            .filter(|stored| stored.recipient() == recipient)
            .filter_map(|stored| stored.mark_read().then_some(()))
            .count();
        Ok(u64::try_from(changed).unwrap_or(u64::MAX))
    }
}
