//! Ports for notification persistence and activity delivery.

mod notifier;
mod repository;

pub use notifier::{ActivityNotifier, NotifierError, NotifierResult};
pub use repository::{
    NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult,
};
