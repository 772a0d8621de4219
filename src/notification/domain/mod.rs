//! Domain model for notifications.

mod activity;
mod error;
mod ids;
mod kind;
mod notification;

pub use activity::{Activity, ActivityEvent};
pub use error::{NotificationDomainError, ParseNotificationKindError};
pub use ids::NotificationId;
pub use kind::NotificationKind;
pub use notification::{Notification, NotificationLinks, PersistedNotificationData};
