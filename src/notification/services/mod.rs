//! Notification orchestration services.

mod fanout;
mod inbox;

pub use fanout::NotificationFanout;
pub use inbox::{InboxService, InboxServiceError, InboxServiceResult, InboxSummary};
