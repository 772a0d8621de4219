//! Identifier types for notifications.

crate::id::uuid_id! {
    /// Unique notification identifier.
    NotificationId
}
