//! Diesel schema for notification persistence.

diesel::table! {
    /// Notification records.
    notifications (id) {
        /// Notification identifier.
        id -> Uuid,
        /// Insertion sequence, used to order equal timestamps.
        position -> Int8,
        /// Receiving user.
        recipient_id -> Uuid,
        /// Acting user.
        sender_id -> Uuid,
        /// Stored notification kind.
        #[max_length = 20]
        kind -> Varchar,
        /// Linked issue.
        issue_id -> Nullable<Uuid>,
        /// Linked comment.
        comment_id -> Nullable<Uuid>,
        /// Linked chat room.
        room_id -> Nullable<Uuid>,
        /// Rendered text.
        text -> Text,
        /// Read flag.
        is_read -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
