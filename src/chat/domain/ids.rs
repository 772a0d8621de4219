//! Identifier types for chat.

crate::id::uuid_id! {
    /// Unique chat room identifier.
    RoomId
}

crate::id::uuid_id! {
    /// Unique chat message identifier.
    ChatMessageId
}
