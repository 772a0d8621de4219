//! Repository port for chat rooms and messages.

use crate::account::domain::UserId;
use crate::chat::domain::{ChatMessage, ChatMessageId, ChatRoom, RoomId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for chat repository operations.
pub type ChatRepositoryResult<T> = Result<T, ChatRepositoryError>;

/// Chat persistence contract.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Stores a new room.
    async fn store_room(&self, room: &ChatRoom) -> ChatRepositoryResult<()>;

    /// Replaces a stored room.
    ///
    /// # Errors
    ///
    /// Returns [`ChatRepositoryError::RoomNotFound`] for unknown rooms.
    async fn update_room(&self, room: &ChatRoom) -> ChatRepositoryResult<()>;

    /// Finds a room by identifier.
    async fn find_room(&self, id: RoomId) -> ChatRepositoryResult<Option<ChatRoom>>;

    /// Finds the direct room between two users.
    async fn find_direct_room(&self, a: UserId, b: UserId)
    -> ChatRepositoryResult<Option<ChatRoom>>;

    /// Returns the rooms `user` participates in, most recently active
    /// first.
    async fn rooms_for(&self, user: UserId) -> ChatRepositoryResult<Vec<ChatRoom>>;

    /// Appends a message and records the activity on its room in one
    /// write.
    ///
    /// # Errors
    ///
    /// Returns [`ChatRepositoryError::RoomNotFound`] for unknown rooms.
    async fn append_message(&self, message: &ChatMessage) -> ChatRepositoryResult<()>;

    /// Returns a room's messages, oldest first.
    async fn messages_in(&self, room: RoomId) -> ChatRepositoryResult<Vec<ChatMessage>>;

    /// Returns a room's newest message.
    async fn latest_message(&self, room: RoomId) -> ChatRepositoryResult<Option<ChatMessage>>;

    /// Counts the messages in `room` that `user` has not read.
    async fn unread_count(&self, room: RoomId, user: UserId) -> ChatRepositoryResult<u64>;

    /// Marks every message in `room` read by `user`; returns how many
    /// changed.
    async fn mark_room_read(&self, room: RoomId, user: UserId) -> ChatRepositoryResult<u64>;
}

/// Errors returned by chat repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ChatRepositoryError {
    /// A room with the same identifier already exists.
    #[error("duplicate chat room identifier: {0}")]
    DuplicateRoom(RoomId),

    /// A message with the same identifier already exists.
    #[error("duplicate chat message identifier: {0}")]
    DuplicateMessage(ChatMessageId),

    /// The room was not found.
    #[error("chat room not found: {0}")]
    RoomNotFound(RoomId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ChatRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
