//! Chat message entity.

use super::{ChatDomainError, ChatMessageId, RoomId};
use crate::account::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A message posted to a room.
///
/// The sender is always among the readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: ChatMessageId,
    room: RoomId,
    sender: UserId,
    content: String,
    file_url: Option<String>,
    read_by: BTreeSet<UserId>,
    created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a message read by its sender.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::EmptyMessage`] when the trimmed content
    /// is empty.
    pub fn post(
        room: RoomId,
        sender: UserId,
        content: &str,
        file_url: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, ChatDomainError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ChatDomainError::EmptyMessage);
        }
        Ok(Self {
            id: ChatMessageId::new(),
            room,
            sender,
            content: content.to_owned(),
            file_url: file_url
                .map(|url| url.trim().to_owned())
                .filter(|url| !url.is_empty()),
            read_by: BTreeSet::from([sender]),
            created_at: clock.utc(),
        })
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> ChatMessageId {
        self.id
    }

    /// Returns the room.
    #[must_use]
    pub const fn room(&self) -> RoomId {
        self.room
    }

    /// Returns the sender.
    #[must_use]
    pub const fn sender(&self) -> UserId {
        self.sender
    }

    /// Returns the text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the attachment URL, if any.
    #[must_use]
    pub fn file_url(&self) -> Option<&str> {
        self.file_url.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether `user` has read the message.
    #[must_use]
    pub fn is_read_by(&self, user: UserId) -> bool {
        self.read_by.contains(&user)
    }

    /// Records that `user` read the message; returns whether it was unread.
    pub fn mark_read_by(&mut self, user: UserId) -> bool {
        self.read_by.insert(user)
    }
}
