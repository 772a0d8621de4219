//! In-memory chat repository.

use crate::account::domain::UserId;
use crate::chat::{
    domain::{ChatMessage, ChatMessageId, ChatRoom, RoomId},
    ports::{ChatRepository, ChatRepositoryError, ChatRepositoryResult},
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory chat repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatRepository {
    state: Arc<RwLock<InMemoryChatState>>,
}

#[derive(Debug, Default)]
struct InMemoryChatState {
    rooms: HashMap<RoomId, ChatRoom>,
    messages: HashMap<RoomId, Vec<ChatMessage>>,
    message_ids: HashSet<ChatMessageId>,
}

impl InMemoryChatState {
    fn room_messages(&self, room: RoomId) -> &[ChatMessage] {
        self.messages.get(&room).map_or(&[], Vec::as_slice)
    }
}

impl InMemoryChatRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> ChatRepositoryError {
    ChatRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn store_room(&self, room: &ChatRoom) -> ChatRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.rooms.contains_key(&room.id()) {
            return Err(ChatRepositoryError::DuplicateRoom(room.id()));
        }
        state.rooms.insert(room.id(), room.clone());
        Ok(())
    }

    async fn update_room(&self, room: &ChatRoom) -> ChatRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let stored = state
            .rooms
            .get_mut(&room.id())
            .ok_or(ChatRepositoryError::RoomNotFound(room.id()))?;
        *stored = room.clone();
        Ok(())
    }

    async fn find_room(&self, id: RoomId) -> ChatRepositoryResult<Option<ChatRoom>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.rooms.get(&id).cloned())
    }

    async fn find_direct_room(
        &self,
        a: UserId,
        b: UserId,
    ) -> ChatRepositoryResult<Option<ChatRoom>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut matches: Vec<&ChatRoom> = state
            .rooms
            .values()
            .filter(|room| room.is_direct_between(a, b))
            .collect();
        matches.sort_by_key(|room| room.created_at());
        Ok(matches.first().map(|room| (*room).clone()))
    }

    async fn rooms_for(&self, user: UserId) -> ChatRepositoryResult<Vec<ChatRoom>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut rooms: Vec<ChatRoom> = state
            .rooms
            .values()
            .filter(|room| room.is_participant(user))
            .cloned()
            .collect();
        rooms.sort_by(|left, right| right.updated_at().cmp(&left.updated_at()));
        Ok(rooms)
    }

    async fn append_message(&self, message: &ChatMessage) -> ChatRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.message_ids.contains(&message.id()) {
            return Err(ChatRepositoryError::DuplicateMessage(message.id()));
        }
        let room = state
            .rooms
            .get_mut(&message.room())
            .ok_or(ChatRepositoryError::RoomNotFound(message.room()))?;
        room.touch(message.created_at());
        state.message_ids.insert(message.id());
        state
            .messages
            .entry(message.room())
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn messages_in(&self, room: RoomId) -> ChatRepositoryResult<Vec<ChatMessage>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.room_messages(room).to_vec())
    }

    async fn latest_message(&self, room: RoomId) -> ChatRepositoryResult<Option<ChatMessage>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.room_messages(room).last().cloned())
    }

    async fn unread_count(&self, room: RoomId, user: UserId) -> ChatRepositoryResult<u64> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(count(
            state
                .room_messages(room)
                .iter()
                .filter(|message| !message.is_read_by(user))
                .count(),
        ))
    }

    async fn mark_room_read(&self, room: RoomId, user: UserId) -> ChatRepositoryResult<u64> {
        let mut state = self.state.write().map_err(poisoned)?;
        let Some(messages) = state.messages.get_mut(&room) else {
            return Ok(0);
        };
        Ok(count(
            messages
                .iter_mut()
                .filter_map(|message| message.mark_read_by(user).then_some(()))
                .count(),
        ))
    }
}
