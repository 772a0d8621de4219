//! Room lifecycle, membership and messaging.

use crate::account::{
    domain::{User, UserId},
    ports::{AccountRepository, AccountRepositoryError},
};
use crate::chat::{
    domain::{ChatDomainError, ChatMessage, ChatRoom, RoomId},
    ports::{ChatRepository, ChatRepositoryError},
};
use crate::notification::{
    domain::{Activity, ActivityEvent},
    ports::{ActivityNotifier, NotifierError},
};
use crate::realtime::{ChannelKey, ChatMessagePayload, OutboundEvent};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

const GROUP_DISPLAY_NAME: &str = "Group Chat";
const FALLBACK_DISPLAY_NAME: &str = "Chat Room";

/// Request payload for creating a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoomRequest {
    participants: Vec<UserId>,
    is_group_chat: bool,
    name: Option<String>,
}

impl CreateRoomRequest {
    /// Requests a direct room with `other`.
    #[must_use]
    pub fn direct(other: UserId) -> Self {
        Self {
            participants: vec![other],
            is_group_chat: false,
            name: None,
        }
    }

    /// Requests a group room with `participants`.
    #[must_use]
    pub fn group(participants: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            participants: participants.into_iter().collect(),
            is_group_chat: true,
            name: None,
        }
    }

    /// Requests a room from raw parts.
    #[must_use]
    pub fn from_parts(participants: Vec<UserId>, is_group_chat: bool, name: Option<String>) -> Self {
        Self {
            participants,
            is_group_chat,
            name,
        }
    }

    /// Sets the group name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A room as listed for one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    /// The room.
    pub room: ChatRoom,
    /// Name shown to the viewer.
    pub display_name: String,
    /// Newest message, if any.
    pub latest: Option<ChatMessage>,
    /// Messages the viewer has not read.
    pub unread: u64,
}

/// A room opened by a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomView {
    /// The room.
    pub room: ChatRoom,
    /// Name shown to the viewer.
    pub display_name: String,
    /// Messages, oldest first.
    pub messages: Vec<ChatMessage>,
}

/// Service-level errors for chat operations.
#[derive(Debug, Clone, Error)]
pub enum ChatServiceError {
    /// The acting user is not registered.
    #[error("unknown user: {0}")]
    UnknownActor(UserId),

    /// A named user is not registered.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The room does not exist or the actor does not participate.
    #[error("chat room not found: {0}")]
    RoomNotFound(RoomId),

    /// Only the creator of a group room may change its membership.
    #[error("user {actor} cannot manage members of room {room}")]
    NotRoomManager {
        /// Room the actor tried to change.
        room: RoomId,
        /// Acting user.
        actor: UserId,
    },

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ChatDomainError),

    /// Chat persistence failed.
    #[error(transparent)]
    Repository(#[from] ChatRepositoryError),

    /// Account lookup failed.
    #[error(transparent)]
    Accounts(#[from] AccountRepositoryError),

    /// Notification delivery failed.
    #[error(transparent)]
    Notifier(#[from] NotifierError),
}

/// Result type for chat operations.
pub type ChatServiceResult<T> = Result<T, ChatServiceError>;

/// Chat orchestration service.
pub struct ChatService<R, A, N, C>
where
    R: ChatRepository + ?Sized,
    A: AccountRepository + ?Sized,
    N: ActivityNotifier + ?Sized,
    C: Clock + Send + Sync,
{
    chats: Arc<R>,
    accounts: Arc<A>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<R, A, N, C> ChatService<R, A, N, C>
where
    R: ChatRepository + ?Sized,
    A: AccountRepository + ?Sized,
    N: ActivityNotifier + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a chat service.
    #[must_use]
    pub const fn new(chats: Arc<R>, accounts: Arc<A>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            chats,
            accounts,
            notifier,
            clock,
        }
    }

    async fn user(&self, id: UserId) -> ChatServiceResult<Option<User>> {
        Ok(self.accounts.find_user(id).await?)
    }

    async fn actor(&self, id: UserId) -> ChatServiceResult<User> {
        self.user(id).await?.ok_or(ChatServiceError::UnknownActor(id))
    }

    /// Loads a room the actor participates in.
    async fn joined_room(&self, actor: UserId, room_id: RoomId) -> ChatServiceResult<ChatRoom> {
        self.chats
            .find_room(room_id)
            .await?
            .filter(|room| room.is_participant(actor))
            .ok_or(ChatServiceError::RoomNotFound(room_id))
    }

    /// Loads a room the actor may manage.
    async fn managed_room(&self, actor: UserId, room_id: RoomId) -> ChatServiceResult<ChatRoom> {
        let room = self
            .chats
            .find_room(room_id)
            .await?
            .ok_or(ChatServiceError::RoomNotFound(room_id))?;
        if !room.is_managed_by(actor) {
            return Err(ChatServiceError::NotRoomManager {
                room: room_id,
                actor,
            });
        }
        Ok(room)
    }

    async fn display_name(&self, room: &ChatRoom, viewer: UserId) -> ChatServiceResult<String> {
        if let Some(name) = room.name() {
            return Ok(name.to_owned());
        }
        if room.is_group_chat() {
            return Ok(GROUP_DISPLAY_NAME.to_owned());
        }
        let other = match room.other_participant(viewer) {
            Some(id) => self.user(id).await?,
            None => None,
        };
        Ok(other.map_or_else(
            || FALLBACK_DISPLAY_NAME.to_owned(),
            |user| user.username().as_str().to_owned(),
        ))
    }

    /// Returns whether `user` participates in the room.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::Repository`] on persistence failure.
    pub async fn is_participant(&self, user: UserId, room_id: RoomId) -> ChatServiceResult<bool> {
        Ok(self
            .chats
            .find_room(room_id)
            .await?
            .is_some_and(|room| room.is_participant(user)))
    }

    /// Creates a room, or returns the existing direct room between the
    /// actor and the single other participant.
    ///
    /// The flag in the result is `true` when a new room was created.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError`] for unknown users and invalid
    /// participant lists.
    pub async fn create_room(
        &self,
        actor: UserId,
        request: CreateRoomRequest,
    ) -> ChatServiceResult<(ChatRoom, bool)> {
        self.actor(actor).await?;
        for participant in &request.participants {
            if self.user(*participant).await?.is_none() {
                return Err(ChatServiceError::UserNotFound(*participant));
            }
        }

        let room = ChatRoom::open(
            actor,
            request.participants,
            request.is_group_chat,
            request.name,
            &*self.clock,
        )?;
        if let Some(other) = room.other_participant(actor) {
            if let Some(existing) = self.chats.find_direct_room(actor, other).await? {
                debug!(room = %existing.id(), "reusing direct room");
                return Ok((existing, false));
            }
        }

        self.chats.store_room(&room).await?;
        info!(
            room = %room.id(),
            creator = %actor,
            group = room.is_group_chat(),
            participants = room.participants().len(),
            "chat room created"
        );
        Ok((room, true))
    }

    /// Lists the actor's rooms, most recently active first.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::Repository`] on persistence failure.
    pub async fn rooms_for(&self, actor: UserId) -> ChatServiceResult<Vec<RoomSummary>> {
        let rooms = self.chats.rooms_for(actor).await?;
        let mut summaries = Vec::with_capacity(rooms.len());
        for room in rooms {
            let display_name = self.display_name(&room, actor).await?;
            let latest = self.chats.latest_message(room.id()).await?;
            let unread = self.chats.unread_count(room.id(), actor).await?;
            summaries.push(RoomSummary {
                room,
                display_name,
                latest,
                unread,
            });
        }
        Ok(summaries)
    }

    /// Opens a room, marking every message read by the actor.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::RoomNotFound`] when the room does not
    /// exist or the actor does not participate.
    pub async fn open_room(&self, actor: UserId, room_id: RoomId) -> ChatServiceResult<RoomView> {
        let room = self.joined_room(actor, room_id).await?;
        let marked = self.chats.mark_room_read(room_id, actor).await?;
        debug!(room = %room_id, user = %actor, marked, "room opened");
        let messages = self.chats.messages_in(room_id).await?;
        let display_name = self.display_name(&room, actor).await?;
        Ok(RoomView {
            room,
            display_name,
            messages,
        })
    }

    /// Posts a message, broadcasts it to the room channel and notifies the
    /// other participants.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError`] for blank messages, unknown actors and
    /// rooms the actor does not participate in.
    pub async fn send_message(
        &self,
        actor: UserId,
        room_id: RoomId,
        content: &str,
        file_url: Option<String>,
    ) -> ChatServiceResult<ChatMessage> {
        let sender = self.actor(actor).await?;
        let room = self.joined_room(actor, room_id).await?;
        let message = ChatMessage::post(room_id, actor, content, file_url, &*self.clock)?;
        self.chats.append_message(&message).await?;

        let delivered = self.notifier.announce(
            &ChannelKey::Room(room_id),
            &OutboundEvent::ChatMessage(ChatMessagePayload {
                message_id: message.id(),
                room_id,
                message: message.content().to_owned(),
                sender_id: actor,
                sender_username: sender.username().as_str().to_owned(),
                file_url: message.file_url().map(str::to_owned),
                created_at: message.created_at(),
            }),
        );
        debug!(room = %room_id, message = %message.id(), delivered, "chat message sent");

        for participant in room.participants() {
            self.notifier
                .notify(Activity::new(
                    actor,
                    *participant,
                    ActivityEvent::ChatMessage { room: room_id },
                ))
                .await?;
        }
        Ok(message)
    }

    /// Adds registered users to a group room; unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::NotRoomManager`] unless the actor
    /// created the group room, and [`ChatServiceError::Domain`] for an
    /// empty member list.
    pub async fn add_members(
        &self,
        actor: UserId,
        room_id: RoomId,
        members: &[UserId],
    ) -> ChatServiceResult<ChatRoom> {
        let mut room = self.managed_room(actor, room_id).await?;
        if members.is_empty() {
            return Err(ChatDomainError::NoMembers.into());
        }
        let mut known = Vec::with_capacity(members.len());
        for member in members {
            if self.user(*member).await?.is_some() {
                known.push(*member);
            }
        }
        if known.is_empty() {
            return Ok(room);
        }
        let added = room.add_members(known, &*self.clock)?;
        if added > 0 {
            self.chats.update_room(&room).await?;
        }
        info!(room = %room_id, added, "members added");
        Ok(room)
    }

    /// Removes a member from a group room and ends their live
    /// subscriptions to it.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::NotRoomManager`] unless the actor
    /// created the group room, [`ChatServiceError::UserNotFound`] for
    /// unknown users and [`ChatServiceError::Domain`] when the creator
    /// removes themselves.
    pub async fn remove_member(
        &self,
        actor: UserId,
        room_id: RoomId,
        member: UserId,
    ) -> ChatServiceResult<ChatRoom> {
        let mut room = self.managed_room(actor, room_id).await?;
        if self.user(member).await?.is_none() {
            return Err(ChatServiceError::UserNotFound(member));
        }
        if room.remove_member(member, &*self.clock)? {
            self.chats.update_room(&room).await?;
            let ended = self.notifier.revoke(&ChannelKey::Room(room_id), member);
            info!(room = %room_id, member = %member, ended, "member removed");
        }
        Ok(room)
    }
}
