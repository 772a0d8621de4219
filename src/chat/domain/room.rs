//! Chat room aggregate.

use super::{ChatDomainError, RoomId};
use crate::account::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A direct or group conversation.
///
/// The creator is always a participant. Only group rooms carry a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRoom {
    id: RoomId,
    name: Option<String>,
    is_group_chat: bool,
    creator: UserId,
    participants: BTreeSet<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChatRoom {
    /// Opens a room created by `creator` with `others`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::NoParticipants`] when nobody besides the
    /// creator is named and [`ChatDomainError::DirectRoomSize`] when a
    /// direct room names more than one other user.
    pub fn open(
        creator: UserId,
        others: impl IntoIterator<Item = UserId>,
        is_group_chat: bool,
        name: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, ChatDomainError> {
        let others: BTreeSet<UserId> = others
            .into_iter()
            .filter(|user| *user != creator)
            .collect();
        if others.is_empty() {
            return Err(ChatDomainError::NoParticipants);
        }
        if !is_group_chat && others.len() != 1 {
            return Err(ChatDomainError::DirectRoomSize(others.len()));
        }
        let name = name
            .filter(|_| is_group_chat)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let mut participants = others;
        participants.insert(creator);
        let timestamp = clock.utc();
        Ok(Self {
            id: RoomId::new(),
            name,
            is_group_chat,
            creator,
            participants,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the room identifier.
    #[must_use]
    pub const fn id(&self) -> RoomId {
        self.id
    }

    /// Returns the group name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns whether this is a group room.
    #[must_use]
    pub const fn is_group_chat(&self) -> bool {
        self.is_group_chat
    }

    /// Returns the creator.
    #[must_use]
    pub const fn creator(&self) -> UserId {
        self.creator
    }

    /// Returns the participants.
    #[must_use]
    pub const fn participants(&self) -> &BTreeSet<UserId> {
        &self.participants
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the time of the latest activity.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `user` participates in the room.
    #[must_use]
    pub fn is_participant(&self, user: UserId) -> bool {
        self.participants.contains(&user)
    }

    /// Returns whether this is the direct room between `a` and `b`.
    #[must_use]
    pub fn is_direct_between(&self, a: UserId, b: UserId) -> bool {
        !self.is_group_chat && self.is_participant(a) && self.is_participant(b)
    }

    /// Returns the participant other than `viewer` in a direct room.
    #[must_use]
    pub fn other_participant(&self, viewer: UserId) -> Option<UserId> {
        if self.is_group_chat {
            return None;
        }
        self.participants.iter().copied().find(|user| *user != viewer)
    }

    /// Returns whether `user` may change the membership.
    #[must_use]
    pub fn is_managed_by(&self, user: UserId) -> bool {
        self.is_group_chat && self.creator == user
    }

    /// Adds members; returns how many were new.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::NoMembers`] for an empty list.
    pub fn add_members(
        &mut self,
        members: impl IntoIterator<Item = UserId>,
        clock: &impl Clock,
    ) -> Result<usize, ChatDomainError> {
        let members: Vec<UserId> = members.into_iter().collect();
        if members.is_empty() {
            return Err(ChatDomainError::NoMembers);
        }
        let added = members
            .into_iter()
            .filter(|member| self.participants.insert(*member))
            .count();
        if added > 0 {
            self.updated_at = clock.utc();
        }
        Ok(added)
    }

    /// Removes `member`; returns whether they participated.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::RemoveSelf`] when `member` is the
    /// creator.
    pub fn remove_member(
        &mut self,
        member: UserId,
        clock: &impl Clock,
    ) -> Result<bool, ChatDomainError> {
        if member == self.creator {
            return Err(ChatDomainError::RemoveSelf);
        }
        let removed = self.participants.remove(&member);
        if removed {
            self.updated_at = clock.utc();
        }
        Ok(removed)
    }

    /// Records activity at `at`.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        if at > self.updated_at {
            self.updated_at = at;
        }
    }
}
