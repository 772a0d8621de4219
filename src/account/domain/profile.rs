//! Citizen profile attached one-to-one to each user.

use super::{AccountDomainError, User, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Social metadata for a registered citizen.
///
/// `reputation` is carried for display but no workflow updates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitizenProfile {
    user_id: UserId,
    real_name: String,
    contact_email: String,
    bio: String,
    reputation: u64,
    followers: BTreeSet<UserId>,
    following: BTreeSet<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProfileData {
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub real_name: String,
    /// Contact address.
    pub contact_email: String,
    /// Free-text biography.
    pub bio: String,
    /// Reputation score.
    pub reputation: u64,
    /// Users following the owner.
    pub followers: BTreeSet<UserId>,
    /// Users the owner follows.
    pub following: BTreeSet<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl CitizenProfile {
    const MAX_BIO_LENGTH: usize = 500;

    /// Reconstructs a profile from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProfileData) -> Self {
        Self {
            user_id: data.user_id,
            real_name: data.real_name,
            contact_email: data.contact_email,
            bio: data.bio,
            reputation: data.reputation,
            followers: data.followers,
            following: data.following,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Creates the profile for a newly registered user.
    ///
    /// The real name falls back to the username when none is supplied.
    #[must_use]
    pub fn for_user(user: &User, real_name: Option<String>, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let real_name = real_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| user.username().as_str().to_owned());
        Self {
            user_id: user.id(),
            real_name,
            contact_email: user.email().unwrap_or_default().to_owned(),
            bio: String::new(),
            reputation: 0,
            followers: BTreeSet::new(),
            following: BTreeSet::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the owning user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn real_name(&self) -> &str {
        &self.real_name
    }

    /// Returns the contact email, empty when unknown.
    #[must_use]
    pub fn contact_email(&self) -> &str {
        &self.contact_email
    }

    /// Returns the biography text.
    #[must_use]
    pub fn bio(&self) -> &str {
        &self.bio
    }

    /// Returns the reputation counter.
    #[must_use]
    pub const fn reputation(&self) -> u64 {
        self.reputation
    }

    /// Returns the users following this citizen.
    #[must_use]
    pub const fn followers(&self) -> &BTreeSet<UserId> {
        &self.followers
    }

    /// Returns the users this citizen follows.
    #[must_use]
    pub const fn following(&self) -> &BTreeSet<UserId> {
        &self.following
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the biography.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::BioTooLong`] when the trimmed text
    /// exceeds 500 characters.
    pub fn set_bio(&mut self, bio: &str, clock: &impl Clock) -> Result<(), AccountDomainError> {
        let trimmed = bio.trim();
        let length = trimmed.chars().count();
        if length > Self::MAX_BIO_LENGTH {
            return Err(AccountDomainError::BioTooLong {
                actual: length,
                max: Self::MAX_BIO_LENGTH,
            });
        }
        trimmed.clone_into(&mut self.bio);
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Records that `follower` now follows this citizen.
    ///
    /// Returns `true` when the relation did not exist before.
    pub fn add_follower(&mut self, follower: UserId) -> bool {
        self.followers.insert(follower)
    }

    /// Records that this citizen now follows `followee`.
    pub fn add_following(&mut self, followee: UserId) -> bool {
        self.following.insert(followee)
    }

    /// Removes `follower` from this citizen's followers.
    pub fn remove_follower(&mut self, follower: UserId) -> bool {
        self.followers.remove(&follower)
    }

    /// Removes `followee` from the citizens this profile follows.
    pub fn remove_following(&mut self, followee: UserId) -> bool {
        self.following.remove(&followee)
    }
}
