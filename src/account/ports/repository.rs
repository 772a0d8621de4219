//! Repository port for users, profiles and follow relationships.

use crate::account::domain::{CitizenProfile, User, UserId, Username};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for account repository operations.
pub type AccountRepositoryResult<T> = Result<T, AccountRepositoryError>;

/// Account persistence contract.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Stores a new user together with its citizen profile.
    ///
    /// # Errors
    ///
    /// Returns [`AccountRepositoryError::DuplicateUsername`] when the
    /// username is already taken.
    async fn store_user(&self, user: &User, profile: &CitizenProfile)
    -> AccountRepositoryResult<()>;

    /// Finds a user by identifier.
    async fn find_user(&self, id: UserId) -> AccountRepositoryResult<Option<User>>;

    /// Finds a user by login name (case-insensitive).
    async fn find_user_by_username(&self, username: &str)
    -> AccountRepositoryResult<Option<User>>;

    /// Finds the profile owned by a user.
    async fn find_profile(&self, id: UserId) -> AccountRepositoryResult<Option<CitizenProfile>>;

    /// Persists changes to an existing profile.
    ///
    /// # Errors
    ///
    /// Returns [`AccountRepositoryError::UserNotFound`] when no profile
    /// exists for the owning user.
    async fn update_profile(&self, profile: &CitizenProfile) -> AccountRepositoryResult<()>;

    /// Records a follow relation on both profiles in one write.
    ///
    /// Returns `true` when the relation is new.
    async fn follow(&self, follower: UserId, followee: UserId) -> AccountRepositoryResult<bool>;

    /// Removes a follow relation from both profiles in one write.
    ///
    /// Returns `true` when a relation was removed.
    async fn unfollow(&self, follower: UserId, followee: UserId) -> AccountRepositoryResult<bool>;
}

/// Errors returned by account repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AccountRepositoryError {
    /// The username is already registered.
    #[error("username already taken: {0}")]
    DuplicateUsername(Username),

    /// The user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AccountRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
