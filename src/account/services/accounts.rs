//! Registration, profiles and follows.

use crate::account::{
    domain::{AccountDomainError, CitizenProfile, User, UserId, Username},
    ports::{AccountRepository, AccountRepositoryError},
};
use crate::notification::{
    domain::{Activity, ActivityEvent},
    ports::{ActivityNotifier, NotifierError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    username: String,
    email: Option<String>,
    real_name: Option<String>,
}

impl RegisterUserRequest {
    /// Creates a request for `username`.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: None,
            real_name: None,
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the real name shown on the profile.
    #[must_use]
    pub fn with_real_name(mut self, real_name: impl Into<String>) -> Self {
        self.real_name = Some(real_name.into());
        self
    }
}

/// Service-level errors for account operations.
#[derive(Debug, Clone, Error)]
pub enum AccountServiceError {
    /// The user does not exist.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AccountDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AccountRepositoryError),

    /// Notification delivery failed.
    #[error(transparent)]
    Notifier(#[from] NotifierError),
}

/// Result type for account operations.
pub type AccountServiceResult<T> = Result<T, AccountServiceError>;

/// Registers users and manages their profiles and follows.
pub struct AccountService<R, N, C>
where
    R: AccountRepository + ?Sized,
    N: ActivityNotifier + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<R, N, C> AccountService<R, N, C>
where
    R: AccountRepository + ?Sized,
    N: ActivityNotifier + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates an account service.
    #[must_use]
    pub const fn new(repository: Arc<R>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            repository,
            notifier,
            clock,
        }
    }

    /// Registers a user together with an empty citizen profile.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::Domain`] for invalid usernames and
    /// [`AccountServiceError::Repository`] when the name is taken.
    pub async fn register(
        &self,
        request: RegisterUserRequest,
    ) -> AccountServiceResult<(User, CitizenProfile)> {
        let username = Username::new(request.username)?;
        let user = User::register(username, request.email, &*self.clock);
        let profile = CitizenProfile::for_user(&user, request.real_name, &*self.clock);
        self.repository.store_user(&user, &profile).await?;
        info!(user = %user.id(), username = %user.username(), "user registered");
        Ok((user, profile))
    }

    /// Returns a user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::NotFound`] for unknown users.
    pub async fn user(&self, id: UserId) -> AccountServiceResult<User> {
        self.repository
            .find_user(id)
            .await?
            .ok_or(AccountServiceError::NotFound(id))
    }

    /// Returns a user's citizen profile.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::NotFound`] for unknown users.
    pub async fn profile(&self, id: UserId) -> AccountServiceResult<CitizenProfile> {
        self.repository
            .find_profile(id)
            .await?
            .ok_or(AccountServiceError::NotFound(id))
    }

    /// Replaces the bio on the actor's profile.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError`] for unknown users or an overlong bio.
    pub async fn update_bio(&self, actor: UserId, bio: &str) -> AccountServiceResult<CitizenProfile> {
        let mut profile = self.profile(actor).await?;
        profile.set_bio(bio, &*self.clock)?;
        self.repository.update_profile(&profile).await?;
        Ok(profile)
    }

    /// Makes `follower` follow `followee`; returns whether the relation is
    /// new.
    ///
    /// A new follow notifies the followed user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::Domain`] for self-follows and
    /// [`AccountServiceError::NotFound`] for unknown users.
    pub async fn follow(&self, follower: UserId, followee: UserId) -> AccountServiceResult<bool> {
        if follower == followee {
            return Err(AccountDomainError::SelfFollow(follower).into());
        }
        let created = self
            .repository
            .follow(follower, followee)
            .await
            .map_err(not_found)?;
        if created {
            info!(follower = %follower, followee = %followee, "follow recorded");
            self.notifier
                .notify(Activity::new(follower, followee, ActivityEvent::Followed))
                .await?;
        } else {
            debug!(follower = %follower, followee = %followee, "already following");
        }
        Ok(created)
    }

    /// Removes a follow relation; returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::NotFound`] for unknown users.
    pub async fn unfollow(&self, follower: UserId, followee: UserId) -> AccountServiceResult<bool> {
        self.repository
            .unfollow(follower, followee)
            .await
            .map_err(not_found)
    }
}

fn not_found(err: AccountRepositoryError) -> AccountServiceError {
    match err {
        AccountRepositoryError::UserNotFound(id) => AccountServiceError::NotFound(id),
        other => other.into(),
    }
}
