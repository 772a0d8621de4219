//! In-memory account repository for tests and single-process deployments.

use crate::account::{
    domain::{CitizenProfile, User, UserId},
    ports::{AccountRepository, AccountRepositoryError, AccountRepositoryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory account repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountRepository {
    state: Arc<RwLock<InMemoryAccountState>>,
}

#[derive(Debug, Default)]
struct InMemoryAccountState {
    users: HashMap<UserId, User>,
    profiles: HashMap<UserId, CitizenProfile>,
    username_index: HashMap<String, UserId>,
}

impl InMemoryAccountRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> AccountRepositoryError {
    AccountRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn username_key(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Applies `update` to both profiles of a follow relation.
fn update_pair(
    state: &mut InMemoryAccountState,
    follower: UserId,
    followee: UserId,
    update: impl Fn(&mut CitizenProfile, &mut CitizenProfile) -> bool,
) -> AccountRepositoryResult<bool> {
    let mut follower_profile = state
        .profiles
        .get(&follower)
        .cloned()
        .ok_or(AccountRepositoryError::UserNotFound(follower))?;
    let mut followee_profile = state
        .profiles
        .get(&followee)
        .cloned()
        .ok_or(AccountRepositoryError::UserNotFound(followee))?;

    let changed = update(&mut follower_profile, &mut followee_profile);
    state.profiles.insert(follower, follower_profile);
    state.profiles.insert(followee, followee_profile);
    Ok(changed)
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn store_user(
        &self,
        user: &User,
        profile: &CitizenProfile,
    ) -> AccountRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let key = username_key(user.username().as_str());
        if state.username_index.contains_key(&key) {
            return Err(AccountRepositoryError::DuplicateUsername(
                user.username().clone(),
            ));
        }
        state.username_index.insert(key, user.id());
        state.users.insert(user.id(), user.clone());
        state.profiles.insert(user.id(), profile.clone());
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> AccountRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> AccountRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(poisoned)?;
        let user = state
            .username_index
            .get(&username_key(username))
            .and_then(|id| state.users.get(id))
            .cloned();
        Ok(user)
    }

    async fn find_profile(&self, id: UserId) -> AccountRepositoryResult<Option<CitizenProfile>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.profiles.get(&id).cloned())
    }

    async fn update_profile(&self, profile: &CitizenProfile) -> AccountRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let slot = state
            .profiles
            .get_mut(&profile.user_id())
            .ok_or(AccountRepositoryError::UserNotFound(profile.user_id()))?;
        *slot = profile.clone();
        Ok(())
    }

    async fn follow(&self, follower: UserId, followee: UserId) -> AccountRepositoryResult<bool> {
        let mut state = self.state.write().map_err(poisoned)?;
        update_pair(&mut state, follower, followee, |source, target| {
            let added = source.add_following(followee);
            target.add_follower(follower);
            added
        })
    }

    async fn unfollow(&self, follower: UserId, followee: UserId) -> AccountRepositoryResult<bool> {
        let mut state = self.state.write().map_err(poisoned)?;
        update_pair(&mut state, follower, followee, |source, target| {
            let removed = source.remove_following(followee);
            target.remove_follower(follower);
            removed
        })
    }
}
