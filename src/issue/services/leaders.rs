//! Leader registration and the leaderboard.

use super::{IssueServiceError, IssueServiceResult};
use crate::account::{domain::UserId, ports::AccountRepository};
use crate::issue::{domain::Leader, ports::LeaderRepository};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Request payload for registering a leader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterLeaderRequest {
    name: String,
    designation: String,
    profile_picture: Option<String>,
    account: Option<UserId>,
}

impl RegisterLeaderRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, designation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            designation: designation.into(),
            profile_picture: None,
            account: None,
        }
    }

    /// Sets the profile picture URL.
    #[must_use]
    pub fn with_profile_picture(mut self, url: impl Into<String>) -> Self {
        self.profile_picture = Some(url.into());
        self
    }

    /// Links the login account that acts for the leader.
    #[must_use]
    pub const fn with_account(mut self, account: UserId) -> Self {
        self.account = Some(account);
        self
    }
}

/// Registers leaders and ranks them by solved issues.
pub struct LeaderService<L, A, C>
where
    L: LeaderRepository + ?Sized,
    A: AccountRepository + ?Sized,
    C: Clock + Send + Sync,
{
    leaders: Arc<L>,
    accounts: Arc<A>,
    clock: Arc<C>,
}

impl<L, A, C> LeaderService<L, A, C>
where
    L: LeaderRepository + ?Sized,
    A: AccountRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a leader service.
    #[must_use]
    pub const fn new(leaders: Arc<L>, accounts: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            leaders,
            accounts,
            clock,
        }
    }

    /// Registers a leader with a zero solved counter.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::UnknownActor`] when the linked account
    /// does not exist and [`IssueServiceError::Repository`] when it already
    /// acts for another leader.
    pub async fn register(&self, request: RegisterLeaderRequest) -> IssueServiceResult<Leader> {
        let mut leader = Leader::register(&request.name, &request.designation, &*self.clock)?;
        if let Some(account) = request.account {
            if self.accounts.find_user(account).await?.is_none() {
                return Err(IssueServiceError::UnknownActor(account));
            }
            leader = leader.with_account(account);
        }
        if let Some(url) = request.profile_picture {
            leader = leader.with_profile_picture(url);
        }
        self.leaders.store_leader(&leader).await?;
        info!(leader = %leader.id(), name = leader.name(), "leader registered");
        Ok(leader)
    }

    /// Returns every leader ordered by solved count, highest first.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::Repository`] on persistence failure.
    pub async fn leaderboard(&self) -> IssueServiceResult<Vec<Leader>> {
        Ok(self.leaders.leaderboard().await?)
    }
}
