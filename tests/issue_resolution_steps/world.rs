//! Shared world state for issue resolution BDD scenarios.

use std::collections::HashMap;

use civic_resolve::{
    account::domain::UserId,
    config::AppConfig,
    http::AppState,
    issue::{
        domain::{IssueId, LeaderId},
        services::{IssueServiceError, ResolutionOutcome},
    },
};
use rstest::fixture;

/// Scenario world for issue resolution behaviour tests.
pub struct ResolutionWorld {
    pub state: AppState,
    pub users: HashMap<String, UserId>,
    pub leader: Option<LeaderId>,
    pub issue: Option<IssueId>,
    pub last_result: Option<Result<ResolutionOutcome, IssueServiceError>>,
}

impl ResolutionWorld {
    /// Creates a world backed by in-memory services.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: AppState::in_memory(&AppConfig::default()),
            users: HashMap::new(),
            leader: None,
            issue: None,
            last_result: None,
        }
    }

    /// Looks up a citizen registered earlier in the scenario.
    pub fn user(&self, username: &str) -> Result<UserId, eyre::Report> {
        self.users
            .get(username)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown citizen {username} in scenario world"))
    }

    /// Returns the issue reported in the background.
    pub fn issue(&self) -> Result<IssueId, eyre::Report> {
        self.issue
            .ok_or_else(|| eyre::eyre!("missing reported issue in scenario world"))
    }

    /// Returns the leader registered in the background.
    pub fn leader(&self) -> Result<LeaderId, eyre::Report> {
        self.leader
            .ok_or_else(|| eyre::eyre!("missing leader in scenario world"))
    }
}

impl Default for ResolutionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ResolutionWorld {
    ResolutionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
