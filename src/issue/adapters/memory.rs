//! In-memory issue store for tests and single-process deployments.
//!
//! Issues, leaders and hashtags sit behind one lock so a submission with
//! its hashtags, or a resolution commit, is observed atomically.

use crate::account::domain::UserId;
use crate::issue::{
    domain::{Hashtag, HashtagName, Issue, IssueId, Leader, LeaderId},
    ports::{
        HashtagRepository, IssueRepository, IssueRepositoryError, IssueRepositoryResult,
        LeaderRepository,
    },
};
use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory issue store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueStore {
    state: Arc<RwLock<InMemoryIssueState>>,
}

#[derive(Debug, Default)]
struct InMemoryIssueState {
    issues: HashMap<IssueId, Issue>,
    leaders: HashMap<LeaderId, Leader>,
    leader_accounts: HashMap<UserId, LeaderId>,
    hashtags: HashMap<HashtagName, Hashtag>,
}

impl InMemoryIssueStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> IssueRepositoryError {
    IssueRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Checks the stored version of `issue` against `expected_version`.
fn check_version(
    state: &InMemoryIssueState,
    issue: &Issue,
    expected_version: u64,
) -> IssueRepositoryResult<()> {
    let stored = state
        .issues
        .get(&issue.id())
        .ok_or(IssueRepositoryError::NotFound(issue.id()))?;
    if stored.version() != expected_version {
        return Err(IssueRepositoryError::VersionConflict {
            id: issue.id(),
            expected: expected_version,
        });
    }
    Ok(())
}

fn newest_first(mut issues: Vec<Issue>) -> Vec<Issue> {
    issues.sort_by_key(|issue| Reverse(issue.created_at()));
    issues
}

#[async_trait]
impl IssueRepository for InMemoryIssueStore {
    async fn store(
        &self,
        issue: &Issue,
        hashtags: &[HashtagName],
    ) -> IssueRepositoryResult<Vec<Hashtag>> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.issues.contains_key(&issue.id()) {
            return Err(IssueRepositoryError::DuplicateIssue(issue.id()));
        }
        if !state.leaders.contains_key(&issue.leader()) {
            return Err(IssueRepositoryError::LeaderNotFound(issue.leader()));
        }
        state.issues.insert(issue.id(), issue.clone());
        let tagged = hashtags
            .iter()
            .map(|name| {
                let hashtag = state
                    .hashtags
                    .entry(name.clone())
                    .or_insert_with(|| Hashtag::new(name.clone()));
                hashtag.tag(issue.id());
                hashtag.clone()
            })
            .collect();
        Ok(tagged)
    }

    async fn update(&self, issue: &Issue, expected_version: u64) -> IssueRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        check_version(&state, issue, expected_version)?;
        state.issues.insert(issue.id(), issue.clone());
        Ok(())
    }

    async fn commit_resolution(
        &self,
        issue: &Issue,
        expected_version: u64,
        credited_leader: Option<LeaderId>,
    ) -> IssueRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        check_version(&state, issue, expected_version)?;
        if let Some(leader_id) = credited_leader {
            let leader = state
                .leaders
                .get_mut(&leader_id)
                .ok_or(IssueRepositoryError::LeaderNotFound(leader_id))?;
            leader.credit_solved(issue.updated_at());
        }
        state.issues.insert(issue.id(), issue.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.issues.get(&id).cloned())
    }

    async fn list_recent(&self) -> IssueRepositoryResult<Vec<Issue>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(newest_first(state.issues.values().cloned().collect()))
    }

    async fn list_by_reporter(&self, reporter: UserId) -> IssueRepositoryResult<Vec<Issue>> {
        let state = self.state.read().map_err(poisoned)?;
        let issues = state
            .issues
            .values()
            .filter(|issue| issue.is_reported_by(reporter))
            .cloned()
            .collect();
        Ok(newest_first(issues))
    }
}

#[async_trait]
impl LeaderRepository for InMemoryIssueStore {
    async fn store_leader(&self, leader: &Leader) -> IssueRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if let Some(account) = leader.account() {
            if state.leader_accounts.contains_key(&account) {
                return Err(IssueRepositoryError::LeaderAccountTaken(account));
            }
            state.leader_accounts.insert(account, leader.id());
        }
        state.leaders.insert(leader.id(), leader.clone());
        Ok(())
    }

    async fn find_leader(&self, id: LeaderId) -> IssueRepositoryResult<Option<Leader>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.leaders.get(&id).cloned())
    }

    async fn find_leader_by_account(
        &self,
        account: UserId,
    ) -> IssueRepositoryResult<Option<Leader>> {
        let state = self.state.read().map_err(poisoned)?;
        let leader = state
            .leader_accounts
            .get(&account)
            .and_then(|id| state.leaders.get(id))
            .cloned();
        Ok(leader)
    }

    async fn leaderboard(&self) -> IssueRepositoryResult<Vec<Leader>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut leaders: Vec<Leader> = state.leaders.values().cloned().collect();
        leaders.sort_by(|left, right| {
            right
                .solved_problems()
                .cmp(&left.solved_problems())
                .then_with(|| left.name().cmp(right.name()))
        });
        Ok(leaders)
    }
}

#[async_trait]
impl HashtagRepository for InMemoryIssueStore {
    async fn find_hashtag(&self, name: &HashtagName) -> IssueRepositoryResult<Option<Hashtag>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.hashtags.get(name).cloned())
    }
}
