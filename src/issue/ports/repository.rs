//! Repository ports for issues, leaders and hashtags.

use crate::account::domain::UserId;
use crate::issue::domain::{Hashtag, HashtagName, Issue, IssueId, Leader, LeaderId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for issue store operations.
pub type IssueRepositoryResult<T> = Result<T, IssueRepositoryError>;

/// Issue persistence contract.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Stores a new issue together with its hashtags as one atomic write.
    ///
    /// Each hashtag is upserted and paired with the issue; usage counters
    /// increment once per first-seen (hashtag, issue) pairing. Returns the
    /// updated hashtag records. Nothing is persisted if any part fails.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::DuplicateIssue`] when the identifier
    /// already exists and [`IssueRepositoryError::LeaderNotFound`] for an
    /// unknown tagged leader.
    async fn store(
        &self,
        issue: &Issue,
        hashtags: &[HashtagName],
    ) -> IssueRepositoryResult<Vec<Hashtag>>;

    /// Persists a mutated issue when the stored copy still carries
    /// `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::NotFound`] for unknown issues and
    /// [`IssueRepositoryError::VersionConflict`] for stale writes.
    async fn update(&self, issue: &Issue, expected_version: u64) -> IssueRepositoryResult<()>;

    /// Persists a resolution flag change as one atomic write.
    ///
    /// When `credited_leader` is set, that leader's solved counter is
    /// incremented in the same write; nothing is persisted if any part
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::NotFound`],
    /// [`IssueRepositoryError::LeaderNotFound`] or
    /// [`IssueRepositoryError::VersionConflict`].
    async fn commit_resolution(
        &self,
        issue: &Issue,
        expected_version: u64,
        credited_leader: Option<LeaderId>,
    ) -> IssueRepositoryResult<()>;

    /// Finds an issue by identifier.
    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>>;

    /// Returns all issues, newest first.
    async fn list_recent(&self) -> IssueRepositoryResult<Vec<Issue>>;

    /// Returns the issues reported by `reporter`, newest first.
    async fn list_by_reporter(&self, reporter: UserId) -> IssueRepositoryResult<Vec<Issue>>;
}

/// Leader persistence contract.
#[async_trait]
pub trait LeaderRepository: Send + Sync {
    /// Stores a new leader.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::LeaderAccountTaken`] when the linked
    /// account already acts for another leader.
    async fn store_leader(&self, leader: &Leader) -> IssueRepositoryResult<()>;

    /// Finds a leader by identifier.
    async fn find_leader(&self, id: LeaderId) -> IssueRepositoryResult<Option<Leader>>;

    /// Finds the leader whose linked account is `account`.
    async fn find_leader_by_account(
        &self,
        account: UserId,
    ) -> IssueRepositoryResult<Option<Leader>>;

    /// Returns all leaders ordered by solved count, highest first.
    async fn leaderboard(&self) -> IssueRepositoryResult<Vec<Leader>>;
}

/// Hashtag lookup contract.
///
/// Hashtags are written only alongside their issue by
/// [`IssueRepository::store`].
#[async_trait]
pub trait HashtagRepository: Send + Sync {
    /// Finds a hashtag record by name.
    async fn find_hashtag(&self, name: &HashtagName) -> IssueRepositoryResult<Option<Hashtag>>;
}

/// Combined store used by issue services.
pub trait IssueStore: IssueRepository + LeaderRepository + HashtagRepository {}

impl<T> IssueStore for T where T: IssueRepository + LeaderRepository + HashtagRepository {}

/// Errors returned by issue store implementations.
#[derive(Debug, Clone, Error)]
pub enum IssueRepositoryError {
    /// An issue with the same identifier already exists.
    #[error("duplicate issue identifier: {0}")]
    DuplicateIssue(IssueId),

    /// The issue was not found.
    #[error("issue not found: {0}")]
    NotFound(IssueId),

    /// The leader was not found.
    #[error("leader not found: {0}")]
    LeaderNotFound(LeaderId),

    /// The account already acts for another leader.
    #[error("account {0} is already linked to a leader")]
    LeaderAccountTaken(UserId),

    /// The stored issue changed since it was read.
    #[error("issue {id} was modified concurrently (expected version {expected})")]
    VersionConflict {
        /// Issue identifier.
        id: IssueId,
        /// Version the writer read.
        expected: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IssueRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
