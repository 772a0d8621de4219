//! Errors shared by issue services.

use crate::account::{domain::UserId, ports::AccountRepositoryError};
use crate::issue::{
    domain::{IssueDomainError, IssueId, LeaderId},
    ports::IssueRepositoryError,
};
use crate::notification::ports::NotifierError;
use thiserror::Error;

/// Service-level errors for issue operations.
#[derive(Debug, Clone, Error)]
pub enum IssueServiceError {
    /// The acting user is not registered.
    #[error("unknown user: {0}")]
    UnknownActor(UserId),

    /// The issue does not exist.
    #[error("issue not found: {0}")]
    NotFound(IssueId),

    /// The leader does not exist.
    #[error("leader not found: {0}")]
    LeaderNotFound(LeaderId),

    /// Only the tagged leader's account may resolve an issue.
    #[error("user {actor} is not the leader tagged on issue {issue}")]
    NotTaggedLeader {
        /// Issue the actor tried to resolve.
        issue: IssueId,
        /// Acting user.
        actor: UserId,
    },

    /// Only the reporter may confirm a resolution.
    #[error("user {actor} did not report issue {issue}")]
    NotReporter {
        /// Issue the actor tried to confirm.
        issue: IssueId,
        /// Acting user.
        actor: UserId,
    },

    /// The content classifier rejected the submission.
    #[error("submission rejected by moderation: {0}")]
    ContentRejected(String),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IssueDomainError),

    /// Issue store operation failed.
    #[error(transparent)]
    Repository(#[from] IssueRepositoryError),

    /// Account lookup failed.
    #[error(transparent)]
    Accounts(#[from] AccountRepositoryError),

    /// Notification delivery failed.
    #[error(transparent)]
    Notifier(#[from] NotifierError),
}

/// Result type for issue service operations.
pub type IssueServiceResult<T> = Result<T, IssueServiceError>;
