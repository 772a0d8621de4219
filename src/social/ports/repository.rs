//! Repository port for likes, bookmarks and comments.

use crate::account::domain::UserId;
use crate::issue::domain::IssueId;
use crate::social::domain::{Comment, CommentId, EngagementSnapshot, LikeToggle};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for engagement repository operations.
pub type EngagementRepositoryResult<T> = Result<T, EngagementRepositoryError>;

/// Engagement persistence contract.
///
/// Each toggle is a single atomic read-modify-write.
#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Adds or removes `user`'s like on an issue.
    async fn toggle_issue_like(
        &self,
        issue: IssueId,
        user: UserId,
    ) -> EngagementRepositoryResult<LikeToggle>;

    /// Adds or removes `user`'s bookmark on an issue; returns whether the
    /// issue is now bookmarked.
    async fn toggle_bookmark(&self, issue: IssueId, user: UserId)
    -> EngagementRepositoryResult<bool>;

    /// Returns the issues `user` has bookmarked.
    async fn bookmarks_of(&self, user: UserId) -> EngagementRepositoryResult<Vec<IssueId>>;

    /// Returns an issue's counters as seen by `viewer`.
    async fn snapshot(
        &self,
        issue: IssueId,
        viewer: Option<UserId>,
    ) -> EngagementRepositoryResult<EngagementSnapshot>;

    /// Stores a new comment or reply.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementRepositoryError::DuplicateComment`] when the
    /// identifier already exists.
    async fn store_comment(&self, comment: &Comment) -> EngagementRepositoryResult<()>;

    /// Finds a comment by identifier.
    async fn find_comment(&self, id: CommentId) -> EngagementRepositoryResult<Option<Comment>>;

    /// Returns every comment and reply on an issue, oldest first.
    async fn comments_for_issue(&self, issue: IssueId) -> EngagementRepositoryResult<Vec<Comment>>;

    /// Adds or removes `user`'s like on a comment.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementRepositoryError::CommentNotFound`] for unknown
    /// comments.
    async fn toggle_comment_like(
        &self,
        comment: CommentId,
        user: UserId,
    ) -> EngagementRepositoryResult<LikeToggle>;
}

/// Errors returned by engagement repository implementations.
#[derive(Debug, Clone, Error)]
pub enum EngagementRepositoryError {
    /// A comment with the same identifier already exists.
    #[error("duplicate comment identifier: {0}")]
    DuplicateComment(CommentId),

    /// The comment was not found.
    #[error("comment not found: {0}")]
    CommentNotFound(CommentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl EngagementRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
