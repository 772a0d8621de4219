//! In-memory engagement repository.

use crate::account::domain::UserId;
use crate::issue::domain::IssueId;
use crate::social::{
    domain::{Comment, CommentId, EngagementSnapshot, LikeToggle},
    ports::{EngagementRepository, EngagementRepositoryError, EngagementRepositoryResult},
};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory engagement repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEngagementRepository {
    state: Arc<RwLock<InMemoryEngagementState>>,
}

#[derive(Debug, Default)]
struct InMemoryEngagementState {
    likes: HashMap<IssueId, BTreeSet<UserId>>,
    bookmarks: HashMap<IssueId, BTreeSet<UserId>>,
    comments: Vec<Comment>,
}

impl InMemoryEngagementRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> EngagementRepositoryError {
    EngagementRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// Flips membership of `user` in `set`; returns whether it is now present.
fn toggle(set: &mut BTreeSet<UserId>, user: UserId) -> bool {
    if set.remove(&user) {
        false
    } else {
        set.insert(user)
    }
}

#[async_trait]
impl EngagementRepository for InMemoryEngagementRepository {
    async fn toggle_issue_like(
        &self,
        issue: IssueId,
        user: UserId,
    ) -> EngagementRepositoryResult<LikeToggle> {
        let mut state = self.state.write().map_err(poisoned)?;
        let likes = state.likes.entry(issue).or_default();
        let liked = toggle(likes, user);
        Ok(LikeToggle {
            liked,
            like_count: count(likes.len()),
        })
    }

    async fn toggle_bookmark(
        &self,
        issue: IssueId,
        user: UserId,
    ) -> EngagementRepositoryResult<bool> {
        let mut state = self.state.write().map_err(poisoned)?;
        Ok(toggle(state.bookmarks.entry(issue).or_default(), user))
    }

    async fn bookmarks_of(&self, user: UserId) -> EngagementRepositoryResult<Vec<IssueId>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut issues: Vec<IssueId> = state
            .bookmarks
            .iter()
            .filter(|(_, users)| users.contains(&user))
            .map(|(issue, _)| *issue)
            .collect();
        issues.sort();
        Ok(issues)
    }

    async fn snapshot(
        &self,
        issue: IssueId,
        viewer: Option<UserId>,
    ) -> EngagementRepositoryResult<EngagementSnapshot> {
        let state = self.state.read().map_err(poisoned)?;
        let likes = state.likes.get(&issue);
        let bookmarks = state.bookmarks.get(&issue);
        let contains = |set: Option<&BTreeSet<UserId>>| {
            viewer.is_some_and(|user| set.is_some_and(|members| members.contains(&user)))
        };
        Ok(EngagementSnapshot {
            like_count: count(likes.map_or(0, BTreeSet::len)),
            comment_count: count(
                state
                    .comments
                    .iter()
                    .filter(|comment| comment.issue() == issue)
                    .count(),
            ),
            liked: contains(likes),
            bookmarked: contains(bookmarks),
        })
    }

    async fn store_comment(&self, comment: &Comment) -> EngagementRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.comments.iter().any(|stored| stored.id() == comment.id()) {
            return Err(EngagementRepositoryError::DuplicateComment(comment.id()));
        }
        state.comments.push(comment.clone());
        Ok(())
    }

    async fn find_comment(&self, id: CommentId) -> EngagementRepositoryResult<Option<Comment>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.comments.iter().find(|stored| stored.id() == id).cloned())
    }

    async fn comments_for_issue(&self, issue: IssueId) -> EngagementRepositoryResult<Vec<Comment>> {
        let state = self.state.read().map_err(poisoned)?;
        // Insertion order keeps same-instant comments in posting order.
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|comment| comment.issue() == issue)
            .cloned()
            .collect();
        comments.sort_by_key(Comment::created_at);
        Ok(comments)
    }

    async fn toggle_comment_like(
        &self,
        comment: CommentId,
        user: UserId,
    ) -> EngagementRepositoryResult<LikeToggle> {
        let mut state = self.state.write().map_err(poisoned)?;
        let stored = state
            .comments
            .iter_mut()
            .find(|stored| stored.id() == comment)
            .ok_or(EngagementRepositoryError::CommentNotFound(comment))?;
        let liked = stored.toggle_like(user);
        Ok(LikeToggle {
            liked,
            like_count: stored.like_count(),
        })
    }
}
