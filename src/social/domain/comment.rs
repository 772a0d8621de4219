//! Comments and reply threads.

use super::{CommentId, SocialDomainError};
use crate::account::domain::UserId;
use crate::issue::domain::IssueId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const MAX_COMMENT_CHARS: usize = 2000;

/// Validated comment text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentBody(String);

impl CommentBody {
    /// Validates and trims comment text.
    ///
    /// # Errors
    ///
    /// Returns [`SocialDomainError::EmptyComment`] for blank text and
    /// [`SocialDomainError::CommentTooLong`] above the length limit.
    pub fn new(value: &str) -> Result<Self, SocialDomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SocialDomainError::EmptyComment);
        }
        let actual = trimmed.chars().count();
        if actual > MAX_COMMENT_CHARS {
            return Err(SocialDomainError::CommentTooLong {
                actual,
                max: MAX_COMMENT_CHARS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A comment on an issue, or a reply within a comment thread.
///
/// Threads are one level deep: `parent` always names a top-level
/// comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    issue: IssueId,
    author: UserId,
    body: CommentBody,
    parent: Option<CommentId>,
    likes: BTreeSet<UserId>,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a top-level comment.
    #[must_use]
    pub fn post(issue: IssueId, author: UserId, body: CommentBody, clock: &impl Clock) -> Self {
        Self {
            id: CommentId::new(),
            issue,
            author,
            body,
            parent: None,
            likes: BTreeSet::new(),
            created_at: clock.utc(),
        }
    }

    /// Creates a reply in the thread `target` belongs to.
    ///
    /// Replying to a reply attaches to the same top-level comment.
    #[must_use]
    pub fn reply_to(target: &Self, author: UserId, body: CommentBody, clock: &impl Clock) -> Self {
        Self {
            id: CommentId::new(),
            issue: target.issue,
            author,
            body,
            parent: Some(target.thread_root()),
            likes: BTreeSet::new(),
            created_at: clock.utc(),
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the commented issue.
    #[must_use]
    pub const fn issue(&self) -> IssueId {
        self.issue
    }

    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the text.
    #[must_use]
    pub fn content(&self) -> &str {
        self.body.as_str()
    }

    /// Returns the top-level comment this reply belongs to.
    #[must_use]
    pub const fn parent(&self) -> Option<CommentId> {
        self.parent
    }

    /// Returns the identifier of the thread's top-level comment.
    #[must_use]
    pub fn thread_root(&self) -> CommentId {
        self.parent.unwrap_or(self.id)
    }

    /// Returns the number of likes.
    #[must_use]
    pub fn like_count(&self) -> u64 {
        u64::try_from(self.likes.len()).unwrap_or(u64::MAX)
    }

    /// Returns whether `user` likes the comment.
    #[must_use]
    pub fn is_liked_by(&self, user: UserId) -> bool {
        self.likes.contains(&user)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Adds or removes `user`'s like; returns whether the user now likes
    /// the comment.
    pub fn toggle_like(&mut self, user: UserId) -> bool {
        if self.likes.remove(&user) {
            return false;
        }
        self.likes.insert(user);
        true
    }
}

/// A top-level comment with its replies, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentThread {
    /// Top-level comment.
    pub comment: Comment,
    /// Replies in posting order.
    pub replies: Vec<Comment>,
}

impl CommentThread {
    /// Groups a flat comment list into threads.
    ///
    /// Threads and replies are ordered oldest first. Replies whose root is
    /// missing from `comments` are dropped.
    #[must_use]
    pub fn group(mut comments: Vec<Comment>) -> Vec<Self> {
        comments.sort_by_key(Comment::created_at);
        let (roots, replies): (Vec<Comment>, Vec<Comment>) =
            comments.into_iter().partition(|comment| comment.parent.is_none());
        let mut threads: Vec<Self> = roots
            .into_iter()
            .map(|comment| Self {
                comment,
                replies: Vec::new(),
            })
            .collect();
        for reply in replies {
            if let Some(thread) = threads
                .iter_mut()
                .find(|thread| Some(thread.comment.id) == reply.parent)
            {
                thread.replies.push(reply);
            }
        }
        threads
    }
}
