//! Likes, bookmarks, comments and replies on issues.

use crate::account::{
    domain::{User, UserId},
    ports::{AccountRepository, AccountRepositoryError},
};
use crate::issue::{
    domain::{Issue, IssueId},
    ports::{IssueRepository, IssueRepositoryError},
};
use crate::notification::{
    domain::{Activity, ActivityEvent},
    ports::{ActivityNotifier, NotifierError},
};
use crate::realtime::{ChannelKey, CommentPayload, IssueUpdate, OutboundEvent};
use crate::social::{
    domain::{
        Comment, CommentBody, CommentId, CommentThread, EngagementSnapshot, LikeToggle,
        SocialDomainError, extract_mentions,
    },
    ports::{EngagementRepository, EngagementRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for engagement operations.
#[derive(Debug, Clone, Error)]
pub enum SocialServiceError {
    /// The acting user is not registered.
    #[error("unknown user: {0}")]
    UnknownActor(UserId),

    /// The issue does not exist.
    #[error("issue not found: {0}")]
    IssueNotFound(IssueId),

    /// The comment does not exist.
    #[error("comment not found: {0}")]
    CommentNotFound(CommentId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] SocialDomainError),

    /// Engagement persistence failed.
    #[error(transparent)]
    Repository(#[from] EngagementRepositoryError),

    /// Issue lookup failed.
    #[error(transparent)]
    Issues(#[from] IssueRepositoryError),

    /// Account lookup failed.
    #[error(transparent)]
    Accounts(#[from] AccountRepositoryError),

    /// Notification delivery failed.
    #[error(transparent)]
    Notifier(#[from] NotifierError),
}

/// Result type for engagement operations.
pub type SocialServiceResult<T> = Result<T, SocialServiceError>;

/// Social actions on issues and their comments.
///
/// Every successful action that concerns another user is reported to the
/// [`ActivityNotifier`]; issue-level changes are also announced on the
/// issue's live channel.
pub struct EngagementService<I, E, A, N, C>
where
    I: IssueRepository + ?Sized,
    E: EngagementRepository + ?Sized,
    A: AccountRepository + ?Sized,
    N: ActivityNotifier + ?Sized,
    C: Clock + Send + Sync,
{
    issues: Arc<I>,
    engagement: Arc<E>,
    accounts: Arc<A>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<I, E, A, N, C> EngagementService<I, E, A, N, C>
where
    I: IssueRepository + ?Sized,
    E: EngagementRepository + ?Sized,
    A: AccountRepository + ?Sized,
    N: ActivityNotifier + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates an engagement service.
    #[must_use]
    pub const fn new(
        issues: Arc<I>,
        engagement: Arc<E>,
        accounts: Arc<A>,
        notifier: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            issues,
            engagement,
            accounts,
            notifier,
            clock,
        }
    }

    async fn actor(&self, id: UserId) -> SocialServiceResult<User> {
        self.accounts
            .find_user(id)
            .await?
            .ok_or(SocialServiceError::UnknownActor(id))
    }

    async fn issue(&self, id: IssueId) -> SocialServiceResult<Issue> {
        self.issues
            .find_by_id(id)
            .await?
            .ok_or(SocialServiceError::IssueNotFound(id))
    }

    async fn comment(&self, id: CommentId) -> SocialServiceResult<Comment> {
        self.engagement
            .find_comment(id)
            .await?
            .ok_or(SocialServiceError::CommentNotFound(id))
    }

    /// Likes or unlikes an issue.
    ///
    /// A like notifies the issue's reporter; an unlike is silent and leaves
    /// earlier notifications in place. Either way the new count is
    /// announced on the issue channel.
    ///
    /// # Errors
    ///
    /// Returns [`SocialServiceError`] for unknown actors or issues and on
    /// persistence failure.
    pub async fn toggle_issue_like(
        &self,
        actor: UserId,
        issue_id: IssueId,
    ) -> SocialServiceResult<LikeToggle> {
        self.actor(actor).await?;
        let issue = self.issue(issue_id).await?;
        let toggle = self.engagement.toggle_issue_like(issue_id, actor).await?;
        debug!(issue = %issue_id, user = %actor, liked = toggle.liked, "issue like toggled");

        if toggle.liked {
            self.notifier
                .notify(Activity::new(
                    actor,
                    issue.reporter(),
                    ActivityEvent::IssueLiked { issue: issue_id },
                ))
                .await?;
        }
        self.notifier.announce(
            &ChannelKey::Issue(issue_id),
            &OutboundEvent::IssueUpdate(IssueUpdate::LikeUpdate {
                user_id: actor,
                liked: toggle.liked,
                like_count: toggle.like_count,
            }),
        );
        Ok(toggle)
    }

    /// Bookmarks or un-bookmarks an issue; returns whether it is now
    /// bookmarked.
    ///
    /// # Errors
    ///
    /// Returns [`SocialServiceError`] for unknown actors or issues and on
    /// persistence failure.
    pub async fn toggle_bookmark(&self, actor: UserId, issue_id: IssueId) -> SocialServiceResult<bool> {
        self.actor(actor).await?;
        self.issue(issue_id).await?;
        Ok(self.engagement.toggle_bookmark(issue_id, actor).await?)
    }

    /// Returns the issues the actor bookmarked, skipping any that no longer
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`SocialServiceError`] on persistence failure.
    pub async fn bookmarks(&self, actor: UserId) -> SocialServiceResult<Vec<Issue>> {
        let mut issues = Vec::new();
        for id in self.engagement.bookmarks_of(actor).await? {
            if let Some(issue) = self.issues.find_by_id(id).await? {
                issues.push(issue);
            }
        }
        Ok(issues)
    }

    /// Returns an issue's engagement counters as seen by `viewer`.
    ///
    /// # Errors
    ///
    /// Returns [`SocialServiceError`] on persistence failure.
    pub async fn snapshot(
        &self,
        issue_id: IssueId,
        viewer: Option<UserId>,
    ) -> SocialServiceResult<EngagementSnapshot> {
        Ok(self.engagement.snapshot(issue_id, viewer).await?)
    }

    /// Posts a top-level comment on an issue.
    ///
    /// Notifies the reporter and every mentioned user other than the actor.
    ///
    /// # Errors
    ///
    /// Returns [`SocialServiceError`] for blank comments, unknown actors or
    /// issues and on persistence failure.
    pub async fn add_comment(
        &self,
        actor: UserId,
        issue_id: IssueId,
        content: &str,
    ) -> SocialServiceResult<Comment> {
        let author = self.actor(actor).await?;
        let issue = self.issue(issue_id).await?;
        let body = CommentBody::new(content)?;
        let comment = Comment::post(issue_id, actor, body, &*self.clock);
        self.engagement.store_comment(&comment).await?;
        info!(issue = %issue_id, comment = %comment.id(), author = %actor, "comment posted");

        self.notifier
            .notify(Activity::new(
                actor,
                issue.reporter(),
                ActivityEvent::IssueCommented {
                    issue: issue_id,
                    comment: comment.id(),
                },
            ))
            .await?;
        self.after_comment(&author, &comment).await?;
        Ok(comment)
    }

    /// Replies within the thread of `target`.
    ///
    /// The reply attaches to the thread's top-level comment. Notifies the
    /// author of `target` and every mentioned user other than the actor.
    ///
    /// # Errors
    ///
    /// Returns [`SocialServiceError`] for blank replies, unknown actors or
    /// comments and on persistence failure.
    pub async fn reply(
        &self,
        actor: UserId,
        target: CommentId,
        content: &str,
    ) -> SocialServiceResult<Comment> {
        let author = self.actor(actor).await?;
        let target = self.comment(target).await?;
        let body = CommentBody::new(content)?;
        let reply = Comment::reply_to(&target, actor, body, &*self.clock);
        self.engagement.store_comment(&reply).await?;
        info!(
            issue = %reply.issue(),
            comment = %reply.id(),
            thread = %reply.thread_root(),
            author = %actor,
            "reply posted"
        );

        self.notifier
            .notify(Activity::new(
                actor,
                target.author(),
                ActivityEvent::CommentReplied {
                    issue: reply.issue(),
                    comment: reply.id(),
                },
            ))
            .await?;
        self.after_comment(&author, &reply).await?;
        Ok(reply)
    }

    /// Likes or unlikes a comment; a like notifies the comment's author.
    ///
    /// # Errors
    ///
    /// Returns [`SocialServiceError`] for unknown actors or comments and on
    /// persistence failure.
    pub async fn toggle_comment_like(
        &self,
        actor: UserId,
        comment_id: CommentId,
    ) -> SocialServiceResult<LikeToggle> {
        self.actor(actor).await?;
        let comment = self.comment(comment_id).await?;
        let toggle = self
            .engagement
            .toggle_comment_like(comment_id, actor)
            .await
            .map_err(|err| match err {
                EngagementRepositoryError::CommentNotFound(id) => {
                    SocialServiceError::CommentNotFound(id)
                }
                other => other.into(),
            })?;
        if toggle.liked {
            self.notifier
                .notify(Activity::new(
                    actor,
                    comment.author(),
                    ActivityEvent::CommentLiked {
                        issue: comment.issue(),
                        comment: comment_id,
                    },
                ))
                .await?;
        }
        Ok(toggle)
    }

    /// Returns an issue's comments grouped into threads, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SocialServiceError`] for unknown issues and on
    /// persistence failure.
    pub async fn threads(&self, issue_id: IssueId) -> SocialServiceResult<Vec<CommentThread>> {
        self.issue(issue_id).await?;
        let comments = self.engagement.comments_for_issue(issue_id).await?;
        Ok(CommentThread::group(comments))
    }

    /// Notifies mentioned users and announces the comment live.
    async fn after_comment(&self, author: &User, comment: &Comment) -> SocialServiceResult<()> {
        for username in extract_mentions(comment.content()) {
            let Some(mentioned) = self.accounts.find_user_by_username(&username).await? else {
                debug!(username = %username, "mention of unknown user ignored");
                continue;
            };
            self.notifier
                .notify(Activity::new(
                    author.id(),
                    mentioned.id(),
                    ActivityEvent::Mentioned {
                        issue: comment.issue(),
                        comment: comment.id(),
                    },
                ))
                .await?;
        }

        self.notifier.announce(
            &ChannelKey::Issue(comment.issue()),
            &OutboundEvent::IssueUpdate(IssueUpdate::NewComment(CommentPayload {
                comment_id: comment.id(),
                parent_id: comment.parent(),
                username: author.username().as_str().to_owned(),
                content: comment.content().to_owned(),
                created_at: comment.created_at(),
            })),
        );
        Ok(())
    }
}
