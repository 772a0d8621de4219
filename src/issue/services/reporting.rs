//! Issue submission, browsing and flagging.

use super::{IssueServiceError, IssueServiceResult};
use crate::account::{domain::UserId, ports::AccountRepository};
use crate::issue::{
    domain::{
        Hashtag, HashtagName, Issue, IssueDraft, IssueId, IssueTitle, LeaderId, Location,
        extract_hashtags,
    },
    ports::IssueStore,
};
use crate::moderation::{ContentClassifier, Verdict};
use crate::notification::ports::ActivityNotifier;
use crate::realtime::{ChannelKey, IssueUpdate, OutboundEvent};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request payload for submitting an issue.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitIssueRequest {
    title: String,
    description: String,
    latitude: f64,
    longitude: f64,
    leader: LeaderId,
    image_url: Option<String>,
}

impl SubmitIssueRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        latitude: f64,
        longitude: f64,
        leader: LeaderId,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            latitude,
            longitude,
            leader,
            image_url: None,
        }
    }

    /// Sets the image URL.
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// Outcome of flagging an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagOutcome {
    /// Flag count after the call.
    pub flag_count: u64,
    /// Whether this call counted; repeat flags by the same user do not.
    pub counted: bool,
}

/// Issues tagged with one hashtag.
#[derive(Debug, Clone, PartialEq)]
pub struct HashtagIssues {
    /// The hashtag record, absent when the name was never used.
    pub hashtag: Option<Hashtag>,
    /// Tagged issues, newest first.
    pub issues: Vec<Issue>,
}

/// Submits, lists and flags issues.
pub struct IssueReportingService<S, A, M, N, C>
where
    S: IssueStore + ?Sized,
    A: AccountRepository + ?Sized,
    M: ContentClassifier + ?Sized,
    N: ActivityNotifier + ?Sized,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    accounts: Arc<A>,
    classifier: Arc<M>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<S, A, M, N, C> IssueReportingService<S, A, M, N, C>
where
    S: IssueStore + ?Sized,
    A: AccountRepository + ?Sized,
    M: ContentClassifier + ?Sized,
    N: ActivityNotifier + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a reporting service.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        accounts: Arc<A>,
        classifier: Arc<M>,
        notifier: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            store,
            accounts,
            classifier,
            notifier,
            clock,
        }
    }

    async fn require_user(&self, id: UserId) -> IssueServiceResult<()> {
        match self.accounts.find_user(id).await? {
            Some(_) => Ok(()),
            None => Err(IssueServiceError::UnknownActor(id)),
        }
    }

    async fn moderate(&self, text: &str) -> IssueServiceResult<()> {
        match self.classifier.classify(text).await {
            Verdict::Legitimate => Ok(()),
            Verdict::Abusive { reason } => Err(IssueServiceError::ContentRejected(reason)),
        }
    }

    /// Submits a new open issue on behalf of `reporter`.
    ///
    /// The title and description are classified separately; an abusive
    /// verdict on either rejects the submission and nothing is stored.
    /// Hashtags in the title and description are recorded against the new
    /// issue in the same write.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError`] for invalid input, unknown reporters or
    /// leaders, rejected content and persistence failures.
    pub async fn submit(
        &self,
        reporter: UserId,
        request: SubmitIssueRequest,
    ) -> IssueServiceResult<Issue> {
        self.require_user(reporter).await?;
        if self.store.find_leader(request.leader).await?.is_none() {
            return Err(IssueServiceError::LeaderNotFound(request.leader));
        }

        let title = IssueTitle::new(request.title)?;
        let location = Location::new(request.latitude, request.longitude)?;
        let mut draft =
            IssueDraft::new(title, request.description, location, reporter, request.leader)?;
        if let Some(url) = request.image_url {
            draft = draft.with_image_url(url);
        }

        for text in [draft.title().as_str(), draft.description()] {
            if let Err(err) = self.moderate(text).await {
                warn!(reporter = %reporter, error = %err, "issue submission rejected");
                return Err(err);
            }
        }

        let issue = Issue::submit(draft, &*self.clock);
        let text = format!("{} {}", issue.title().as_str(), issue.description());
        let hashtags: Vec<HashtagName> = extract_hashtags(&text).into_iter().collect();
        self.store.store(&issue, &hashtags).await?;
        info!(
            issue = %issue.id(),
            reporter = %reporter,
            leader = %issue.leader(),
            hashtags = hashtags.len(),
            "issue submitted"
        );
        Ok(issue)
    }

    /// Returns one issue.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::NotFound`] for unknown issues.
    pub async fn get(&self, id: IssueId) -> IssueServiceResult<Issue> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(IssueServiceError::NotFound(id))
    }

    /// Returns every issue, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::Repository`] on persistence failure.
    pub async fn feed(&self) -> IssueServiceResult<Vec<Issue>> {
        Ok(self.store.list_recent().await?)
    }

    /// Returns the issues reported by `reporter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::Repository`] on persistence failure.
    pub async fn mine(&self, reporter: UserId) -> IssueServiceResult<Vec<Issue>> {
        Ok(self.store.list_by_reporter(reporter).await?)
    }

    /// Returns the issues tagged with `name`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::Domain`] for malformed names.
    pub async fn by_hashtag(&self, name: &str) -> IssueServiceResult<HashtagIssues> {
        let name = HashtagName::new(name)?;
        let Some(hashtag) = self.store.find_hashtag(&name).await? else {
            return Ok(HashtagIssues {
                hashtag: None,
                issues: Vec::new(),
            });
        };
        let mut issues = Vec::with_capacity(hashtag.issues().len());
        for id in hashtag.issues() {
            if let Some(issue) = self.store.find_by_id(*id).await? {
                issues.push(issue);
            }
        }
        issues.sort_by_key(|issue| std::cmp::Reverse(issue.created_at()));
        Ok(HashtagIssues {
            hashtag: Some(hashtag),
            issues,
        })
    }

    /// Flags an issue as unresolved on behalf of `actor`.
    ///
    /// Each user's flag counts once; a repeat leaves the count unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError`] for unknown actors or issues and
    /// stale writes.
    pub async fn flag(&self, actor: UserId, issue_id: IssueId) -> IssueServiceResult<FlagOutcome> {
        self.require_user(actor).await?;
        let mut issue = self.get(issue_id).await?;
        let expected_version = issue.version();
        if !issue.flag(actor, &*self.clock) {
            debug!(issue = %issue_id, user = %actor, "repeat flag ignored");
            return Ok(FlagOutcome {
                flag_count: issue.flag_count(),
                counted: false,
            });
        }
        self.store.update(&issue, expected_version).await?;
        info!(issue = %issue_id, user = %actor, flag_count = issue.flag_count(), "issue flagged");

        self.notifier.announce(
            &ChannelKey::Issue(issue_id),
            &OutboundEvent::IssueUpdate(IssueUpdate::Flagged {
                flag_count: issue.flag_count(),
            }),
        );
        Ok(FlagOutcome {
            flag_count: issue.flag_count(),
            counted: true,
        })
    }
}
