//! The two-step resolution workflow.
//!
//! The tagged leader marks an issue resolved, the reporter confirms it,
//! and the issue becomes solved once both flags are set. Each flag change
//! is committed together with any leader credit in one versioned write.

use super::{IssueServiceError, IssueServiceResult};
use crate::account::domain::UserId;
use crate::issue::{
    domain::{Issue, IssueId, LeaderId, StatusTransition},
    ports::IssueStore,
};
use crate::notification::{
    domain::{Activity, ActivityEvent},
    ports::ActivityNotifier,
};
use crate::realtime::{ChannelKey, IssueUpdate, OutboundEvent};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a resolution request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionOutcome {
    /// The issue after the request.
    pub issue: Issue,
    /// Status change caused by the request, if any.
    pub transition: Option<StatusTransition>,
    /// Whether the request set a flag; `false` when it was already set.
    pub changed: bool,
}

impl ResolutionOutcome {
    const fn unchanged(issue: Issue) -> Self {
        Self {
            issue,
            transition: None,
            changed: false,
        }
    }
}

/// Applies leader resolutions and reporter confirmations.
pub struct ResolutionService<S, N, C>
where
    S: IssueStore + ?Sized,
    N: ActivityNotifier + ?Sized,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<S, N, C> ResolutionService<S, N, C>
where
    S: IssueStore + ?Sized,
    N: ActivityNotifier + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a resolution service.
    #[must_use]
    pub const fn new(store: Arc<S>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            store,
            notifier,
            clock,
        }
    }

    async fn load(&self, id: IssueId) -> IssueServiceResult<Issue> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(IssueServiceError::NotFound(id))
    }

    /// Marks an issue resolved on behalf of its tagged leader.
    ///
    /// Moves an open issue to pending confirmation, or straight to solved
    /// when the reporter already confirmed. Repeating the call changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::NotTaggedLeader`] when `actor` does not
    /// act for the tagged leader, and [`IssueServiceError::Repository`] for
    /// stale writes. Notification failures after the commit are logged and
    /// do not fail the call.
    pub async fn resolve_as_leader(
        &self,
        actor: UserId,
        issue_id: IssueId,
    ) -> IssueServiceResult<ResolutionOutcome> {
        let mut issue = self.load(issue_id).await?;
        let leader = self
            .store
            .find_leader(issue.leader())
            .await?
            .ok_or(IssueServiceError::LeaderNotFound(issue.leader()))?;
        if !leader.is_operated_by(actor) {
            return Err(IssueServiceError::NotTaggedLeader {
                issue: issue_id,
                actor,
            });
        }
        if issue.is_leader_resolved() {
            debug!(issue = %issue_id, "leader resolution already recorded");
            return Ok(ResolutionOutcome::unchanged(issue));
        }

        let expected_version = issue.version();
        let transition = issue.apply_leader_resolution(&*self.clock);
        self.commit(&issue, expected_version, transition).await?;

        if transition.is_some() {
            self.notify_committed(Activity::new(
                actor,
                issue.reporter(),
                ActivityEvent::LeaderResolved {
                    issue: issue_id,
                    title: issue.title().as_str().to_owned(),
                },
            ))
            .await;
        }
        self.announce(&issue);
        Ok(ResolutionOutcome {
            issue,
            transition,
            changed: true,
        })
    }

    /// Confirms a resolution on behalf of the issue's reporter.
    ///
    /// Solves an issue pending confirmation and credits the tagged leader.
    /// A confirmation ahead of the leader is recorded but leaves the issue
    /// open. Repeating the call changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::NotReporter`] when `actor` did not
    /// report the issue, and [`IssueServiceError::Repository`] for stale
    /// writes.
    pub async fn confirm_as_reporter(
        &self,
        actor: UserId,
        issue_id: IssueId,
    ) -> IssueServiceResult<ResolutionOutcome> {
        let mut issue = self.load(issue_id).await?;
        if !issue.is_reported_by(actor) {
            return Err(IssueServiceError::NotReporter {
                issue: issue_id,
                actor,
            });
        }
        if issue.is_user_confirmed() {
            debug!(issue = %issue_id, "reporter confirmation already recorded");
            return Ok(ResolutionOutcome::unchanged(issue));
        }

        let expected_version = issue.version();
        let transition = issue.apply_user_confirmation(&*self.clock);
        self.commit(&issue, expected_version, transition).await?;

        if transition.is_some() {
            if let Some(account) = self.leader_account(&issue).await {
                self.notify_committed(Activity::new(
                    actor,
                    account,
                    ActivityEvent::ReporterConfirmed {
                        issue: issue_id,
                        title: issue.title().as_str().to_owned(),
                    },
                ))
                .await;
            }
        }
        self.announce(&issue);
        Ok(ResolutionOutcome {
            issue,
            transition,
            changed: true,
        })
    }

    async fn commit(
        &self,
        issue: &Issue,
        expected_version: u64,
        transition: Option<StatusTransition>,
    ) -> IssueServiceResult<()> {
        let credited: Option<LeaderId> = transition
            .filter(|change| change.is_solve())
            .map(|_| issue.leader());
        self.store
            .commit_resolution(issue, expected_version, credited)
            .await?;
        info!(
            issue = %issue.id(),
            status = issue.status().as_str(),
            leader_resolved = issue.is_leader_resolved(),
            user_confirmed = issue.is_user_confirmed(),
            credited = credited.is_some(),
            "resolution committed"
        );
        Ok(())
    }

    async fn leader_account(&self, issue: &Issue) -> Option<UserId> {
        match self.store.find_leader(issue.leader()).await {
            Ok(leader) => leader.and_then(|found| found.account()),
            Err(err) => {
                warn!(issue = %issue.id(), error = %err, "leader lookup failed after commit");
                None
            }
        }
    }

    /// Delivers a notification for an already committed transition.
    ///
    /// The transition stands whatever happens here, so failures are logged.
    async fn notify_committed(&self, activity: Activity) {
        let recipient = activity.recipient();
        if let Err(err) = self.notifier.notify(activity).await {
            warn!(%recipient, error = %err, "notification after resolution commit failed");
        }
    }

    fn announce(&self, issue: &Issue) {
        self.notifier.announce(
            &ChannelKey::Issue(issue.id()),
            &OutboundEvent::IssueUpdate(IssueUpdate::StatusChanged {
                status: issue.status(),
                is_leader_resolved: issue.is_leader_resolved(),
                is_user_confirmed: issue.is_user_confirmed(),
            }),
        );
    }
}
