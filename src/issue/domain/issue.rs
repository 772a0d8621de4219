//! Issue aggregate root and the resolution state machine.

use super::{
    IssueDomainError, IssueId, IssueStatus, LeaderId, Location, ResolutionFlags,
    StatusTransition,
};
use crate::account::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Validated issue title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueTitle(String);

impl IssueTitle {
    const MAX_LENGTH: usize = 200;

    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyTitle`] when the trimmed value is
    /// empty, or [`IssueDomainError::TitleTooLong`] beyond 200 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, IssueDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IssueDomainError::EmptyTitle);
        }
        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(IssueDomainError::TitleTooLong {
                actual: length,
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated input for a new issue.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueDraft {
    title: IssueTitle,
    description: String,
    image_url: Option<String>,
    location: Location,
    reporter: UserId,
    leader: LeaderId,
}

impl IssueDraft {
    /// Creates a draft from validated parts.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyDescription`] when the trimmed
    /// description is empty.
    pub fn new(
        title: IssueTitle,
        description: impl Into<String>,
        location: Location,
        reporter: UserId,
        leader: LeaderId,
    ) -> Result<Self, IssueDomainError> {
        let raw = description.into();
        let description = raw.trim();
        if description.is_empty() {
            return Err(IssueDomainError::EmptyDescription);
        }
        Ok(Self {
            title,
            description: description.to_owned(),
            image_url: None,
            location,
            reporter,
            leader,
        })
    }

    /// Sets the image URL; blank values are ignored.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        let url = image_url.into();
        let trimmed = url.trim();
        self.image_url = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &IssueTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Issue aggregate root.
///
/// `status` is never assigned directly: every flag change re-derives it
/// through [`ResolutionFlags::derive_status`]. Because flags only ever move
/// from `false` to `true`, status moves forward only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    id: IssueId,
    title: IssueTitle,
    description: String,
    image_url: Option<String>,
    location: Location,
    reporter: UserId,
    leader: LeaderId,
    status: IssueStatus,
    flags: ResolutionFlags,
    flag_count: u64,
    flagged_by: BTreeSet<UserId>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted issue.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedIssueData {
    /// Persisted identifier.
    pub id: IssueId,
    /// Persisted title.
    pub title: IssueTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted image URL.
    pub image_url: Option<String>,
    /// Persisted location.
    pub location: Location,
    /// Reporting citizen.
    pub reporter: UserId,
    /// Tagged leader.
    pub leader: LeaderId,
    /// Persisted confirmation flags.
    pub flags: ResolutionFlags,
    /// Persisted flag counter.
    pub flag_count: u64,
    /// Users whose flag has been counted.
    pub flagged_by: BTreeSet<UserId>,
    /// Optimistic concurrency version.
    pub version: u64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    /// Creates a new open issue from a validated draft.
    #[must_use]
    pub fn submit(draft: IssueDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: IssueId::new(),
            title: draft.title,
            description: draft.description,
            image_url: draft.image_url,
            location: draft.location,
            reporter: draft.reporter,
            leader: draft.leader,
            status: IssueStatus::Open,
            flags: ResolutionFlags::default(),
            flag_count: 0,
            flagged_by: BTreeSet::new(),
            version: 1,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an issue from persisted storage.
    ///
    /// The status is re-derived from the persisted flags, so a stored
    /// status column can never contradict them.
    #[must_use]
    pub fn from_persisted(data: PersistedIssueData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            image_url: data.image_url,
            location: data.location,
            reporter: data.reporter,
            leader: data.leader,
            status: data.flags.derive_status(),
            flags: data.flags,
            flag_count: data.flag_count,
            flagged_by: data.flagged_by,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the issue identifier.
    #[must_use]
    pub const fn id(&self) -> IssueId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &IssueTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the image URL, if any.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Returns the location.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Returns the reporting citizen.
    #[must_use]
    pub const fn reporter(&self) -> UserId {
        self.reporter
    }

    /// Returns the public reporter tag: the last four characters of the
    /// reporter identifier.
    #[must_use]
    pub fn anonymous_reporter(&self) -> String {
        let id = self.reporter.to_string();
        let start = id.len().saturating_sub(4);
        id.get(start..).unwrap_or_default().to_owned()
    }

    /// Returns the tagged leader.
    #[must_use]
    pub const fn leader(&self) -> LeaderId {
        self.leader
    }

    /// Returns the resolution status.
    #[must_use]
    pub const fn status(&self) -> IssueStatus {
        self.status
    }

    /// Returns the confirmation flags.
    #[must_use]
    pub const fn flags(&self) -> ResolutionFlags {
        self.flags
    }

    /// Returns whether the tagged leader has marked the issue resolved.
    #[must_use]
    pub const fn is_leader_resolved(&self) -> bool {
        self.flags.leader_resolved
    }

    /// Returns whether the reporter has confirmed the resolution.
    #[must_use]
    pub const fn is_user_confirmed(&self) -> bool {
        self.flags.user_confirmed
    }

    /// Returns the abuse flag counter.
    #[must_use]
    pub const fn flag_count(&self) -> u64 {
        self.flag_count
    }

    /// Returns the users whose flag has been counted.
    #[must_use]
    pub const fn flagged_by(&self) -> &BTreeSet<UserId> {
        &self.flagged_by
    }

    /// Returns the optimistic concurrency version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `user` reported this issue.
    #[must_use]
    pub fn is_reported_by(&self, user: UserId) -> bool {
        self.reporter == user
    }

    /// Sets the leader-resolved flag and re-derives the status.
    ///
    /// Returns the resulting transition, or `None` when the flag was already
    /// set (the call is then a no-op and the version is unchanged).
    pub fn apply_leader_resolution(&mut self, clock: &impl Clock) -> Option<StatusTransition> {
        if self.flags.leader_resolved {
            return None;
        }
        self.flags.leader_resolved = true;
        self.touch(clock);
        self.rederive_status()
    }

    /// Sets the user-confirmed flag and re-derives the status.
    ///
    /// Returns the resulting transition, or `None` when the flag was already
    /// set or the status did not change (confirmation ahead of the leader).
    pub fn apply_user_confirmation(&mut self, clock: &impl Clock) -> Option<StatusTransition> {
        if self.flags.user_confirmed {
            return None;
        }
        self.flags.user_confirmed = true;
        self.touch(clock);
        self.rederive_status()
    }

    /// Counts a flag raised by `user`.
    ///
    /// Each user's flag counts once; returns `false` for a repeat.
    pub fn flag(&mut self, user: UserId, clock: &impl Clock) -> bool {
        if !self.flagged_by.insert(user) {
            return false;
        }
        self.flag_count = self.flag_count.saturating_add(1);
        self.touch(clock);
        true
    }

    fn rederive_status(&mut self) -> Option<StatusTransition> {
        let next = self.flags.derive_status();
        if next == self.status {
            return None;
        }
        let transition = StatusTransition {
            from: self.status,
            to: next,
        };
        self.status = next;
        Some(transition)
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.version = self.version.saturating_add(1);
        self.updated_at = clock.utc();
    }
}
