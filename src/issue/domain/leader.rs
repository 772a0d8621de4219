//! Civic leader aggregate.

use super::{IssueDomainError, LeaderId};
use crate::account::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A designated official who resolves issues tagged to them.
///
/// `solved_problems` only increases, once per issue entering the solved
/// status, and only through the resolution commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    id: LeaderId,
    name: String,
    designation: String,
    solved_problems: u64,
    profile_picture: Option<String>,
    account: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted leader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedLeaderData {
    /// Persisted identifier.
    pub id: LeaderId,
    /// Display name.
    pub name: String,
    /// Office held, e.g. "Council Member".
    pub designation: String,
    /// Solved issue counter.
    pub solved_problems: u64,
    /// Profile picture URL.
    pub profile_picture: Option<String>,
    /// Linked login account.
    pub account: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Maximum leader name and designation length in characters.
pub const LEADER_FIELD_MAX_CHARS: usize = 100;

fn required(value: &str, field: &'static str) -> Result<String, IssueDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IssueDomainError::EmptyLeaderField(field));
    }
    let actual = trimmed.chars().count();
    if actual > LEADER_FIELD_MAX_CHARS {
        return Err(IssueDomainError::LeaderFieldTooLong {
            field,
            actual,
            max: LEADER_FIELD_MAX_CHARS,
        });
    }
    Ok(trimmed.to_owned())
}

impl Leader {
    /// Registers a new leader with a zero solved counter.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyLeaderField`] when the name or
    /// designation is blank, or [`IssueDomainError::LeaderFieldTooLong`]
    /// beyond 100 characters.
    pub fn register(
        name: &str,
        designation: &str,
        clock: &impl Clock,
    ) -> Result<Self, IssueDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: LeaderId::new(),
            name: required(name, "name")?,
            designation: required(designation, "designation")?,
            solved_problems: 0,
            profile_picture: None,
            account: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a leader from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedLeaderData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            designation: data.designation,
            solved_problems: data.solved_problems,
            profile_picture: data.profile_picture,
            account: data.account,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Links the login account that acts for this leader.
    #[must_use]
    pub const fn with_account(mut self, account: UserId) -> Self {
        self.account = Some(account);
        self
    }

    /// Sets the profile picture URL.
    #[must_use]
    pub fn with_profile_picture(mut self, url: impl Into<String>) -> Self {
        self.profile_picture = Some(url.into());
        self
    }

    /// Returns the leader identifier.
    #[must_use]
    pub const fn id(&self) -> LeaderId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the designation.
    #[must_use]
    pub fn designation(&self) -> &str {
        &self.designation
    }

    /// Returns the solved issue counter.
    #[must_use]
    pub const fn solved_problems(&self) -> u64 {
        self.solved_problems
    }

    /// Returns the profile picture URL, if any.
    #[must_use]
    pub fn profile_picture(&self) -> Option<&str> {
        self.profile_picture.as_deref()
    }

    /// Returns the linked login account, if any.
    #[must_use]
    pub const fn account(&self) -> Option<UserId> {
        self.account
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

    /// Returns whether `user` is the account acting for this leader.
    #[must_use]
    pub fn is_operated_by(&self, user: UserId) -> bool {
        self.account == Some(user)
    }

    /// Credits one solved issue.
    pub fn credit_solved(&mut self, at: DateTime<Utc>) {
        self.solved_problems = self.solved_problems.saturating_add(1);
        self.updated_at = at;
    }
}
