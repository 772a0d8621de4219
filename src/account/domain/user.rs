//! User account aggregate.

use super::{AccountDomainError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated login name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 150;

    /// Creates a validated username.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::InvalidUsername`] when the trimmed value
    /// is empty, longer than 150 characters, or contains characters other
    /// than letters, digits and `@.+-_`.
    pub fn new(value: impl Into<String>) -> Result<Self, AccountDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let is_valid = !trimmed.is_empty()
            && trimmed.chars().count() <= Self::MAX_LENGTH
            && trimmed
                .chars()
                .all(|ch| ch.is_alphanumeric() || matches!(ch, '@' | '.' | '+' | '-' | '_'));
        if !is_valid {
            return Err(AccountDomainError::InvalidUsername(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the username as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
    email: Option<String>,
    joined_at: DateTime<Utc>,
}

impl User {
    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: UserId,
        username: Username,
        email: Option<String>,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            joined_at,
        }
    }

    /// Creates a new user account.
    #[must_use]
    pub fn register(username: Username, email: Option<String>, clock: &impl Clock) -> Self {
        Self {
            id: UserId::new(),
            username,
            email: email
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty()),
            joined_at: clock.utc(),
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the login name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the email address, if one was supplied.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }
}
