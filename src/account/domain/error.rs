//! Error types for account domain validation.

use super::UserId;
use thiserror::Error;

/// Errors returned while constructing account domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountDomainError {
    /// The username is empty, too long or contains unsupported characters.
    #[error("invalid username '{0}', expected 1-150 letters, digits or @.+-_")]
    InvalidUsername(String),

    /// The biography exceeds the supported length.
    #[error("bio has {actual} characters, exceeds limit of {max}")]
    BioTooLong {
        /// Number of characters supplied.
        actual: usize,
        /// Maximum accepted number of characters.
        max: usize,
    },

    /// A user attempted to follow themselves.
    #[error("user {0} cannot follow themselves")]
    SelfFollow(UserId),
}
