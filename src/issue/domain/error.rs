//! Error types for issue domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing issue domain values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IssueDomainError {
    /// The issue title is empty after trimming.
    #[error("issue title must not be empty")]
    EmptyTitle,

    /// The issue title exceeds the supported length.
    #[error("issue title has {actual} characters, exceeds limit of {max}")]
    TitleTooLong {
        /// Number of characters supplied.
        actual: usize,
        /// Maximum accepted number of characters.
        max: usize,
    },

    /// The issue description is empty after trimming.
    #[error("issue description must not be empty")]
    EmptyDescription,

    /// The coordinates are not a valid position.
    #[error("invalid location ({latitude}, {longitude})")]
    InvalidLocation {
        /// Supplied latitude.
        latitude: f64,
        /// Supplied longitude.
        longitude: f64,
    },

    /// A leader name or designation is empty.
    #[error("leader {0} must not be empty")]
    EmptyLeaderField(&'static str),

    /// A leader name or designation exceeds the supported length.
    #[error("leader {field} has {actual} characters, exceeds limit of {max}")]
    LeaderFieldTooLong {
        /// Offending field.
        field: &'static str,
        /// Number of characters supplied.
        actual: usize,
        /// Maximum accepted number of characters.
        max: usize,
    },

    /// A hashtag contains characters other than word characters.
    #[error("invalid hashtag '{0}'")]
    InvalidHashtag(String),

    /// A hashtag exceeds the supported length.
    #[error("hashtag has {actual} characters, exceeds limit of {max}")]
    HashtagTooLong {
        /// Number of characters supplied.
        actual: usize,
        /// Maximum accepted number of characters.
        max: usize,
    },
}

/// Error returned while parsing issue statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown issue status: {0}")]
pub struct ParseIssueStatusError(pub String);
