//! Error types for social domain validation.

use thiserror::Error;

/// Errors returned while constructing social domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SocialDomainError {
    /// The comment body is empty after trimming.
    #[error("comment must not be empty")]
    EmptyComment,

    /// The comment body exceeds the supported length.
    #[error("comment has {actual} characters, exceeds limit of {max}")]
    CommentTooLong {
        /// Number of characters supplied.
        actual: usize,
        /// Maximum accepted number of characters.
        max: usize,
    },
}
