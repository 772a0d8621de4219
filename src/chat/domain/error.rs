//! Error types for chat domain validation.

use thiserror::Error;

/// Errors returned while constructing or changing chat values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatDomainError {
    /// A room was requested without anyone besides the creator.
    #[error("a chat room needs at least one other participant")]
    NoParticipants,

    /// A direct room was requested with more than one other participant.
    #[error("a direct chat has exactly one other participant, got {0}")]
    DirectRoomSize(usize),

    /// The message body is empty after trimming.
    #[error("message cannot be empty")]
    EmptyMessage,

    /// A membership change named no users.
    #[error("no members selected")]
    NoMembers,

    /// The creator tried to remove themselves.
    #[error("cannot remove yourself from the group")]
    RemoveSelf,
}
