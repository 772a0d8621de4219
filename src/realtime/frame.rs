//! Inbound socket frames.

use crate::notification::domain::NotificationId;
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

/// Frame accepted on a chat room socket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatFrame {
    /// Post a message to the room.
    ChatMessage {
        /// Message text.
        message: String,
        /// Optional attachment URL.
        #[serde(default)]
        file_url: Option<String>,
    },
}

/// Frame accepted on a notification socket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NotificationFrame {
    /// Mark one of the recipient's notifications read.
    MarkRead {
        /// Notification to mark.
        notification_id: NotificationId,
    },
}

/// Frame accepted on an issue socket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum IssueFrame {
    /// Post a top-level comment.
    NewComment {
        /// Comment text.
        content: String,
    },
    /// Toggle the sender's like.
    NewLike,
}

/// Errors raised while decoding an inbound frame.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The frame is not valid JSON.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// The frame is JSON but names no supported action or lacks fields.
    #[error("unsupported frame: {0}")]
    Unsupported(String),
}

/// Decodes a text frame into the channel's frame type.
///
/// # Errors
///
/// Returns [`FrameError::Malformed`] for invalid JSON and
/// [`FrameError::Unsupported`] for JSON that does not match any frame.
pub fn parse_frame<T: DeserializeOwned>(text: &str) -> Result<T, FrameError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|err| FrameError::Malformed(err.to_string()))?;
    serde_json::from_value(value).map_err(|err| FrameError::Unsupported(err.to_string()))
}
