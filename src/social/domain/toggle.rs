//! Results of toggling engagement.

use serde::Serialize;

/// Like state after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeToggle {
    /// Whether the user now likes the target.
    pub liked: bool,
    /// Like count after the toggle.
    pub like_count: u64,
}

/// Engagement counters for an issue as seen by one viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngagementSnapshot {
    /// Number of likes.
    pub like_count: u64,
    /// Number of comments and replies.
    pub comment_count: u64,
    /// Whether the viewer likes the issue.
    pub liked: bool,
    /// Whether the viewer bookmarked the issue.
    pub bookmarked: bool,
}
