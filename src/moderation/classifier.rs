//! Classifier port.

use async_trait::async_trait;
use serde::Serialize;

/// Outcome of classifying a piece of user content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// The content may be published.
    Legitimate,
    /// The content must be rejected.
    Abusive {
        /// Why the content was rejected.
        reason: String,
    },
}

impl Verdict {
    /// Returns whether the content must be rejected.
    #[must_use]
    pub const fn is_abusive(&self) -> bool {
        matches!(self, Self::Abusive { .. })
    }
}

/// Decides whether user content is acceptable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentClassifier: Send + Sync {
    /// Classifies `text`.
    async fn classify(&self, text: &str) -> Verdict;
}
