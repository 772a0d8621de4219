//! Content moderation behind a pluggable classifier.
//!
//! Issue submissions pass their title and description through a
//! [`ContentClassifier`] before anything is persisted.

mod classifier;
mod keyword;

pub use classifier::{ContentClassifier, Verdict};
#[cfg(test)]
pub use classifier::MockContentClassifier;
pub use keyword::{KeywordClassifier, ModerationConfig};
