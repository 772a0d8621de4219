//! Keyword and length based classifier.

use super::{ContentClassifier, Verdict};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

fn default_keywords() -> Vec<String> {
    [
        "spam",
        "fake",
        "scam",
        "hate",
        "abuse",
        "harassment",
        "threat",
        "violence",
        "illegal",
        "fraud",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

const fn default_min_length() -> usize {
    10
}

/// Settings for [`KeywordClassifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Case-insensitive substrings that mark content abusive.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Minimum trimmed length, in characters, of legitimate content.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            min_length: default_min_length(),
        }
    }
}

/// Rejects content that contains a configured keyword or is too short.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
    min_length: usize,
}

impl KeywordClassifier {
    /// Creates a classifier from configuration.
    #[must_use]
    pub fn new(config: &ModerationConfig) -> Self {
        Self {
            keywords: config
                .keywords
                .iter()
                .map(|keyword| keyword.trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
            min_length: config.min_length,
        }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(&ModerationConfig::default())
    }
}

#[async_trait]
impl ContentClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Verdict {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.min_length {
            return Verdict::Abusive {
                reason: format!("content is shorter than {} characters", self.min_length),
            };
        }
        let lowered = trimmed.to_lowercase();
        match self.keywords.iter().find(|keyword| lowered.contains(keyword.as_str())) {
            Some(keyword) => Verdict::Abusive {
                reason: format!("content contains blocked term '{keyword}'"),
            },
            None => Verdict::Legitimate,
        }
    }
}
