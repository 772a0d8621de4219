//! Hashtag extraction and the hashtag usage record.

use super::{IssueDomainError, IssueId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

#[expect(clippy::unwrap_used, reason = "pattern is a compile-time constant")]
static HASHTAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\w+)").unwrap());

#[expect(clippy::unwrap_used, reason = "pattern is a compile-time constant")]
static HASHTAG_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").unwrap());

/// Maximum hashtag length in characters.
pub const HASHTAG_MAX_CHARS: usize = 100;

/// Case-folded hashtag name without the leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashtagName(String);

impl HashtagName {
    /// Creates a case-folded hashtag name; a leading `#` is stripped.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::InvalidHashtag`] when the name is empty
    /// or contains anything other than word characters, and
    /// [`IssueDomainError::HashtagTooLong`] beyond 100 characters.
    pub fn new(value: &str) -> Result<Self, IssueDomainError> {
        let trimmed = value.trim();
        let bare = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !HASHTAG_NAME.is_match(bare) {
            return Err(IssueDomainError::InvalidHashtag(value.to_owned()));
        }
        let folded = bare.to_lowercase();
        let actual = folded.chars().count();
        if actual > HASHTAG_MAX_CHARS {
            return Err(IssueDomainError::HashtagTooLong {
                actual,
                max: HASHTAG_MAX_CHARS,
            });
        }
        Ok(Self(folded))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashtagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Extracts the distinct, case-folded hashtags in `text`.
#[must_use]
pub fn extract_hashtags(text: &str) -> BTreeSet<HashtagName> {
    HASHTAG_PATTERN
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .filter_map(|tag| HashtagName::new(tag.as_str()).ok())
        .collect()
}

/// Hashtag usage record.
///
/// `usage_count` counts distinct issues tagged with the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hashtag {
    name: HashtagName,
    usage_count: u64,
    issues: BTreeSet<IssueId>,
}

impl Hashtag {
    /// Creates an unused hashtag record.
    #[must_use]
    pub const fn new(name: HashtagName) -> Self {
        Self {
            name,
            usage_count: 0,
            issues: BTreeSet::new(),
        }
    }

    /// Reconstructs a hashtag from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        name: HashtagName,
        usage_count: u64,
        issues: BTreeSet<IssueId>,
    ) -> Self {
        Self {
            name,
            usage_count,
            issues,
        }
    }

    /// Returns the name.
    #[must_use]
    pub const fn name(&self) -> &HashtagName {
        &self.name
    }

    /// Returns the number of distinct issues tagged.
    #[must_use]
    pub const fn usage_count(&self) -> u64 {
        self.usage_count
    }

    /// Returns the tagged issues.
    #[must_use]
    pub const fn issues(&self) -> &BTreeSet<IssueId> {
        &self.issues
    }

    /// Pairs the hashtag with `issue`.
    ///
    /// The usage counter increments only the first time a pairing is
    /// observed; returns whether it did.
    pub fn tag(&mut self, issue: IssueId) -> bool {
        if !self.issues.insert(issue) {
            return false;
        }
        self.usage_count = self.usage_count.saturating_add(1);
        true
    }
}
