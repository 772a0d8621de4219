//! `@username` mention extraction.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

#[expect(clippy::unwrap_used, reason = "pattern is a compile-time constant")]
static MENTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w@])@(\w+(?:[.+\-]\w+)*)").unwrap());

/// Extracts the distinct, case-folded usernames mentioned in `text`.
///
/// Trailing punctuation is not part of a mention, so `"thanks @bob."`
/// yields `bob`. E-mail addresses are not mentions.
#[must_use]
pub fn extract_mentions(text: &str) -> BTreeSet<String> {
    MENTION_PATTERN
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str().to_lowercase())
        .collect()
}
