//! Feature-name slug derivation.

use regex::Regex;
use std::sync::LazyLock;

/// Default upper bound on slug length, in characters.
pub const DEFAULT_SLUG_MAX_LEN: usize = 50;

/// Characters that are neither word characters, whitespace nor hyphens.
static STRIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("Invalid strip regex"));

/// Runs of whitespace, hyphens or underscores.
static SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("Invalid separator regex"));

/// Derive a filesystem-safe slug from a feature description.
///
/// Lower-cases, strips punctuation, collapses separator runs to one hyphen,
/// truncates to `max_len` characters and trims leading/trailing hyphens.
/// Descriptions with nothing usable fall back to `"untitled"`.
///
/// ```text
/// "Add a Team Activity Log with Filtering!" -> "add-a-team-activity-log-with-filtering"
/// ```
pub fn slugify(description: &str, max_len: usize) -> String {
    let lowered = description.to_lowercase();
    let stripped = STRIP_REGEX.replace_all(&lowered, "");
    let hyphenated = SEPARATOR_REGEX.replace_all(&stripped, "-");

    let truncated: String = hyphenated.chars().take(max_len).collect();
    let slug = truncated.trim_matches('-');

    if slug.is_empty() {
        "untitled".chars().take(max_len.max(1)).collect()
    } else {
        slug.to_string()
    }
}
