//! URL slugs for offer links.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").unwrap());

/// Lowercase, ASCII-only, hyphen-separated slug.
///
/// Text is NFKD-decomposed and whatever is still non-ASCII is dropped, so
/// accented letters keep their base letter. Anything that is not a word
/// character, whitespace or hyphen is removed, runs of whitespace and hyphens collapse
/// into one hyphen, and leading/trailing hyphens and underscores are trimmed.
///
/// # Example
///
/// ```
/// use gitcoin_mcp_server::domain::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// ```
pub fn slugify(value: &str) -> String {
    let ascii: String = value.nfkd().filter(char::is_ascii).collect();
    let cleaned = DISALLOWED.replace_all(&ascii, "").to_lowercase();
    let hyphenated = SEPARATORS.replace_all(cleaned.trim(), "-");
    hyphenated.trim_matches(|c| c == '-' || c == '_').to_string()
}
