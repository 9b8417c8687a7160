//! Syntactic repair and payload location for raw completions

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// One or more commas (with any whitespace) directly before a closing bracket.
/// Matching the whole comma run keeps the repair idempotent for inputs like `,,]`.
static TRAILING_ARRAY_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:,\s*)+\]").expect("Valid regex pattern"));

/// Remove trailing commas before `]`
///
/// Borrowed when nothing needed repair. Like the model output it fixes,
/// this is a textual pass and does not skip string literals.
pub fn repair_trailing_commas(text: &str) -> Cow<'_, str> {
    TRAILING_ARRAY_COMMA.replace_all(text, "]")
}

/// Slice from the first `{` through the last `}`, if that forms a span
pub fn extract_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}
