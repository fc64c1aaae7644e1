//! Export-side text safety: tag stripping, control-character removal,
//! HTML escaping and length truncation.
//!
//! None of these functions fail. Empty input yields an empty string.
//! `sanitize_text` removes hostile structure; `escape_html` keeps every
//! character but renders markup-significant ones as entities. The two are
//! chained (`escape_html(&sanitize_text(x))`) for HTML-based documents.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Suffix appended by [`truncate_text`].
pub const DEFAULT_TRUNCATION_SUFFIX: &str = "...";

static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Strip markup tags and ASCII control characters.
///
/// Tag removal repeats until a pass changes nothing, so malformed or
/// overlapping tags (`<script<script>`) cannot survive. Newline and tab are
/// kept. Entities written as text (`&lt;`) and all non-ASCII content pass
/// through untouched.
pub fn sanitize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let stripped = strip_markup_tags(text);
    remove_control_characters(&stripped)
}

/// Repeatedly remove `<...>` runs until the text is stable.
///
/// Each productive pass removes at least two bytes, so the byte length
/// bounds the number of passes.
fn strip_markup_tags(text: &str) -> String {
    let mut current = text.to_string();
    let mut passes = 0usize;
    let max_passes = text.len();

    while passes <= max_passes {
        let next = match MARKUP_TAG.replace_all(&current, "") {
            Cow::Borrowed(_) => break,
            Cow::Owned(s) => s,
        };
        current = next;
        passes += 1;
    }

    if passes > 1 {
        tracing::debug!(passes, "Markup stripping needed multiple passes");
    }
    current
}

/// Remove 0x00-0x08, 0x0B, 0x0C, 0x0E-0x1F and 0x7F.
/// Tab (0x09), newline (0x0A) and carriage return (0x0D) are kept.
fn remove_control_characters(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(
                *c,
                '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}'
            )
        })
        .collect()
}

/// Escape `& < > " '` as `&amp; &lt; &gt; &quot; &#39;` in a single pass.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Truncate to `max_length` characters using [`DEFAULT_TRUNCATION_SUFFIX`].
pub fn truncate_text(text: &str, max_length: usize) -> String {
    truncate_text_with_suffix(text, max_length, DEFAULT_TRUNCATION_SUFFIX)
}

/// Truncate to exactly `max_length` characters, the tail replaced by `suffix`.
///
/// Text of `max_length` characters or fewer is returned unchanged. Lengths
/// count Unicode scalar values, never bytes, so multi-byte text is never
/// split mid-character.
pub fn truncate_text_with_suffix(text: &str, max_length: usize, suffix: &str) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let keep = max_length.saturating_sub(suffix.chars().count());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(suffix);
    truncated
}
