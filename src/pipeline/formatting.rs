//! Cosmetic re-flow of extracted clinical text for generated documents.
//! No security role; run the sanitizer separately before embedding.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default soft-wrap width in characters.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 80;

static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?]) +(\p{Lu})").unwrap());
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[•*\-]+|\d+[.)](?:\s+|$))\s*").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    /// Soft-wrap width. Zero disables wrapping.
    pub max_line_length: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

/// Tidy free clinical text.
///
/// Collapses space runs, starts a new line after `.`/`!`/`?` when the next
/// word is capitalised, soft-wraps long lines at word boundaries and caps
/// blank-line runs at one. Slash abbreviations (`s/p`, `h/o`) and units are
/// left as written. Blank input yields an empty string.
pub fn format_medical_text(text: &str, options: &FormatOptions) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let spaced = MULTI_SPACE.replace_all(text, " ");
    let broken = SENTENCE_BREAK.replace_all(&spaced, "${1}\n${2}");

    let wrapped = broken
        .lines()
        .map(|line| wrap_line(line.trim(), options.max_line_length))
        .collect::<Vec<_>>()
        .join("\n");

    EXCESS_NEWLINES
        .replace_all(&wrapped, "\n\n")
        .trim()
        .to_string()
}

/// Greedy word wrap. A single word longer than `max` keeps its own line.
fn wrap_line(line: &str, max: usize) -> String {
    if max == 0 || line.chars().count() <= max {
        return line.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in line.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}

/// One medication per line.
///
/// Splits on newlines, then semicolons, then commas followed by a capital
/// letter (so a dosing clause like "500mg, with meals" stays whole). Leading
/// bullets (`•`, `-`, `*`) and enumerations (`1.`, `2)`) followed by a space
/// are dropped, so `2.5mg` keeps its dose. Each entry is trimmed and its
/// first letter capitalised. Blank input yields an empty string.
pub fn format_medication_list(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    text.lines()
        .flat_map(|line| line.split(';'))
        .flat_map(split_before_capitalised_item)
        .map(|item| LIST_MARKER.replace(item, "").trim().to_string())
        .filter(|item| !item.is_empty())
        .map(|item| capitalise_first(&item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split at commas whose next non-space character is uppercase.
fn split_before_capitalised_item(segment: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for (i, c) in segment.char_indices() {
        if c != ',' {
            continue;
        }
        let next_is_upper = segment[i + 1..]
            .trim_start()
            .chars()
            .next()
            .is_some_and(char::is_uppercase);
        if next_is_upper {
            parts.push(&segment[start..i]);
            start = i + 1;
        }
    }
    parts.push(&segment[start..]);
    parts
}

fn capitalise_first(item: &str) -> String {
    let mut chars = item.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
