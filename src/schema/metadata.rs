use std::sync::LazyLock;

use regex::Regex;

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z])([A-Z])").expect("static regex"));

/// Turns an identifier (`branch_icon`, `displayStatus`) into a human label
/// (`Branch Icon`, `Display Status`).
///
/// Only the first character of each word is upper-cased; the rest is kept
/// as written, so `URLPath` stays `URLPath`.
pub fn format_label(raw: &str) -> String {
    let spaced = raw.replace('_', " ");
    let split = CAMEL_BOUNDARY.replace_all(&spaced, "$1 $2");
    split
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Same transform as [`format_label`], applied to enum values.
pub fn format_enum_label(raw: &str) -> String {
    format_label(raw)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
