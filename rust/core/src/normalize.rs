// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text normalization
//!
//! Assembly letters frequently arrive as legacy rich text (RTF) or as PDF text
//! dumps with ragged whitespace. Both normalizers strip the markup the same
//! way; they differ only in what they do with line structure:
//!
//! - [`normalize`] collapses every whitespace run (including line breaks) to a
//!   single space. Used for individual field values.
//! - [`normalize_lines`] collapses whitespace within each line but keeps one
//!   line break between non-empty lines. Used for whole documents, since the
//!   segmenter and most field patterns are line-oriented.
//!
//! Both are idempotent and never fail.

use regex::Regex;
use std::sync::LazyLock;

// Destination groups whose text is never document content ({\fonttbl ...}, {\*\generator ...}).
// One nesting level is enough for the tables emitted by common word processors.
static RE_DESTINATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\{\\(?:\*|fonttbl|colortbl|stylesheet|info|listtable|listoverridetable)[^{}]*(?:\{[^{}]*\}[^{}]*)*\}",
    )
    .unwrap()
});

static RE_HEX_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\'[0-9a-fA-F]{2}").unwrap());

static RE_LINE_BREAK_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(?:par|line|row|page|sect)\b ?").unwrap());

static RE_CONTROL_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[a-zA-Z]+-?[0-9]* ?").unwrap());

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Normalize text to a single trimmed line with all markup removed.
pub fn normalize(raw: &str) -> String {
    let stripped = strip_markup(raw);
    RE_WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Normalize text while keeping its line structure.
///
/// Each line is whitespace-collapsed and trimmed; empty lines are dropped and
/// the remaining lines are joined with `\n`.
pub fn normalize_lines(raw: &str) -> String {
    let stripped = strip_markup(raw);
    RE_NEWLINE
        .split(&stripped)
        .map(|line| RE_WHITESPACE.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove RTF-style markup, leaving plain text with its original spacing.
///
/// Paragraph and line control words become line breaks; every other control
/// sequence, brace and backslash is removed.
fn strip_markup(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = RE_DESTINATION.replace_all(raw, "");
    let text = RE_HEX_ESCAPE.replace_all(&text, "");
    let text = RE_LINE_BREAK_WORD.replace_all(&text, "\n");
    let text = RE_CONTROL_WORD.replace_all(&text, "");

    text.chars()
        .filter(|c| !matches!(c, '{' | '}' | '\\'))
        .map(fold_typographic)
        .collect()
}

/// Fold typographic quotes and primes to their ASCII forms so that
/// dimension patterns (`1/2"`, `6'`) match regardless of source encoding.
#[inline]
fn fold_typographic(c: char) -> char {
    match c {
        '\u{201C}' | '\u{201D}' | '\u{2033}' => '"',
        '\u{2018}' | '\u{2019}' | '\u{2032}' => '\'',
        '\u{00A0}' => ' ',
        other => other,
    }
}
