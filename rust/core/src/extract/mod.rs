// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Field extractors
//!
//! Every extractor is an independent function from text to an optional
//! [`ExtractedField`](crate::ExtractedField). They hold ordered pattern lists,
//! most specific first, and the first pattern that matches wins. Extractors
//! never fail: text they do not recognise yields `None`.
//!
//! Most patterns are line-oriented and expect [`normalize_lines`] output.
//!
//! [`normalize_lines`]: crate::normalize_lines

mod approvals;
mod layers;
mod project;
mod tables;

pub use approvals::{extract_astm, extract_fm_global, extract_roofnav, extract_ul_class};
pub use layers::{
    extract_coverboard, extract_deck_slope, extract_insulation, extract_membrane,
    extract_vapor_barrier, split_dimension,
};
pub use project::{
    extract_contractor, extract_contractor_address, extract_date, extract_project_info,
    extract_project_location, extract_project_name, extract_roof_height, extract_spec_number,
};
pub use tables::{extract_manufacturer, extract_system_type, split_product_attachment, UNKNOWN_MANUFACTURER};

use crate::normalize::normalize;
use regex::Regex;
use std::sync::LazyLock;

/// Prefix window for spec numbers
pub const SPEC_NUMBER_WINDOW: usize = 500;
/// Prefix window for system types
pub const SYSTEM_TYPE_WINDOW: usize = 1000;
/// Prefix window for the manufacturer
pub const MANUFACTURER_WINDOW: usize = 2000;
/// Prefix window for project name, location and date
pub const PROJECT_WINDOW: usize = 1500;

// A second "Label: value" pair on the same line ends the current value.
static RE_INLINE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        concat!(
            r"(?i)\s+(?:(?:top|upper|bottom|lower|1st|2nd|3rd|first|second|third|base|cap|primary|roof|structural|existing)\s+)?",
            r"(?:slope|fm\s+global|ul\s+class|roof\s*nav|warranty|building\s+height|roof\s+height|deck|membrane|insulation|(?:re)?cover\s*board|vapou?r\s+(?:barrier|retarder)|attachment)",
            r"(?:\s*(?:layer\s*)?(?:#|no\.?)?\s*\d)?\s*:",
        ),
    )
    .unwrap()
});

/// Compile a pattern list.
pub(crate) fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

/// Compile a `(name, pattern)` table.
pub(crate) fn compile_table(table: &[(&'static str, &str)]) -> Vec<(&'static str, Regex)> {
    table
        .iter()
        .map(|(name, p)| (*name, Regex::new(p).unwrap()))
        .collect()
}

/// The longest prefix of `text` that is at most `max` bytes and ends on a
/// char boundary.
pub fn prefix(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Capture group 1 of the first pattern that matches, cleaned.
pub(crate) fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .filter_map(|re| re.captures(text))
        .filter_map(|caps| caps.get(1).map(|m| clean_value(m.as_str())))
        .find(|value| !value.is_empty())
}

/// Trim a captured line value: cut at a following inline label, collapse
/// whitespace, strip trailing punctuation.
pub(crate) fn clean_value(raw: &str) -> String {
    let cut = match RE_INLINE_LABEL.find(raw) {
        Some(m) => &raw[..m.start()],
        None => raw,
    };
    normalize(cut)
        .trim_end_matches(|c: char| matches!(c, ',' | ';' | ':' | '.' | '-') || c.is_whitespace())
        .to_string()
}
