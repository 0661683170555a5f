// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Code-approval references

use super::{compile, first_capture};
use crate::record::{ExtractedField, FieldKey};
use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::LazyLock;

/// At most this many ASTM codes are kept per assembly.
pub const MAX_ASTM_CODES: usize = 5;

static ROOFNAV_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"(?i)\broof\s*nav\b[^\n\d]{0,40}(\d{4,7})\b"]));

static FM_GLOBAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\bFM\s+Global\s*(?:approval|approved|listing|rating|classification|class)?\s*(?::|-\s)\s*([^\n]+)",
        r"(?i)\bFM\b[^\n\d]{0,30}(1-\d{2,3}\b)",
    ])
});

static UL_CLASS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\bUL\b[^\n]{0,20}?\bclass\s*([ABC])\b",
        r"(?i)\bclass\s*([ABC])\b[^\n]{0,20}?\bUL\b",
    ])
});

static RE_ASTM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bASTM\s*#?\s*([A-Z])\s*-?\s*(\d{1,5})\b").unwrap()
});

/// FM Approvals RoofNav assembly number
pub fn extract_roofnav(text: &str) -> Option<ExtractedField> {
    first_capture(&ROOFNAV_PATTERNS, text)
        .map(|value| ExtractedField::new(FieldKey::ApprovalRoofNav, value))
}

/// FM Global listing or wind-uplift rating text
pub fn extract_fm_global(text: &str) -> Option<ExtractedField> {
    first_capture(&FM_GLOBAL_PATTERNS, text)
        .map(|value| ExtractedField::new(FieldKey::ApprovalFmGlobal, value))
}

/// UL fire classification letter
pub fn extract_ul_class(text: &str) -> Option<ExtractedField> {
    first_capture(&UL_CLASS_PATTERNS, text)
        .map(|value| ExtractedField::new(FieldKey::ApprovalUlClass, value.to_ascii_uppercase()))
}

/// Referenced ASTM standards, deduplicated in order of appearance, joined with ", ".
pub fn extract_astm(text: &str) -> Option<ExtractedField> {
    let mut seen = FxHashSet::default();
    let codes: Vec<String> = RE_ASTM
        .captures_iter(text)
        .filter_map(|caps| {
            let letter = caps.get(1)?.as_str().to_ascii_uppercase();
            let number = caps.get(2)?.as_str();
            Some(format!("ASTM {letter}{number}"))
        })
        .filter(|code| seen.insert(code.clone()))
        .take(MAX_ASTM_CODES)
        .collect();

    if codes.is_empty() {
        None
    } else {
        Some(ExtractedField::new(FieldKey::ApprovalAstm, codes.join(", ")))
    }
}
