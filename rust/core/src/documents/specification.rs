// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Project manual roofing sections (CSI format)

use super::PartialRecord;
use crate::extract::{
    compile, extract_fm_global, extract_manufacturer, extract_system_type, UNKNOWN_MANUFACTURER,
};
use regex::Regex;
use std::sync::LazyLock;

static RE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*section\s+(\d{2}\s?\d{2}\s?\d{2}(?:\.\d+)?)[ \t]*(?:-[ \t]*)?([^\n]*)(?:\n([^\n]*))?")
        .unwrap()
});

static RE_MEMBRANE_MILS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{2,3})\s*-?\s*mils?\b").unwrap());

static WARRANTY: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\b(\d{1,2}|ten|twelve|fifteen|twenty|twenty-five|thirty)\s*[- ]?\s*(?:\(\d{1,2}\)\s*)?years?\b[^\n]{0,40}?\bwarranty\b",
        r"(?i)\bwarranty\b[^\n]{0,60}?\b(\d{1,2}|ten|twelve|fifteen|twenty|twenty-five|thirty)\s*[- ]?\s*(?:\(\d{1,2}\)\s*)?years?\b",
    ])
});

fn word_to_years(word: &str) -> Option<u32> {
    match word.to_ascii_lowercase().as_str() {
        "ten" => Some(10),
        "twelve" => Some(12),
        "fifteen" => Some(15),
        "twenty" => Some(20),
        "twenty-five" => Some(25),
        "thirty" => Some(30),
        digits => digits.parse().ok(),
    }
}

/// Heading lines are upper case; a following line only counts as the title if it is one.
fn is_heading(line: &str) -> bool {
    let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    !letters.is_empty() && letters.iter().all(|c| c.is_uppercase())
}

pub(super) fn extract(text: &str, record: &mut PartialRecord) {
    if let Some(caps) = RE_SECTION.captures(text) {
        if let Some(number) = caps.get(1) {
            record.push("section_number", number.as_str());
        }
        let same_line = caps.get(2).map(|m| m.as_str().trim()).filter(|t| !t.is_empty());
        let next_line = caps.get(3).map(|m| m.as_str().trim()).filter(|t| is_heading(t));
        if let Some(title) = same_line.or(next_line) {
            record.push("section_title", title);
        }
    }

    let manufacturer = extract_manufacturer(text);
    if manufacturer != UNKNOWN_MANUFACTURER {
        record.push("manufacturer", manufacturer);
    }
    if let Some(system) = extract_system_type(text) {
        record.push("system_type", system);
    }
    if let Some(mils) = RE_MEMBRANE_MILS.captures(text).and_then(|c| c.get(1)) {
        record.push("membrane_thickness", format!("{} mil", mils.as_str()));
    }

    let years = WARRANTY
        .iter()
        .find_map(|re| re.captures(text).and_then(|c| c.get(1)))
        .and_then(|m| word_to_years(m.as_str()));
    if let Some(years) = years {
        record.push("warranty_years", years.to_string());
    }

    if let Some(fm) = extract_fm_global(text) {
        record.push("fm_global", fm.value);
    }
}
