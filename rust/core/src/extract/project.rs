// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Letter header fields: project, date, contractor, spec number, roof height

use super::{clean_value, compile, first_capture, prefix, PROJECT_WINDOW, SPEC_NUMBER_WINDOW};
use crate::record::{ExtractedField, FieldKey, ProjectInfo};
use regex::Regex;
use std::sync::LazyLock;

static SPEC_NUMBER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(?i:spec(?:ification)?|assembly)\s*(?i:#|no\.?|number|id)\s*:?\s*([A-Z0-9][A-Z0-9\-./]*)",
        r"(?m)\b(?i:spec(?:ification)?)\s*:\s*([A-Z0-9][A-Z0-9\-./]*(?:\s\d{2}\s\d{2})?)",
        r"\b(\d{2}\s\d{2}\s\d{2})\b",
    ])
});

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)^[ \t]*date\s*:\s*([^\n]+)",
        r"(?i)\b((?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+\d{1,2},?\s+\d{4})\b",
        r"\b(\d{1,2}/\d{1,2}/\d{2,4})\b",
        r"\b(\d{4}-\d{2}-\d{2})\b",
    ])
});

static CONTRACTOR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)^[ \t]*(?:roofing\s+)?(?:contractor|installer|applicator)(?:\s+name)?\s*:\s*([^\n]+)",
        r"(?i)\b(?:installed|applied)\s+by\s*:?\s*([A-Z][^\n,.]+)",
    ])
});

static CONTRACTOR_ADDRESS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)^[ \t]*(?:contractor\s+)?address\s*:\s*([^\n]+)",
        // Street line directly under the contractor line
        r"(?im)^[ \t]*(?:roofing\s+)?(?:contractor|installer|applicator)(?:\s+name)?\s*:\s*[^\n]+\n[ \t]*(\d+\s+[^\n]+)",
    ])
});

static PROJECT_NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"(?im)^[ \t]*(?:re|subject|project(?:\s+name)?|job(?:\s+name)?)\s*:\s*([^\n]+)"])
});

static RE_LOCATION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:project\s+)?(?:location|site|job\s+site)\s*:\s*([^\n]+)").unwrap()
});

static RE_CITY_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-zA-Z.]+(?:\s[A-Z][a-zA-Z.]+){0,2},\s*[A-Z]{2})\b(?:\s+\d{5}(?:-\d{4})?)?").unwrap()
});

static ROOF_HEIGHT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\b(?:building|roof|mean\s+roof|eave)\s+height\s*(?::|-|of|is)?\s*(?:up\s+to\s+|max(?:imum)?\.?\s+)?(\d+(?:\.\d+)?\s*(?:ft\.?|feet|foot|'))",
        r"(?im)^[ \t]*height\s*:\s*([^\n]+)",
    ])
});

/// Spec or assembly number, from the first 500 characters.
pub fn extract_spec_number(text: &str) -> Option<ExtractedField> {
    let window = prefix(text, SPEC_NUMBER_WINDOW);
    SPEC_NUMBER_PATTERNS
        .iter()
        .filter_map(|re| re.captures(window))
        .filter_map(|caps| caps.get(1).map(|m| clean_value(m.as_str())))
        .find(|value| value.chars().any(|c| c.is_ascii_digit()))
        .map(|value| ExtractedField::new(FieldKey::SpecNumber, value))
}

/// Letter date, from the first 1500 characters.
pub fn extract_date(text: &str) -> Option<ExtractedField> {
    first_capture(&DATE_PATTERNS, prefix(text, PROJECT_WINDOW))
        .map(|value| ExtractedField::new(FieldKey::Date, value))
}

pub fn extract_contractor(text: &str) -> Option<ExtractedField> {
    first_capture(&CONTRACTOR_PATTERNS, text)
        .map(|value| ExtractedField::new(FieldKey::Contractor, value))
}

pub fn extract_contractor_address(text: &str) -> Option<ExtractedField> {
    first_capture(&CONTRACTOR_ADDRESS_PATTERNS, text)
        .map(|value| ExtractedField::new(FieldKey::ContractorAddress, value))
}

/// Project name from a "Re:", "Subject:" or "Project:" line.
pub fn extract_project_name(text: &str) -> Option<ExtractedField> {
    first_capture(&PROJECT_NAME_PATTERNS, prefix(text, PROJECT_WINDOW))
        .map(|value| ExtractedField::new(FieldKey::ProjectName, value))
}

/// Project location.
///
/// An explicit location line wins, then a "City, ST" inside the project
/// line, then the first "City, ST" anywhere in the header window.
pub fn extract_project_location(text: &str) -> Option<ExtractedField> {
    let window = prefix(text, PROJECT_WINDOW);

    let labelled = RE_LOCATION_LABEL
        .captures(window)
        .and_then(|caps| caps.get(1))
        .map(|m| clean_value(m.as_str()));
    let in_project_line = || {
        extract_project_name(window).and_then(|project| city_state(&project.value))
    };
    let anywhere = || city_state(window);

    labelled
        .filter(|v| !v.is_empty())
        .or_else(in_project_line)
        .or_else(anywhere)
        .map(|value| ExtractedField::new(FieldKey::ProjectLocation, value))
}

fn city_state(text: &str) -> Option<String> {
    RE_CITY_STATE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| clean_value(m.as_str()))
}

pub fn extract_roof_height(text: &str) -> Option<ExtractedField> {
    first_capture(&ROOF_HEIGHT_PATTERNS, text)
        .map(|value| ExtractedField::new(FieldKey::RoofHeight, value))
}

/// Document-level facts shared by every assembly in a letter.
pub fn extract_project_info(text: &str) -> ProjectInfo {
    ProjectInfo {
        name: extract_project_name(text).map(|f| f.value),
        location: extract_project_location(text).map(|f| f.value),
        date: extract_date(text).map(|f| f.value),
        contractor: extract_contractor(text).map(|f| f.value),
        contractor_address: extract_contractor_address(text).map(|f| f.value),
        spec_number: extract_spec_number(text).map(|f| f.value),
    }
}
