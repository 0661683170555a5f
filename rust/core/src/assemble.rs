// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Assembly letter parsing
//!
//! [`parse_assembly_letter`] drives the whole text stage: normalize, segment,
//! extract document-level facts once, then [`assemble`] one record per span.

use crate::extract::{
    self, extract_astm, extract_coverboard, extract_deck_slope, extract_fm_global,
    extract_insulation, extract_membrane, extract_roof_height, extract_roofnav,
    extract_spec_number, extract_system_type, extract_ul_class, extract_vapor_barrier,
    UNKNOWN_MANUFACTURER,
};
use crate::normalize::normalize_lines;
use crate::record::{AssemblyRecord, ExtractedField, FieldKey, ProjectInfo};
use crate::segment::{area_names, segment};
use serde::{Deserialize, Serialize};

/// Result of parsing one assembly letter.
///
/// A letter describing a single roof area yields a flat record; a letter with
/// several named roof areas yields the shared header plus one record per area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParsedLetter {
    Multi(MultiAssembly),
    Single(AssemblyRecord),
}

/// Shared header and per-area records of a multi-assembly letter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiAssembly {
    pub manufacturer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub assemblies: Vec<AssemblyRecord>,
}

impl ParsedLetter {
    /// Every record in document order
    pub fn assemblies(&self) -> &[AssemblyRecord] {
        match self {
            ParsedLetter::Single(record) => std::slice::from_ref(record),
            ParsedLetter::Multi(multi) => &multi.assemblies,
        }
    }

    pub fn into_assemblies(self) -> Vec<AssemblyRecord> {
        match self {
            ParsedLetter::Single(record) => vec![record],
            ParsedLetter::Multi(multi) => multi.assemblies,
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, ParsedLetter::Multi(_))
    }
}

/// Build the record for one span.
///
/// Span-level values take precedence; the document's spec number and
/// contractor fill in when the span does not state them.
pub fn assemble(
    span_text: &str,
    assembly_name: Option<&str>,
    manufacturer: &str,
    project: &ProjectInfo,
) -> AssemblyRecord {
    let mut record = AssemblyRecord::new();

    if let Some(name) = assembly_name {
        record.insert(FieldKey::RoofArea, name);
    }

    let spec_number = extract_spec_number(span_text).map(|f| f.value);
    if let Some(spec) = spec_number.or_else(|| project.spec_number.clone()) {
        record.insert(FieldKey::SpecNumber, spec);
    }

    if manufacturer != UNKNOWN_MANUFACTURER {
        record.insert(FieldKey::Manufacturer, manufacturer);
    }
    if let Some(system) = extract_system_type(span_text) {
        record.insert(FieldKey::SystemType, system);
    }

    insert_opt(&mut record, FieldKey::Date, project.date.as_deref());

    let contractor = extract::extract_contractor(span_text).map(|f| f.value);
    insert_opt(
        &mut record,
        FieldKey::Contractor,
        contractor.as_deref().or(project.contractor.as_deref()),
    );
    let address = extract::extract_contractor_address(span_text).map(|f| f.value);
    insert_opt(
        &mut record,
        FieldKey::ContractorAddress,
        address.as_deref().or(project.contractor_address.as_deref()),
    );

    insert_opt(&mut record, FieldKey::ProjectName, project.name.as_deref());
    insert_opt(&mut record, FieldKey::ProjectLocation, project.location.as_deref());
    insert_field(&mut record, extract_roof_height(span_text));

    for (i, field) in extract_membrane(span_text).iter().enumerate() {
        if let Some(keys) = FieldKey::membrane(i + 1) {
            record.insert_layer(keys, field);
        }
    }
    if let (Some(field), Some(keys)) = (extract_coverboard(span_text, 1), FieldKey::coverboard(1)) {
        record.insert_layer(keys, &field);
    }
    for (i, field) in extract_insulation(span_text).iter().enumerate() {
        if let Some(keys) = FieldKey::insulation(i + 1) {
            record.insert_layer(keys, field);
        }
    }
    if let Some(field) = extract_vapor_barrier(span_text) {
        record.insert_layer(FieldKey::vapor_barrier(), &field);
    }
    if let (Some(field), Some(keys)) = (extract_coverboard(span_text, 2), FieldKey::coverboard(2)) {
        record.insert_layer(keys, &field);
    }
    if let Some(field) = extract_deck_slope(span_text) {
        record.insert_layer(FieldKey::deck_slope(), &field);
    }

    insert_field(&mut record, extract_roofnav(span_text));
    insert_field(&mut record, extract_fm_global(span_text));
    insert_field(&mut record, extract_ul_class(span_text));
    insert_field(&mut record, extract_astm(span_text));

    record
}

fn insert_opt(record: &mut AssemblyRecord, key: FieldKey, value: Option<&str>) {
    if let Some(value) = value {
        record.insert(key, value);
    }
}

fn insert_field(record: &mut AssemblyRecord, field: Option<ExtractedField>) {
    if let Some(field) = field {
        record.insert(field.key, field.value);
    }
}

/// Parse a complete assembly letter.
///
/// Never fails: unrecognised text produces records with fewer fields, and
/// empty input produces a single empty record.
pub fn parse_assembly_letter(document_text: &str) -> ParsedLetter {
    let text = normalize_lines(document_text);
    let spans = segment(&text);
    let manufacturer = extract::extract_manufacturer(&text);
    let project = extract::extract_project_info(&text);

    tracing::debug!(
        spans = spans.len(),
        manufacturer = %manufacturer,
        "Segmented assembly letter"
    );

    if let [span] = spans.as_slice() {
        // One roof area named once is still worth recording
        let names = area_names(&text);
        let name = span.name.as_deref().or(match names.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        });
        return ParsedLetter::Single(assemble(span.text, name, &manufacturer, &project));
    }

    let assemblies = spans
        .iter()
        .map(|span| assemble(span.text, span.name.as_deref(), &manufacturer, &project))
        .collect();

    ParsedLetter::Multi(MultiAssembly {
        manufacturer,
        project_name: project.name,
        project_location: project.location,
        date: project.date,
        assemblies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_letter_is_single_empty_record() {
        let parsed = parse_assembly_letter("");
        match parsed {
            ParsedLetter::Single(record) => assert!(record.is_empty()),
            other => panic!("expected single record, got {other:?}"),
        }
    }

    #[test]
    fn test_single_area_name_is_recorded() {
        let parsed = parse_assembly_letter("Main Store Roof\nDeck: Concrete\nMembrane: 60 mil TPO");
        let record = &parsed.assemblies()[0];
        assert!(!parsed.is_multi());
        assert_eq!(record.roof_area(), Some("Main Store Roof"));
        assert_eq!(record.get(FieldKey::DeckSlope), Some("Concrete"));
        assert_eq!(record.get(FieldKey::SystemType), Some("TPO"));
    }

    #[test]
    fn test_document_facts_fill_in_for_spans() {
        let project = ProjectInfo {
            contractor: Some("ACME Roofing".into()),
            spec_number: Some("S-100".into()),
            ..Default::default()
        };
        let record = assemble("Deck: Metal", Some("Roof B"), "GAF", &project);
        assert_eq!(record.get(FieldKey::Contractor), Some("ACME Roofing"));
        assert_eq!(record.get(FieldKey::SpecNumber), Some("S-100"));
        assert_eq!(record.get(FieldKey::Manufacturer), Some("GAF"));
        assert_eq!(record.roof_area(), Some("Roof B"));
    }

    #[test]
    fn test_unknown_manufacturer_is_not_recorded() {
        let record = assemble("Deck: Metal", None, UNKNOWN_MANUFACTURER, &ProjectInfo::default());
        assert!(!record.contains(FieldKey::Manufacturer));
    }
}
