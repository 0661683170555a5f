// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document kinds
//!
//! A roofing job produces more than assembly letters. Each supported kind
//! knows how to recognise itself and how to pull its own flat field list;
//! only assembly letters go on to the drawing stage.

mod contract;
mod roof_plan;
mod schedule;
mod specification;

use crate::assemble::{parse_assembly_letter, ParsedLetter};
use crate::error::{Error, Result};
use crate::extract::prefix;
use crate::normalize::{normalize, normalize_lines};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Content is classified from this many leading bytes.
const DETECT_WINDOW: usize = 3000;

static RE_SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*section\s+\d{2}\s?\d{2}\s?\d{2}\b").unwrap());

static RE_PART_GENERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpart\s+1\s*[-.]?\s*general\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    AssemblyLetter,
    Contract,
    Specification,
    RoofPlan,
    ScheduleOfValues,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::AssemblyLetter,
        DocumentKind::Contract,
        DocumentKind::Specification,
        DocumentKind::RoofPlan,
        DocumentKind::ScheduleOfValues,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::AssemblyLetter => "assembly_letter",
            DocumentKind::Contract => "contract",
            DocumentKind::Specification => "specification",
            DocumentKind::RoofPlan => "roof_plan",
            DocumentKind::ScheduleOfValues => "schedule_of_values",
        }
    }

    /// Classify a document by file name, then by content.
    pub fn detect(filename: &str, text: &str) -> DocumentKind {
        Self::from_filename(filename).unwrap_or_else(|| Self::from_content(text))
    }

    fn from_filename(filename: &str) -> Option<DocumentKind> {
        let stem = std::path::Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().to_ascii_lowercase())?;

        const HINTS: &[(&str, DocumentKind)] = &[
            ("sov", DocumentKind::ScheduleOfValues),
            ("g703", DocumentKind::ScheduleOfValues),
            ("contract", DocumentKind::Contract),
            ("spec", DocumentKind::Specification),
            ("plan", DocumentKind::RoofPlan),
            ("assembly", DocumentKind::AssemblyLetter),
            ("letter", DocumentKind::AssemblyLetter),
        ];
        HINTS
            .iter()
            .find(|(hint, _)| stem.contains(hint))
            .map(|(_, kind)| *kind)
    }

    fn from_content(text: &str) -> DocumentKind {
        let window = prefix(text, DETECT_WINDOW);
        let lower = window.to_ascii_lowercase();

        if lower.contains("schedule of values")
            || lower.contains("g703")
            || lower.contains("continuation sheet")
        {
            DocumentKind::ScheduleOfValues
        } else if lower.contains("roof plan") || (lower.contains("sheet") && lower.contains("scale:")) {
            DocumentKind::RoofPlan
        } else if lower.contains("agreement") || lower.contains("contract sum") || lower.contains("a101") {
            DocumentKind::Contract
        } else if RE_SECTION_HEADER.is_match(window) || RE_PART_GENERAL.is_match(window) {
            DocumentKind::Specification
        } else {
            DocumentKind::AssemblyLetter
        }
    }

    /// Pull this kind's fields out of raw document text.
    pub fn extract(self, raw_text: &str) -> PartialRecord {
        let text = normalize_lines(raw_text);
        let mut record = PartialRecord::new(self);
        match self {
            DocumentKind::AssemblyLetter => flatten_letter(&mut record, &parse_assembly_letter(&text)),
            DocumentKind::Contract => contract::extract(&text, &mut record),
            DocumentKind::Specification => specification::extract(&text, &mut record),
            DocumentKind::RoofPlan => roof_plan::extract(&text, &mut record),
            DocumentKind::ScheduleOfValues => schedule::extract(&text, &mut record),
        }
        tracing::debug!(kind = %self, fields = record.len(), "Extracted document fields");
        record
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase().replace('-', "_");
        let kind = match name.as_str() {
            "letter" => DocumentKind::AssemblyLetter,
            "spec" => DocumentKind::Specification,
            "plan" => DocumentKind::RoofPlan,
            "sov" => DocumentKind::ScheduleOfValues,
            other => DocumentKind::ALL
                .iter()
                .copied()
                .find(|kind| kind.as_str() == other)
                .ok_or_else(|| Error::UnknownDocumentKind(s.to_string()))?,
        };
        Ok(kind)
    }
}

/// Ordered field list extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialRecord {
    pub kind: DocumentKind,
    #[serde(serialize_with = "ordered_map")]
    fields: Vec<(String, String)>,
}

impl PartialRecord {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            fields: Vec::new(),
        }
    }

    /// Append a field. Values are normalized; empty values and repeated keys are ignored.
    pub fn push(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        let key = key.into();
        let value = normalize(value.as_ref());
        if value.is_empty() || self.get(&key).is_some() {
            return;
        }
        self.fields.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Flattened fields of an already parsed assembly letter
    pub fn from_letter(letter: &ParsedLetter) -> Self {
        let mut record = Self::new(DocumentKind::AssemblyLetter);
        flatten_letter(&mut record, letter);
        record
    }
}

fn ordered_map<S: Serializer>(
    fields: &[(String, String)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(fields.iter().map(|(k, v)| (k, v)))
}

fn flatten_letter(record: &mut PartialRecord, letter: &ParsedLetter) {
    match letter {
        ParsedLetter::Single(assembly) => {
            for (key, value) in assembly.iter() {
                record.push(key.as_str(), value);
            }
        }
        ParsedLetter::Multi(multi) => {
            record.push("manufacturer", &multi.manufacturer);
            if let Some(name) = &multi.project_name {
                record.push("project_name", name);
            }
            if let Some(location) = &multi.project_location {
                record.push("project_location", location);
            }
            if let Some(date) = &multi.date {
                record.push("date", date);
            }
            for (i, assembly) in multi.assemblies.iter().enumerate() {
                for (key, value) in assembly.iter() {
                    record.push(format!("assembly_{}.{}", i + 1, key), value);
                }
            }
        }
    }
}
