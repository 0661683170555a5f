// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Assembly record model
//!
//! An [`AssemblyRecord`] is keyed by [`FieldKey`], whose declaration order is
//! the billing template's column order. Records are backed by a `BTreeMap`, so
//! iteration always follows that order no matter which extractor produced a
//! value first.

use crate::error::{Error, Result};
use crate::normalize::normalize;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Maximum number of membrane layers recorded per assembly
pub const MAX_MEMBRANES: usize = 3;

/// Maximum number of insulation layers recorded per assembly
pub const MAX_INSULATION: usize = 3;

/// Record column, in canonical template order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    RoofArea,
    SpecNumber,
    Manufacturer,
    SystemType,
    Date,
    Contractor,
    ContractorAddress,
    ProjectName,
    ProjectLocation,
    RoofHeight,
    Membrane1,
    Membrane1Attachment,
    Membrane2,
    Membrane2Attachment,
    Membrane3,
    Membrane3Attachment,
    Coverboard1Thickness,
    Coverboard1,
    Coverboard1Attachment,
    Insulation1Thickness,
    Insulation1,
    Insulation1Attachment,
    Insulation2Thickness,
    Insulation2,
    Insulation2Attachment,
    Insulation3Thickness,
    Insulation3,
    Insulation3Attachment,
    VaporBarrier,
    VaporBarrierAttachment,
    Coverboard2Thickness,
    Coverboard2,
    Coverboard2Attachment,
    DeckSlope,
    DeckSlopeAttachment,
    ApprovalRoofNav,
    ApprovalFmGlobal,
    ApprovalUlClass,
    ApprovalAstm,
}

impl FieldKey {
    /// Every key in canonical order
    pub const ALL: [FieldKey; 39] = [
        FieldKey::RoofArea,
        FieldKey::SpecNumber,
        FieldKey::Manufacturer,
        FieldKey::SystemType,
        FieldKey::Date,
        FieldKey::Contractor,
        FieldKey::ContractorAddress,
        FieldKey::ProjectName,
        FieldKey::ProjectLocation,
        FieldKey::RoofHeight,
        FieldKey::Membrane1,
        FieldKey::Membrane1Attachment,
        FieldKey::Membrane2,
        FieldKey::Membrane2Attachment,
        FieldKey::Membrane3,
        FieldKey::Membrane3Attachment,
        FieldKey::Coverboard1Thickness,
        FieldKey::Coverboard1,
        FieldKey::Coverboard1Attachment,
        FieldKey::Insulation1Thickness,
        FieldKey::Insulation1,
        FieldKey::Insulation1Attachment,
        FieldKey::Insulation2Thickness,
        FieldKey::Insulation2,
        FieldKey::Insulation2Attachment,
        FieldKey::Insulation3Thickness,
        FieldKey::Insulation3,
        FieldKey::Insulation3Attachment,
        FieldKey::VaporBarrier,
        FieldKey::VaporBarrierAttachment,
        FieldKey::Coverboard2Thickness,
        FieldKey::Coverboard2,
        FieldKey::Coverboard2Attachment,
        FieldKey::DeckSlope,
        FieldKey::DeckSlopeAttachment,
        FieldKey::ApprovalRoofNav,
        FieldKey::ApprovalFmGlobal,
        FieldKey::ApprovalUlClass,
        FieldKey::ApprovalAstm,
    ];

    /// Column name used in serialized output
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::RoofArea => "roof_area",
            FieldKey::SpecNumber => "spec_number",
            FieldKey::Manufacturer => "manufacturer",
            FieldKey::SystemType => "system_type",
            FieldKey::Date => "date",
            FieldKey::Contractor => "contractor",
            FieldKey::ContractorAddress => "contractor_address",
            FieldKey::ProjectName => "project_name",
            FieldKey::ProjectLocation => "project_location",
            FieldKey::RoofHeight => "roof_height",
            FieldKey::Membrane1 => "membrane_1",
            FieldKey::Membrane1Attachment => "membrane_1_attachment",
            FieldKey::Membrane2 => "membrane_2",
            FieldKey::Membrane2Attachment => "membrane_2_attachment",
            FieldKey::Membrane3 => "membrane_3",
            FieldKey::Membrane3Attachment => "membrane_3_attachment",
            FieldKey::Coverboard1Thickness => "coverboard_1_thickness",
            FieldKey::Coverboard1 => "coverboard_1",
            FieldKey::Coverboard1Attachment => "coverboard_1_attachment",
            FieldKey::Insulation1Thickness => "insulation_1_thickness",
            FieldKey::Insulation1 => "insulation_1",
            FieldKey::Insulation1Attachment => "insulation_1_attachment",
            FieldKey::Insulation2Thickness => "insulation_2_thickness",
            FieldKey::Insulation2 => "insulation_2",
            FieldKey::Insulation2Attachment => "insulation_2_attachment",
            FieldKey::Insulation3Thickness => "insulation_3_thickness",
            FieldKey::Insulation3 => "insulation_3",
            FieldKey::Insulation3Attachment => "insulation_3_attachment",
            FieldKey::VaporBarrier => "vapor_barrier",
            FieldKey::VaporBarrierAttachment => "vapor_barrier_attachment",
            FieldKey::Coverboard2Thickness => "coverboard_2_thickness",
            FieldKey::Coverboard2 => "coverboard_2",
            FieldKey::Coverboard2Attachment => "coverboard_2_attachment",
            FieldKey::DeckSlope => "deck_slope",
            FieldKey::DeckSlopeAttachment => "deck_slope_attachment",
            FieldKey::ApprovalRoofNav => "approvals.roofnav",
            FieldKey::ApprovalFmGlobal => "approvals.fm_global",
            FieldKey::ApprovalUlClass => "approvals.ul_class",
            FieldKey::ApprovalAstm => "approvals.astm",
        }
    }

    /// Keys for membrane layer `n` (1-based)
    pub fn membrane(n: usize) -> Option<LayerKeys> {
        let (value, attachment) = match n {
            1 => (FieldKey::Membrane1, FieldKey::Membrane1Attachment),
            2 => (FieldKey::Membrane2, FieldKey::Membrane2Attachment),
            3 => (FieldKey::Membrane3, FieldKey::Membrane3Attachment),
            _ => return None,
        };
        Some(LayerKeys {
            thickness: None,
            value,
            attachment,
        })
    }

    /// Keys for insulation layer `n` (1-based)
    pub fn insulation(n: usize) -> Option<LayerKeys> {
        let (thickness, value, attachment) = match n {
            1 => (
                FieldKey::Insulation1Thickness,
                FieldKey::Insulation1,
                FieldKey::Insulation1Attachment,
            ),
            2 => (
                FieldKey::Insulation2Thickness,
                FieldKey::Insulation2,
                FieldKey::Insulation2Attachment,
            ),
            3 => (
                FieldKey::Insulation3Thickness,
                FieldKey::Insulation3,
                FieldKey::Insulation3Attachment,
            ),
            _ => return None,
        };
        Some(LayerKeys {
            thickness: Some(thickness),
            value,
            attachment,
        })
    }

    /// Keys for coverboard layer `n` (1 = top board, 2 = lower board)
    pub fn coverboard(n: usize) -> Option<LayerKeys> {
        let (thickness, value, attachment) = match n {
            1 => (
                FieldKey::Coverboard1Thickness,
                FieldKey::Coverboard1,
                FieldKey::Coverboard1Attachment,
            ),
            2 => (
                FieldKey::Coverboard2Thickness,
                FieldKey::Coverboard2,
                FieldKey::Coverboard2Attachment,
            ),
            _ => return None,
        };
        Some(LayerKeys {
            thickness: Some(thickness),
            value,
            attachment,
        })
    }

    /// Keys for the vapor barrier
    pub fn vapor_barrier() -> LayerKeys {
        LayerKeys {
            thickness: None,
            value: FieldKey::VaporBarrier,
            attachment: FieldKey::VaporBarrierAttachment,
        }
    }

    /// Keys for the deck/slope description
    pub fn deck_slope() -> LayerKeys {
        LayerKeys {
            thickness: None,
            value: FieldKey::DeckSlope,
            attachment: FieldKey::DeckSlopeAttachment,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FieldKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownFieldKey(s.to_string()))
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The record columns that describe one physical layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerKeys {
    /// Column holding the dimension split off the product (`1/2"`), if the layer has one
    pub thickness: Option<FieldKey>,
    /// Column holding the product description
    pub value: FieldKey,
    /// Column holding the attachment/installation method
    pub attachment: FieldKey,
}

/// One extraction result.
///
/// Layer fields separate the product description from the installation
/// method that follows it, and from a leading dimension when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub key: FieldKey,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
}

impl ExtractedField {
    /// A plain field with no attachment or dimension
    pub fn new(key: FieldKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
            attachment: None,
            dimension: None,
        }
    }
}

/// Ordered key/value record for one roof assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssemblyRecord {
    fields: BTreeMap<FieldKey, String>,
}

impl AssemblyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column. Values are whitespace-normalized; empty values are ignored.
    pub fn insert(&mut self, key: FieldKey, value: impl AsRef<str>) {
        let value = normalize(value.as_ref());
        if !value.is_empty() {
            self.fields.insert(key, value);
        }
    }

    /// Store an extraction result under its layer columns.
    ///
    /// `keys` decides where the value, attachment and dimension land; the
    /// dimension is dropped for layers without a thickness column.
    pub fn insert_layer(&mut self, keys: LayerKeys, field: &ExtractedField) {
        self.insert(keys.value, &field.value);
        if let Some(attachment) = &field.attachment {
            self.insert(keys.attachment, attachment);
        }
        if let (Some(thickness_key), Some(dimension)) = (keys.thickness, &field.dimension) {
            self.insert(thickness_key, dimension);
        }
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.fields.contains_key(&key)
    }

    /// Present keys, in canonical order
    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.fields.keys().copied()
    }

    /// Present columns, in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> + '_ {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Roof-area name, when the record came from a named span
    pub fn roof_area(&self) -> Option<&str> {
        self.get(FieldKey::RoofArea)
    }
}

impl FromIterator<(FieldKey, String)> for AssemblyRecord {
    fn from_iter<I: IntoIterator<Item = (FieldKey, String)>>(iter: I) -> Self {
        let mut record = AssemblyRecord::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// Document-level facts shared by every assembly in one letter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractor_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_number: Option<String>,
}
