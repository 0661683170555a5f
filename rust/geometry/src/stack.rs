// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer stack builder
//!
//! Turns an [`AssemblyRecord`] into the vertical sequence of layers drawn in a
//! roof section detail, bottom to top:
//!
//! deck → vapor barrier → insulation 1..3 → coverboard 2 → coverboard 1 →
//! adhesive line (adhered membranes only) → membrane
//!
//! Stacked layers sit directly on one another. The adhesive line and the
//! membrane float a fixed clearance above the top board so they read as
//! separate components in the detail.

use crate::thickness::extract_thickness;
use roofstack_core::{AssemblyRecord, FieldKey, LayerKeys};
use serde::Serialize;

/// Nominal deck depth drawn for every assembly
pub const DECK_THICKNESS: f64 = 3.0;
/// Vapor barrier sheet thickness
pub const VAPOR_BARRIER_THICKNESS: f64 = 0.03125;
/// Drawn membrane thickness
pub const MEMBRANE_THICKNESS: f64 = 0.1;
/// Gap between the top board and the membrane (and adhesive line)
pub const MEMBRANE_CLEARANCE: f64 = 0.125;

/// Insulation hatch scales, alternated by drawn position so adjacent boards
/// do not blend into one region.
const INSULATION_SCALES: [f64; 2] = [0.25, 0.26];

/// Component type of a drawn layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Deck,
    VaporBarrier,
    Insulation,
    Coverboard,
    Adhesive,
    Membrane,
}

impl LayerKind {
    /// Prefix of the CAD layer names for this kind
    pub fn layer_prefix(self) -> &'static str {
        match self {
            LayerKind::Deck => "DECK",
            LayerKind::VaporBarrier => "VAPOR-BARRIER",
            LayerKind::Insulation => "INSULATION",
            LayerKind::Coverboard => "COVERBOARD",
            LayerKind::Adhesive => "MEMBRANE-ADHESIVE",
            LayerKind::Membrane => "MEMBRANE",
        }
    }

    /// Membrane and adhesive are drawn as lines on their own colored layers
    pub fn is_line_work(self) -> bool {
        matches!(self, LayerKind::Adhesive | LayerKind::Membrane)
    }
}

/// Fill pattern for a stacked layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HatchSpec {
    pub pattern: String,
    pub scale: f64,
    pub angle: f64,
}

impl HatchSpec {
    fn new(pattern: &str, scale: f64) -> Self {
        Self {
            pattern: pattern.to_string(),
            scale,
            angle: 0.0,
        }
    }

    pub fn is_solid(&self) -> bool {
        self.pattern == "SOLID"
    }
}

/// One drawn layer of the section detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub kind: LayerKind,
    pub thickness: f64,
    pub y_start: f64,
    pub y_end: f64,
    pub outline_layer: String,
    pub hatch_layer: String,
    pub text_layer: String,
    /// `None` for line work
    pub hatch: Option<HatchSpec>,
    /// First label line, upper case
    pub label: String,
    /// Second label line, lower case, without parentheses
    pub attachment: Option<String>,
}

impl LayerSpec {
    /// Vertical midpoint, where the label leader lands
    pub fn mid_y(&self) -> f64 {
        (self.y_start + self.y_end) / 2.0
    }

    /// Label lines as drawn
    pub fn label_lines(&self) -> Vec<String> {
        let mut lines = vec![self.label.clone()];
        if let Some(attachment) = &self.attachment {
            lines.push(format!("({attachment})"));
        }
        lines
    }
}

/// A layer before it has been placed
struct Component {
    kind: LayerKind,
    thickness: f64,
    hatch: Option<HatchSpec>,
    label: String,
    attachment: Option<String>,
}

/// Build the drawn stack for a record.
///
/// The deck and membrane are always present. Every other layer is drawn only
/// when its field exists and a positive thickness can be read from it.
pub fn build_stack(record: &AssemblyRecord) -> Vec<LayerSpec> {
    let mut components = Vec::with_capacity(8);

    components.push(deck(record));

    if let Some(vapor_barrier) = record.get(FieldKey::VaporBarrier) {
        components.push(Component {
            kind: LayerKind::VaporBarrier,
            thickness: VAPOR_BARRIER_THICKNESS,
            hatch: Some(HatchSpec::new("SOLID", 1.0)),
            label: vapor_barrier.to_uppercase(),
            attachment: attachment_text(record, FieldKey::VaporBarrierAttachment),
        });
    }

    let mut drawn_insulation = 0;
    for n in 1..=roofstack_core::record::MAX_INSULATION {
        let Some(keys) = FieldKey::insulation(n) else {
            continue;
        };
        if let Some(mut board) = board_layer(record, keys, LayerKind::Insulation) {
            let scale = INSULATION_SCALES[drawn_insulation % INSULATION_SCALES.len()];
            board.hatch = Some(HatchSpec::new("INSUL", scale));
            drawn_insulation += 1;
            components.push(board);
        }
    }

    for n in [2, 1] {
        if let Some(board) = FieldKey::coverboard(n).and_then(|keys| board_layer(record, keys, LayerKind::Coverboard)) {
            components.push(board);
        }
    }

    // Stacked layers: each starts where the previous one ends.
    let (mut layers, top) = components
        .into_iter()
        .fold((Vec::new(), 0.0_f64), |(mut layers, y), component| {
            let y_end = y + component.thickness;
            layers.push(place(component, y, y_end));
            (layers, y_end)
        });

    let membrane = membrane(record);
    let membrane_base = top + MEMBRANE_CLEARANCE;

    if membrane_is_adhered(record) {
        layers.push(place(
            Component {
                kind: LayerKind::Adhesive,
                thickness: 0.0,
                hatch: None,
                label: "MEMBRANE ADHESIVE".to_string(),
                attachment: None,
            },
            membrane_base,
            membrane_base,
        ));
    }

    layers.push(place(membrane, membrane_base, membrane_base + MEMBRANE_THICKNESS));

    tracing::trace!(layers = layers.len(), top, "Built layer stack");
    layers
}

fn place(component: Component, y_start: f64, y_end: f64) -> LayerSpec {
    let prefix = component.kind.layer_prefix();
    let (outline_layer, hatch_layer) = if component.kind.is_line_work() {
        (prefix.to_string(), prefix.to_string())
    } else {
        (format!("{prefix}-OUTLINE"), format!("{prefix}-HATCH"))
    };
    LayerSpec {
        kind: component.kind,
        thickness: component.thickness,
        y_start,
        y_end,
        outline_layer,
        hatch_layer,
        text_layer: format!("{prefix}-TEXT"),
        hatch: component.hatch,
        label: component.label,
        attachment: component.attachment,
    }
}

fn attachment_text(record: &AssemblyRecord, key: FieldKey) -> Option<String> {
    record.get(key).map(str::to_lowercase)
}

fn deck(record: &AssemblyRecord) -> Component {
    let label = match record.get(FieldKey::DeckSlope) {
        Some(deck) => {
            let upper = deck.to_uppercase();
            if upper.contains("BY OTHERS") {
                upper
            } else {
                format!("{upper} (BY OTHERS)")
            }
        }
        None => "ROOF DECK (BY OTHERS)".to_string(),
    };
    Component {
        kind: LayerKind::Deck,
        thickness: DECK_THICKNESS,
        hatch: Some(HatchSpec::new("AR-CONC", 0.01)),
        label,
        attachment: attachment_text(record, FieldKey::DeckSlopeAttachment),
    }
}

/// Insulation or coverboard, if present with a readable thickness
fn board_layer(record: &AssemblyRecord, keys: LayerKeys, kind: LayerKind) -> Option<Component> {
    let product = record.get(keys.value)?;
    let dimension = keys.thickness.and_then(|key| record.get(key));

    let thickness = extract_thickness(dimension.unwrap_or(product));
    if thickness <= 0.0 {
        return None;
    }

    let label = match dimension {
        Some(dimension) => format!("{dimension} {product}").to_uppercase(),
        None => product.to_uppercase(),
    };
    Some(Component {
        kind,
        thickness,
        hatch: Some(HatchSpec::new("AR-SAND", 0.01)),
        label,
        attachment: attachment_text(record, keys.attachment),
    })
}

fn membrane(record: &AssemblyRecord) -> Component {
    let label = record
        .get(FieldKey::Membrane1)
        .map_or_else(|| "ROOF MEMBRANE".to_string(), str::to_uppercase);
    let attachment = if label.contains("ADHERED") {
        None
    } else {
        attachment_text(record, FieldKey::Membrane1Attachment)
    };
    Component {
        kind: LayerKind::Membrane,
        thickness: MEMBRANE_THICKNESS,
        hatch: None,
        label,
        attachment,
    }
}

fn membrane_is_adhered(record: &AssemblyRecord) -> bool {
    record
        .get(FieldKey::Membrane1Attachment)
        .map(str::to_ascii_lowercase)
        .is_some_and(|a| a.contains("adhered") || a.contains("adhesive"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(fields: &[(FieldKey, &str)]) -> AssemblyRecord {
        fields.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_empty_record_draws_deck_and_membrane() {
        let stack = build_stack(&AssemblyRecord::new());
        assert_eq!(stack.len(), 2);
        assert_eq!(stack[0].kind, LayerKind::Deck);
        assert_eq!(stack[0].label, "ROOF DECK (BY OTHERS)");
        assert_relative_eq!(stack[0].y_end, DECK_THICKNESS);
        assert_eq!(stack[1].kind, LayerKind::Membrane);
        assert_relative_eq!(stack[1].y_start, DECK_THICKNESS + MEMBRANE_CLEARANCE);
    }

    #[test]
    fn test_layers_are_contiguous() {
        let stack = build_stack(&record(&[
            (FieldKey::DeckSlope, "22 ga Metal"),
            (FieldKey::VaporBarrier, "725TR"),
            (FieldKey::Insulation1Thickness, "2.6\""),
            (FieldKey::Insulation1, "Polyiso"),
            (FieldKey::Insulation2Thickness, "1.5\""),
            (FieldKey::Insulation2, "Polyiso"),
            (FieldKey::Coverboard2Thickness, "1/4\""),
            (FieldKey::Coverboard2, "DensDeck"),
            (FieldKey::Coverboard1Thickness, "1/2\""),
            (FieldKey::Coverboard1, "Securock"),
            (FieldKey::Membrane1, "60 mil TPO"),
        ]));

        let kinds: Vec<LayerKind> = stack.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LayerKind::Deck,
                LayerKind::VaporBarrier,
                LayerKind::Insulation,
                LayerKind::Insulation,
                LayerKind::Coverboard,
                LayerKind::Coverboard,
                LayerKind::Membrane,
            ]
        );
        for pair in stack[..6].windows(2) {
            assert_relative_eq!(pair[0].y_end, pair[1].y_start);
        }
        assert_eq!(stack[4].label, "1/4\" DENSDECK");
        assert_eq!(stack[5].label, "1/2\" SECUROCK");

        let top = 3.0 + 0.03125 + 2.6 + 1.5 + 0.25 + 0.5;
        assert_relative_eq!(stack[5].y_end, top, epsilon = 1e-9);
        assert_relative_eq!(stack[6].y_start, top + 0.125, epsilon = 1e-9);
        assert_relative_eq!(stack[6].y_end, top + 0.225, epsilon = 1e-9);
    }

    #[test]
    fn test_insulation_scale_alternates_by_drawn_position() {
        // Layer 2 has no readable thickness, so layer 3 is the second drawn
        let stack = build_stack(&record(&[
            (FieldKey::Insulation1, "2\" Polyiso"),
            (FieldKey::Insulation2, "Tapered Polyiso"),
            (FieldKey::Insulation3, "1.5\" Polyiso"),
        ]));
        let scales: Vec<f64> = stack
            .iter()
            .filter(|l| l.kind == LayerKind::Insulation)
            .filter_map(|l| l.hatch.as_ref().map(|h| h.scale))
            .collect();
        assert_eq!(scales, vec![0.25, 0.26]);
    }

    #[test]
    fn test_adhesive_line_only_for_adhered_membranes() {
        let adhered = build_stack(&record(&[
            (FieldKey::Membrane1, "60 mil TPO"),
            (FieldKey::Membrane1Attachment, "Fully Adhered with Bonding Adhesive"),
        ]));
        let adhesive = adhered
            .iter()
            .find(|l| l.kind == LayerKind::Adhesive)
            .expect("adhesive line");
        let membrane = adhered.last().unwrap();
        assert_relative_eq!(adhesive.y_start, membrane.y_start);
        assert_relative_eq!(adhesive.y_start, DECK_THICKNESS + MEMBRANE_CLEARANCE);
        assert_eq!(membrane.attachment.as_deref(), Some("fully adhered with bonding adhesive"));

        let fastened = build_stack(&record(&[
            (FieldKey::Membrane1, "60 mil TPO"),
            (FieldKey::Membrane1Attachment, "mechanically fastened"),
        ]));
        assert!(fastened.iter().all(|l| l.kind != LayerKind::Adhesive));
    }

    #[test]
    fn test_coverboard_without_thickness_is_omitted() {
        let stack = build_stack(&record(&[(FieldKey::Coverboard1, "Securock")]));
        assert!(stack.iter().all(|l| l.kind != LayerKind::Coverboard));
    }

    #[test]
    fn test_deck_label_by_others_not_doubled() {
        let stack = build_stack(&record(&[(FieldKey::DeckSlope, "Concrete deck by others")]));
        assert_eq!(stack[0].label, "CONCRETE DECK BY OTHERS");
    }

    #[test]
    fn test_layer_names() {
        let stack = build_stack(&record(&[
            (FieldKey::Membrane1Attachment, "adhered"),
        ]));
        assert_eq!(stack[0].outline_layer, "DECK-OUTLINE");
        assert_eq!(stack[0].hatch_layer, "DECK-HATCH");
        assert_eq!(stack[0].text_layer, "DECK-TEXT");
        assert_eq!(stack[1].outline_layer, "MEMBRANE-ADHESIVE");
        assert_eq!(stack[2].outline_layer, "MEMBRANE");
        assert_eq!(stack[2].label_lines(), vec!["ROOF MEMBRANE".to_string(), "(adhered)".to_string()]);
    }
}
