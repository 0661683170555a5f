// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Drawing document model
//!
//! A format-neutral description of a section detail: named layers and the
//! entities drawn on them. [`DrawingDocument::from_stack`] lays out a layer
//! stack; the [`dxf`](crate::dxf) module serializes the result.

use crate::stack::{LayerKind, LayerSpec};
use nalgebra::Point2;
use smallvec::{smallvec, SmallVec};

/// Horizontal extent of every layer in the detail
pub const DETAIL_WIDTH: f64 = 36.0;
/// Right edge of the label column
pub const LABEL_X: f64 = -6.0;
/// Space between a label and the start of its leader
pub const LEADER_GAP: f64 = 0.5;
/// How far a leader reaches into the layer it points at
pub const LEADER_REACH: f64 = 1.0;
/// Label text height
pub const TEXT_HEIGHT: f64 = 0.25;

/// Fixed color of the membrane layers (RGB 0, 102, 204)
pub const MEMBRANE_COLOR: Color = Color::Rgb(0, 102, 204);

/// Entity or layer color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Inherit from the entity's layer
    ByLayer,
    /// AutoCAD color index
    Index(u8),
    /// True color
    Rgb(u8, u8, u8),
}

/// Named line pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linetype {
    Continuous,
    ZigZag,
}

impl Linetype {
    pub fn name(self) -> &'static str {
        match self {
            Linetype::Continuous => "CONTINUOUS",
            Linetype::ZigZag => "ZIGZAG",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawingLayer {
    pub name: String,
    pub color: Color,
    pub linetype: Linetype,
}

/// Text anchored at its right-middle point
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub position: Point2<f64>,
    pub height: f64,
    pub lines: Vec<String>,
}

/// Hatch fill over a closed boundary
#[derive(Debug, Clone, PartialEq)]
pub struct Hatch {
    pub boundary: SmallVec<[Point2<f64>; 4]>,
    pub pattern: String,
    pub scale: f64,
    pub angle: f64,
    pub solid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polyline {
        points: SmallVec<[Point2<f64>; 4]>,
        closed: bool,
    },
    Hatch(Hatch),
    Line {
        start: Point2<f64>,
        end: Point2<f64>,
        linetype: Option<Linetype>,
    },
    Text(Label),
}

/// A shape bound to exactly one named layer
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub layer: String,
    pub color: Color,
    pub shape: Shape,
}

/// Layers and entities of one section detail
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingDocument {
    pub layers: Vec<DrawingLayer>,
    pub entities: Vec<Entity>,
}

impl DrawingDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer; re-registering a name keeps the first definition.
    pub fn add_layer(&mut self, name: &str, color: Color, linetype: Linetype) {
        if self.layer(name).is_none() {
            self.layers.push(DrawingLayer {
                name: name.to_string(),
                color,
                linetype,
            });
        }
    }

    pub fn layer(&self, name: &str) -> Option<&DrawingLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Add an entity. Its layer must already be registered.
    pub fn push(&mut self, layer: &str, color: Color, shape: Shape) {
        debug_assert!(self.layer(layer).is_some(), "unregistered layer {layer}");
        self.entities.push(Entity {
            layer: layer.to_string(),
            color,
            shape,
        });
    }

    /// Entities on the named layer
    pub fn entities_on<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.layer == layer)
    }

    /// Lay out a full section detail for a stack.
    pub fn from_stack(stack: &[LayerSpec]) -> Self {
        let mut doc = DrawingDocument::new();
        for spec in stack {
            register_layers(&mut doc, spec);
            match spec.kind {
                LayerKind::Membrane => draw_membrane(&mut doc, spec),
                LayerKind::Adhesive => draw_adhesive(&mut doc, spec),
                _ => draw_region(&mut doc, spec),
            }
            draw_label(&mut doc, spec);
        }
        doc
    }
}

fn register_layers(doc: &mut DrawingDocument, spec: &LayerSpec) {
    match spec.kind {
        LayerKind::Membrane => {
            doc.add_layer(&spec.outline_layer, MEMBRANE_COLOR, Linetype::Continuous);
        }
        LayerKind::Adhesive => {
            doc.add_layer(&spec.outline_layer, MEMBRANE_COLOR, Linetype::ZigZag);
        }
        _ => {
            doc.add_layer(&spec.outline_layer, Color::Index(7), Linetype::Continuous);
            doc.add_layer(&spec.hatch_layer, Color::Index(8), Linetype::Continuous);
        }
    }
    doc.add_layer(&spec.text_layer, Color::Index(7), Linetype::Continuous);
}

fn rectangle(y_start: f64, y_end: f64) -> SmallVec<[Point2<f64>; 4]> {
    smallvec![
        Point2::new(0.0, y_start),
        Point2::new(DETAIL_WIDTH, y_start),
        Point2::new(DETAIL_WIDTH, y_end),
        Point2::new(0.0, y_end),
    ]
}

fn draw_region(doc: &mut DrawingDocument, spec: &LayerSpec) {
    let boundary = rectangle(spec.y_start, spec.y_end);
    doc.push(
        &spec.outline_layer,
        Color::ByLayer,
        Shape::Polyline {
            points: boundary.clone(),
            closed: true,
        },
    );
    if let Some(hatch) = &spec.hatch {
        doc.push(
            &spec.hatch_layer,
            Color::ByLayer,
            Shape::Hatch(Hatch {
                boundary,
                pattern: hatch.pattern.clone(),
                scale: hatch.scale,
                angle: hatch.angle,
                solid: hatch.is_solid(),
            }),
        );
    }
}

fn horizontal_line(y: f64, linetype: Option<Linetype>) -> Shape {
    Shape::Line {
        start: Point2::new(0.0, y),
        end: Point2::new(DETAIL_WIDTH, y),
        linetype,
    }
}

// Membrane faces as two lines, no fill
fn draw_membrane(doc: &mut DrawingDocument, spec: &LayerSpec) {
    doc.push(&spec.outline_layer, MEMBRANE_COLOR, horizontal_line(spec.y_start, None));
    doc.push(&spec.outline_layer, MEMBRANE_COLOR, horizontal_line(spec.y_end, None));
}

fn draw_adhesive(doc: &mut DrawingDocument, spec: &LayerSpec) {
    doc.push(
        &spec.outline_layer,
        MEMBRANE_COLOR,
        horizontal_line(spec.y_start, Some(Linetype::ZigZag)),
    );
}

fn draw_label(doc: &mut DrawingDocument, spec: &LayerSpec) {
    let y = spec.mid_y();
    doc.push(
        &spec.text_layer,
        Color::ByLayer,
        Shape::Text(Label {
            position: Point2::new(LABEL_X, y),
            height: TEXT_HEIGHT,
            lines: spec.label_lines(),
        }),
    );
    doc.push(
        &spec.text_layer,
        Color::ByLayer,
        Shape::Line {
            start: Point2::new(LABEL_X + LEADER_GAP, y),
            end: Point2::new(LEADER_REACH, y),
            linetype: None,
        },
    );
}
