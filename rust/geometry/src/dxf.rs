// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DXF text writer
//!
//! Serializes a [`DrawingDocument`] as an ASCII DXF (AC1015) with a header
//! fixing units to inches / architectural, a linetype and layer table, and
//! one entity section. Every value is written as a group-code pair on two
//! lines.

use crate::drawing::{Color, DrawingDocument, Hatch, Label, Linetype, Shape};
use nalgebra::Point2;
use std::fmt::Display;
use std::io::{self, Write};

/// `$INSUNITS` value for inches
pub const UNITS_INCHES: i32 = 1;
/// `$LUNITS` value for architectural notation
pub const LINEAR_UNITS_ARCHITECTURAL: i32 = 4;

/// Group 62 value meaning "by layer"
const COLOR_BY_LAYER: i32 = 256;
/// MTEXT attachment point: middle right
const ATTACH_MIDDLE_RIGHT: i32 = 6;

/// Group-code pair emitter
struct Groups<'a, W: Write> {
    out: &'a mut W,
}

impl<W: Write> Groups<'_, W> {
    fn pair(&mut self, code: i32, value: impl Display) -> io::Result<()> {
        writeln!(self.out, "{code:>3}")?;
        writeln!(self.out, "{value}")
    }

    fn real(&mut self, code: i32, value: f64) -> io::Result<()> {
        self.pair(code, format_args!("{value:.6}"))
    }

    fn point(&mut self, code: i32, p: &Point2<f64>) -> io::Result<()> {
        self.real(code, p.x)?;
        self.real(code + 10, p.y)
    }

    fn point3(&mut self, code: i32, p: &Point2<f64>) -> io::Result<()> {
        self.point(code, p)?;
        self.real(code + 20, 0.0)
    }

    fn section(&mut self, name: &str) -> io::Result<()> {
        self.pair(0, "SECTION")?;
        self.pair(2, name)
    }

    fn end_section(&mut self) -> io::Result<()> {
        self.pair(0, "ENDSEC")
    }

    fn color(&mut self, color: Color) -> io::Result<()> {
        match color {
            Color::ByLayer => self.pair(62, COLOR_BY_LAYER),
            Color::Index(index) => self.pair(62, index),
            Color::Rgb(r, g, b) => {
                self.pair(62, nearest_index(r, g, b))?;
                self.pair(420, true_color(r, g, b))
            }
        }
    }

    fn entity_head(&mut self, kind: &str, layer: &str, color: Color) -> io::Result<()> {
        self.pair(0, kind)?;
        self.pair(100, "AcDbEntity")?;
        self.pair(8, layer)?;
        self.color(color)
    }
}

/// Packed 24-bit true color as stored in group 420
pub fn true_color(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

// Fallback index for readers that ignore group 420
fn nearest_index(r: u8, g: u8, b: u8) -> u8 {
    match (r > 127, g > 127, b > 127) {
        (true, false, false) => 1,
        (true, true, false) => 2,
        (false, true, false) => 3,
        (false, true, true) => 4,
        (false, false, true) => 5,
        (true, false, true) => 6,
        (true, true, true) => 7,
        (false, false, false) => 250,
    }
}

/// Write a complete DXF file for `doc`.
pub fn write_dxf<W: Write>(doc: &DrawingDocument, out: &mut W) -> io::Result<()> {
    let mut g = Groups { out };

    g.section("HEADER")?;
    g.pair(9, "$ACADVER")?;
    g.pair(1, "AC1015")?;
    g.pair(9, "$INSUNITS")?;
    g.pair(70, UNITS_INCHES)?;
    g.pair(9, "$LUNITS")?;
    g.pair(70, LINEAR_UNITS_ARCHITECTURAL)?;
    g.pair(9, "$MEASUREMENT")?;
    g.pair(70, 0)?;
    g.end_section()?;

    g.section("TABLES")?;
    write_linetypes(&mut g)?;
    write_layers(&mut g, doc)?;
    g.end_section()?;

    g.section("ENTITIES")?;
    for entity in &doc.entities {
        match &entity.shape {
            Shape::Polyline { points, closed } => {
                g.entity_head("LWPOLYLINE", &entity.layer, entity.color)?;
                g.pair(100, "AcDbPolyline")?;
                g.pair(90, points.len())?;
                g.pair(70, i32::from(*closed))?;
                for p in points {
                    g.point(10, p)?;
                }
            }
            Shape::Hatch(hatch) => {
                g.entity_head("HATCH", &entity.layer, entity.color)?;
                write_hatch(&mut g, hatch)?;
            }
            Shape::Line { start, end, linetype } => {
                g.entity_head("LINE", &entity.layer, entity.color)?;
                if let Some(linetype) = linetype {
                    g.pair(6, linetype.name())?;
                }
                g.pair(100, "AcDbLine")?;
                g.point3(10, start)?;
                g.point3(11, end)?;
            }
            Shape::Text(label) => {
                g.entity_head("MTEXT", &entity.layer, entity.color)?;
                write_mtext(&mut g, label)?;
            }
        }
    }
    g.end_section()?;

    g.pair(0, "EOF")?;
    g.out.flush()
}

/// Render a document to a DXF string
pub fn to_dxf_string(doc: &DrawingDocument) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_dxf(doc, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_linetypes<W: Write>(g: &mut Groups<'_, W>) -> io::Result<()> {
    g.pair(0, "TABLE")?;
    g.pair(2, "LTYPE")?;
    g.pair(70, 2)?;

    g.pair(0, "LTYPE")?;
    g.pair(2, Linetype::Continuous.name())?;
    g.pair(70, 0)?;
    g.pair(3, "Solid line")?;
    g.pair(72, 65)?;
    g.pair(73, 0)?;
    g.real(40, 0.0)?;

    // Dash/gap approximation of a zigzag
    g.pair(0, "LTYPE")?;
    g.pair(2, Linetype::ZigZag.name())?;
    g.pair(70, 0)?;
    g.pair(3, "Zig zag /\\/\\/\\/\\/\\/\\/\\/\\")?;
    g.pair(72, 65)?;
    g.pair(73, 2)?;
    g.real(40, 0.25)?;
    g.real(49, 0.125)?;
    g.pair(74, 0)?;
    g.real(49, -0.125)?;
    g.pair(74, 0)?;

    g.pair(0, "ENDTAB")
}

fn write_layers<W: Write>(g: &mut Groups<'_, W>, doc: &DrawingDocument) -> io::Result<()> {
    g.pair(0, "TABLE")?;
    g.pair(2, "LAYER")?;
    g.pair(70, doc.layers.len())?;
    for layer in &doc.layers {
        g.pair(0, "LAYER")?;
        g.pair(2, &layer.name)?;
        g.pair(70, 0)?;
        match layer.color {
            // A layer cannot be by-layer; fall back to white
            Color::ByLayer => g.pair(62, 7)?,
            color => g.color(color)?,
        }
        g.pair(6, layer.linetype.name())?;
    }
    g.pair(0, "ENDTAB")
}

fn write_hatch<W: Write>(g: &mut Groups<'_, W>, hatch: &Hatch) -> io::Result<()> {
    g.pair(100, "AcDbHatch")?;
    g.point3(10, &Point2::origin())?;
    g.real(210, 0.0)?;
    g.real(220, 0.0)?;
    g.real(230, 1.0)?;
    g.pair(2, &hatch.pattern)?;
    g.pair(70, i32::from(hatch.solid))?;
    g.pair(71, 0)?;

    // One closed polyline boundary path
    g.pair(91, 1)?;
    g.pair(92, 2)?;
    g.pair(72, 0)?;
    g.pair(73, 1)?;
    g.pair(93, hatch.boundary.len())?;
    for p in &hatch.boundary {
        g.point(10, p)?;
    }
    g.pair(97, 0)?;

    g.pair(75, 1)?;
    g.pair(76, 1)?;
    if !hatch.solid {
        g.real(52, hatch.angle)?;
        g.real(41, hatch.scale)?;
        g.pair(77, 0)?;
        g.pair(78, 0)?;
    }
    g.pair(98, 0)
}

fn write_mtext<W: Write>(g: &mut Groups<'_, W>, label: &Label) -> io::Result<()> {
    g.pair(100, "AcDbMText")?;
    g.point3(10, &label.position)?;
    g.real(40, label.height)?;
    g.pair(71, ATTACH_MIDDLE_RIGHT)?;
    g.pair(72, 1)?;
    g.pair(1, label.lines.join("\\P"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::MEMBRANE_COLOR;
    use smallvec::smallvec;

    fn sample() -> DrawingDocument {
        let mut doc = DrawingDocument::new();
        doc.add_layer("DECK-OUTLINE", Color::Index(7), Linetype::Continuous);
        doc.add_layer("DECK-HATCH", Color::Index(8), Linetype::Continuous);
        doc.add_layer("MEMBRANE-ADHESIVE", MEMBRANE_COLOR, Linetype::ZigZag);
        let boundary: smallvec::SmallVec<[Point2<f64>; 4]> = smallvec![
            Point2::new(0.0, 0.0),
            Point2::new(36.0, 0.0),
            Point2::new(36.0, 3.0),
            Point2::new(0.0, 3.0),
        ];
        doc.push(
            "DECK-OUTLINE",
            Color::ByLayer,
            Shape::Polyline {
                points: boundary.clone(),
                closed: true,
            },
        );
        doc.push(
            "DECK-HATCH",
            Color::ByLayer,
            Shape::Hatch(Hatch {
                boundary,
                pattern: "AR-CONC".to_string(),
                scale: 0.01,
                angle: 0.0,
                solid: false,
            }),
        );
        doc.push(
            "MEMBRANE-ADHESIVE",
            MEMBRANE_COLOR,
            Shape::Line {
                start: Point2::new(0.0, 3.125),
                end: Point2::new(36.0, 3.125),
                linetype: Some(Linetype::ZigZag),
            },
        );
        doc.push(
            "DECK-OUTLINE",
            Color::ByLayer,
            Shape::Text(Label {
                position: Point2::new(-6.0, 1.5),
                height: 0.25,
                lines: vec!["METAL DECK".to_string(), "(by others)".to_string()],
            }),
        );
        doc
    }

    fn groups(dxf: &str) -> Vec<(i32, String)> {
        let lines: Vec<&str> = dxf.lines().collect();
        lines
            .chunks(2)
            .map(|pair| (pair[0].trim().parse().unwrap(), pair[1].to_string()))
            .collect()
    }

    #[test]
    fn test_structure_and_units() {
        let dxf = to_dxf_string(&sample());
        let groups = groups(&dxf);
        assert_eq!(groups.first(), Some(&(0, "SECTION".to_string())));
        assert_eq!(groups.last(), Some(&(0, "EOF".to_string())));

        let units = groups
            .windows(2)
            .find(|w| w[0].1 == "$INSUNITS")
            .map(|w| w[1].1.clone());
        assert_eq!(units.as_deref(), Some("1"));
        let lunits = groups
            .windows(2)
            .find(|w| w[0].1 == "$LUNITS")
            .map(|w| w[1].1.clone());
        assert_eq!(lunits.as_deref(), Some("4"));
    }

    #[test]
    fn test_entities_written_in_order() {
        let dxf = to_dxf_string(&sample());
        let kinds: Vec<String> = groups(&dxf)
            .into_iter()
            .skip_while(|(_, v)| v != "ENTITIES")
            .filter(|(code, _)| *code == 0)
            .map(|(_, v)| v)
            .collect();
        assert_eq!(kinds, vec!["LWPOLYLINE", "HATCH", "LINE", "MTEXT", "ENDSEC", "EOF"]);
    }

    #[test]
    fn test_membrane_true_color_and_linetype() {
        let dxf = to_dxf_string(&sample());
        let packed = true_color(0, 102, 204).to_string();
        assert_eq!(packed, "26316");
        assert!(groups(&dxf).contains(&(420, packed)));
        assert!(dxf.contains("ZIGZAG"));
    }

    #[test]
    fn test_mtext_uses_paragraph_breaks() {
        let dxf = to_dxf_string(&sample());
        assert!(dxf.contains("METAL DECK\\P(by others)"));
    }

    #[test]
    fn test_hatch_pattern_and_scale() {
        let dxf = to_dxf_string(&sample());
        let groups = groups(&dxf);
        assert!(groups.contains(&(2, "AR-CONC".to_string())));
        assert!(groups.contains(&(41, "0.010000".to_string())));
    }
}
