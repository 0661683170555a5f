// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roofstack Geometry
//!
//! Section-detail geometry for roof assemblies: thickness parsing, the
//! bottom-to-top layer stack, a format-neutral drawing model built on
//! nalgebra points, and a DXF writer.
//!
//! ```
//! use roofstack_core::{AssemblyRecord, FieldKey};
//! use roofstack_geometry::{build_stack, DrawingDocument, LayerKind};
//!
//! let record: AssemblyRecord = [
//!     (FieldKey::Insulation1, "2.6\" thick Polyiso".to_string()),
//!     (FieldKey::Membrane1, "60 mil TPO".to_string()),
//! ]
//! .into_iter()
//! .collect();
//!
//! let stack = build_stack(&record);
//! assert_eq!(stack[1].kind, LayerKind::Insulation);
//!
//! let doc = DrawingDocument::from_stack(&stack);
//! assert!(doc.layer("MEMBRANE").is_some());
//! ```

pub mod drawing;
pub mod dxf;
pub mod emit;
pub mod error;
pub mod stack;
pub mod thickness;

// Re-export nalgebra types for convenience
pub use nalgebra::Point2;

pub use drawing::{Color, DrawingDocument, DrawingLayer, Entity, Linetype, Shape};
pub use dxf::{to_dxf_string, write_dxf};
pub use emit::{drawing_file_name, emit, emit_record};
pub use error::{Error, Result};
pub use stack::{build_stack, HatchSpec, LayerKind, LayerSpec, MEMBRANE_CLEARANCE};
pub use thickness::extract_thickness;
