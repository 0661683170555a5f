// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Roofstack Core
//!
//! Rule-based extraction of roof assemblies from roofing documents.
//!
//! ## Overview
//!
//! Manufacturer assembly letters describe one or more roof areas and the
//! layers that make them up (deck, vapor barrier, insulation, coverboards,
//! membrane) together with approvals and project details. This crate turns
//! that loosely formatted text into ordered [`AssemblyRecord`]s:
//!
//! - **Normalization**: strips rich-text markup and collapses whitespace
//! - **Segmentation**: splits multi-area letters at roof-area headers
//! - **Extraction**: ordered, first-match-wins pattern tables per field
//! - **Assembly**: one canonical-order record per roof area
//!
//! Other job documents (contracts, specification sections, roof plans,
//! schedules of values) are recognised by [`DocumentKind`] and reduced to a
//! flat [`PartialRecord`].
//!
//! ## Quick Start
//!
//! ```rust
//! use roofstack_core::{parse_assembly_letter, FieldKey, ParsedLetter};
//!
//! let letter = "Roof A\nDeck: 22 ga Metal\nRoof B\nDeck: Concrete";
//! match parse_assembly_letter(letter) {
//!     ParsedLetter::Multi(multi) => {
//!         assert_eq!(multi.assemblies.len(), 2);
//!         assert_eq!(multi.assemblies[1].get(FieldKey::DeckSlope), Some("Concrete"));
//!     }
//!     ParsedLetter::Single(_) => unreachable!(),
//! }
//! ```
//!
//! Extraction never fails; text that matches no pattern just yields fewer
//! fields.

pub mod assemble;
pub mod documents;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod record;
pub mod segment;

pub use assemble::{assemble, parse_assembly_letter, MultiAssembly, ParsedLetter};
pub use documents::{DocumentKind, PartialRecord};
pub use error::{Error, Result};
pub use extract::{extract_project_info, split_product_attachment, UNKNOWN_MANUFACTURER};
pub use normalize::{normalize, normalize_lines};
pub use record::{AssemblyRecord, ExtractedField, FieldKey, LayerKeys, ProjectInfo};
pub use segment::{area_names, segment, AssemblySpan};
