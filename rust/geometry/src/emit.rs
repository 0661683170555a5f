// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Drawing emission: stack → document → DXF file

use crate::drawing::DrawingDocument;
use crate::dxf::write_dxf;
use crate::error::{Error, Result};
use crate::stack::{build_stack, LayerSpec};
use roofstack_core::AssemblyRecord;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Drawing file extension
pub const DRAWING_EXTENSION: &str = "dxf";

/// Characters dropped from roof-area names when building file names
const STRIPPED_CHARS: &[char] = &['#', '*', '•', '/', '\\', ':', '?', '"', '<', '>', '|'];

/// Write one section detail for `stack` to `output_path`.
///
/// Missing parent directories are created. Returns the written path.
pub fn emit(stack: &[LayerSpec], output_path: &Path) -> Result<PathBuf> {
    if stack.is_empty() {
        return Err(Error::EmptyStack(output_path.display().to_string()));
    }
    if output_path.file_name().is_none() || output_path.is_dir() {
        return Err(Error::InvalidOutputPath(output_path.to_path_buf()));
    }

    let write_err = |source| Error::Write {
        path: output_path.to_path_buf(),
        source,
    };

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let doc = DrawingDocument::from_stack(stack);
    let file = File::create(output_path).map_err(write_err)?;
    let mut out = BufWriter::new(file);
    write_dxf(&doc, &mut out).map_err(write_err)?;

    tracing::debug!(
        path = %output_path.display(),
        layers = stack.len(),
        entities = doc.entities.len(),
        "Wrote section detail"
    );
    Ok(output_path.to_path_buf())
}

/// File name for the drawing of a record.
///
/// Uses the roof-area name with spaces turned into underscores and marker or
/// path characters removed; falls back to `Assembly_<number>` when the record
/// has no usable roof area. `number` is 1-based.
pub fn drawing_file_name(record: &AssemblyRecord, number: usize) -> String {
    let stem: String = record
        .roof_area()
        .unwrap_or_default()
        .trim()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c) && !c.is_control())
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    let stem = stem.trim_matches(|c| c == '_' || c == '.');

    if stem.is_empty() {
        format!("Assembly_{number}.{DRAWING_EXTENSION}")
    } else {
        format!("{stem}.{DRAWING_EXTENSION}")
    }
}

/// Build the stack for a record and write it into `output_dir`.
pub fn emit_record(record: &AssemblyRecord, output_dir: &Path, number: usize) -> Result<PathBuf> {
    let stack = build_stack(record);
    emit(&stack, &output_dir.join(drawing_file_name(record, number)))
}
