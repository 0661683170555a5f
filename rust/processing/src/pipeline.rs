// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document processing pipeline with parallel drawing emission.
//!
//! document text → kind → fields (+ parsed letter) → per-assembly DXF, JSON
//!
//! Output layout, for a document whose stem is `letter`:
//!
//! ```text
//! <output_dir>/letter.json
//! <output_dir>/letter/Main_Store_Roof.dxf
//! <output_dir>/letter/Canopy_Roofs.dxf
//! ```
//!
//! Within a batch, documents sharing a stem are told apart with a `_<n>`
//! suffix (`letter`, `letter_2`), so no two documents write the same file.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::source::TextSource;
use rayon::prelude::*;
use roofstack_core::{parse_assembly_letter, AssemblyRecord, DocumentKind, ParsedLetter, PartialRecord};
use roofstack_geometry::{build_stack, drawing_file_name, emit};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of processing one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    pub source: PathBuf,
    pub kind: DocumentKind,
    /// Flat field list for every kind
    pub record: PartialRecord,
    /// Structured letter, assembly letters only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter: Option<ParsedLetter>,
    pub drawings: Vec<PathBuf>,
    pub failed_drawings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_path: Option<PathBuf>,
}

impl DocumentResult {
    /// Assemblies found in the document (zero for non-letter kinds)
    pub fn assembly_count(&self) -> usize {
        self.letter.as_ref().map_or(0, |l| l.assemblies().len())
    }

    /// JSON value written for this document
    pub fn output_value(&self) -> Result<serde_json::Value> {
        let value = match &self.letter {
            Some(letter) => serde_json::to_value(letter)?,
            None => serde_json::to_value(&self.record)?,
        };
        Ok(value)
    }
}

/// Totals over a batch of documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    pub documents: usize,
    pub failed_documents: usize,
    pub assemblies: usize,
    pub drawings_written: usize,
    pub drawings_failed: usize,
}

impl ProcessingStats {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a Result<DocumentResult>>) -> Self {
        results.into_iter().fold(Self::default(), |mut stats, result| {
            stats.documents += 1;
            match result {
                Ok(doc) => {
                    stats.assemblies += doc.assembly_count();
                    stats.drawings_written += doc.drawings.len();
                    stats.drawings_failed += doc.failed_drawings;
                }
                Err(_) => stats.failed_documents += 1,
            }
            stats
        })
    }

    /// True when drawings were attempted and none of them could be written.
    pub fn all_drawings_failed(&self) -> bool {
        self.drawings_failed > 0 && self.drawings_written == 0
    }
}

/// Process one document's text, naming its outputs after the file stem.
///
/// `kind` overrides detection. Drawing write failures are logged and counted;
/// only JSON serialization and output-directory errors are returned.
pub fn process_document(
    path: &Path,
    text: &str,
    kind: Option<DocumentKind>,
    config: &Config,
) -> Result<DocumentResult> {
    process_document_as(path, &document_stem(path), text, kind, config)
}

/// Process one document's text, writing `<stem>.json` and the `<stem>/`
/// drawing directory under `config.output_dir`.
pub fn process_document_as(
    path: &Path,
    stem: &str,
    text: &str,
    kind: Option<DocumentKind>,
    config: &Config,
) -> Result<DocumentResult> {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let kind = kind.unwrap_or_else(|| DocumentKind::detect(file_name, text));

    tracing::info!(path = %path.display(), kind = %kind, text_len = text.len(), "Processing document");

    let (record, letter) = match kind {
        DocumentKind::AssemblyLetter => {
            let letter = parse_assembly_letter(text);
            (PartialRecord::from_letter(&letter), Some(letter))
        }
        other => (other.extract(text), None),
    };

    let mut result = DocumentResult {
        source: path.to_path_buf(),
        kind,
        record,
        letter,
        drawings: Vec::new(),
        failed_drawings: 0,
        json_path: None,
    };

    if config.emit_drawings || config.write_json {
        std::fs::create_dir_all(&config.output_dir).map_err(|source| Error::Io {
            path: config.output_dir.clone(),
            source,
        })?;
    }

    if config.emit_drawings {
        if let Some(letter) = &result.letter {
            let drawing_dir = config.output_dir.join(stem);
            std::fs::create_dir_all(&drawing_dir).map_err(|source| Error::Io {
                path: drawing_dir.clone(),
                source,
            })?;
            let (written, failed) = emit_assemblies(letter.assemblies(), &drawing_dir);
            result.drawings = written;
            result.failed_drawings = failed;
        }
    }

    if config.write_json {
        let json_path = config.output_dir.join(format!("{stem}.json"));
        let json = serde_json::to_string_pretty(&result.output_value()?)?;
        std::fs::write(&json_path, json).map_err(|source| Error::Io {
            path: json_path.clone(),
            source,
        })?;
        result.json_path = Some(json_path);
    }

    tracing::info!(
        path = %path.display(),
        fields = result.record.len(),
        assemblies = result.assembly_count(),
        drawings = result.drawings.len(),
        failed_drawings = result.failed_drawings,
        "Document complete"
    );
    Ok(result)
}

/// Read and process a batch of files on a pool of `config.worker_threads`.
///
/// Results keep the input order. Output stems are made unique across the
/// batch before any worker starts.
pub fn process_files<S: TextSource>(
    paths: &[PathBuf],
    source: &S,
    kind: Option<DocumentKind>,
    config: &Config,
) -> Result<Vec<Result<DocumentResult>>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads.max(1))
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))?;

    tracing::debug!(files = paths.len(), threads = config.worker_threads, "Starting batch");

    let stems = batch_stems(paths);
    Ok(pool.install(|| {
        paths
            .par_iter()
            .zip(stems.par_iter())
            .map(|(path, stem)| {
                let text = source.extract_text(path);
                process_document_as(path, stem, &text, kind, config)
            })
            .collect()
    }))
}

/// Write one drawing per assembly into `output_dir`, in parallel.
///
/// Returns the written paths in assembly order and the number of failures.
pub fn emit_assemblies(records: &[AssemblyRecord], output_dir: &Path) -> (Vec<PathBuf>, usize) {
    let targets = unique_drawing_paths(records, output_dir);

    let outcomes: Vec<Option<PathBuf>> = records
        .par_iter()
        .zip(targets.par_iter())
        .map(|(record, target)| {
            let stack = build_stack(record);
            match emit(&stack, target) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(path = %target.display(), error = %e, "Failed to write drawing");
                    None
                }
            }
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.is_none()).count();
    (outcomes.into_iter().flatten().collect(), failed)
}

/// Drawing paths with repeated roof-area names disambiguated by a `_<n>` suffix.
fn unique_drawing_paths(records: &[AssemblyRecord], output_dir: &Path) -> Vec<PathBuf> {
    let mut taken = FxHashSet::default();
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let name = drawing_file_name(record, i + 1);
            let base = name.strip_suffix(".dxf").unwrap_or(&name);
            output_dir.join(format!("{}.dxf", unique_name(base, &mut taken)))
        })
        .collect()
}

/// Per-document output stems, unique within the batch.
fn batch_stems(paths: &[PathBuf]) -> Vec<String> {
    let mut taken = FxHashSet::default();
    paths
        .iter()
        .map(|path| unique_name(&document_stem(path), &mut taken))
        .collect()
}

/// `base`, or `base_<n>` with the smallest `n >= 2` not yet taken.
///
/// Names are compared case-insensitively since output directories may live
/// on case-insensitive file systems.
fn unique_name(base: &str, taken: &mut FxHashSet<String>) -> String {
    let mut name = base.to_string();
    let mut n = 2;
    while !taken.insert(name.to_lowercase()) {
        name = format!("{base}_{n}");
        n += 1;
    }
    name
}

fn document_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("document")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roofstack_core::FieldKey;

    fn config(dir: &Path) -> Config {
        Config {
            output_dir: dir.to_path_buf(),
            worker_threads: 2,
            write_json: true,
            emit_drawings: true,
        }
    }

    fn area(name: &str) -> AssemblyRecord {
        [(FieldKey::RoofArea, name.to_string())].into_iter().collect()
    }

    #[test]
    fn test_repeated_area_names_get_suffixes() {
        let dir = Path::new("out");
        let paths = unique_drawing_paths(&[area("Roof A"), area("Roof A"), AssemblyRecord::new()], dir);
        assert_eq!(
            paths,
            vec![dir.join("Roof_A.dxf"), dir.join("Roof_A_2.dxf"), dir.join("Assembly_3.dxf")]
        );
    }

    #[test]
    fn test_suffix_never_reuses_a_real_area_name() {
        let dir = Path::new("out");
        let paths = unique_drawing_paths(&[area("Roof A 2"), area("Roof A"), area("Roof A")], dir);
        assert_eq!(
            paths,
            vec![dir.join("Roof_A_2.dxf"), dir.join("Roof_A.dxf"), dir.join("Roof_A_3.dxf")]
        );

        let paths = unique_drawing_paths(&[area("Roof A"), area("Roof A"), area("Roof A 2")], dir);
        assert_eq!(
            paths,
            vec![dir.join("Roof_A.dxf"), dir.join("Roof_A_2.dxf"), dir.join("Roof_A_2_2.dxf")]
        );
    }

    #[test]
    fn test_batch_stems_are_unique() {
        let paths = [
            PathBuf::from("/jobs/a/letter.txt"),
            PathBuf::from("/jobs/b/letter.rtf"),
            PathBuf::from("/jobs/Letter.txt"),
            PathBuf::from(""),
        ];
        assert_eq!(batch_stems(&paths), vec!["letter", "letter_2", "Letter_3", "document"]);
    }

    #[test]
    fn test_document_stem() {
        assert_eq!(document_stem(Path::new("/jobs/letter.rtf")), "letter");
        assert_eq!(document_stem(Path::new("")), "document");
    }

    #[test]
    fn test_non_letter_documents_have_no_drawings() {
        let dir = tempfile::tempdir().unwrap();
        let text = "AGREEMENT BETWEEN OWNER AND CONTRACTOR\nContract Sum: $1,250,000.00\n";
        let result = process_document(Path::new("contract.txt"), text, None, &config(dir.path())).unwrap();
        assert_eq!(result.kind, DocumentKind::Contract);
        assert!(result.letter.is_none());
        assert!(result.drawings.is_empty());
        assert_eq!(result.record.get("contract_sum"), Some("$1,250,000.00"));
        assert!(dir.path().join("contract.json").exists());
    }

    #[test]
    fn test_stats_fold() {
        let dir = tempfile::tempdir().unwrap();
        let ok = process_document(
            Path::new("letter.txt"),
            "Roof A\nDeck: Metal\nRoof B\nDeck: Concrete",
            Some(DocumentKind::AssemblyLetter),
            &config(dir.path()),
        );
        let err: Result<DocumentResult> = Err(Error::ThreadPool("test".into()));
        let stats = ProcessingStats::from_results([&ok, &err]);
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.failed_documents, 1);
        assert_eq!(stats.assemblies, 2);
        assert_eq!(stats.drawings_written, 2);
        assert!(!stats.all_drawings_failed());
    }
}
