// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document text sources
//!
//! Extraction works on plain text. Turning an input file into that text is a
//! separate concern behind [`TextSource`]; a source never fails, it yields an
//! empty string for anything it cannot read.

use std::path::Path;

/// File extensions [`FileTextSource`] reads
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "rtf", "text", "md"];

pub trait TextSource: Sync {
    /// Plain text of the document at `path`, or empty on failure.
    fn extract_text(&self, path: &Path) -> String;
}

/// Reads plain-text and RTF files from disk.
///
/// RTF control words are left in place; the core normalizer strips them.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextSource;

impl TextSource for FileTextSource {
    fn extract_text(&self, path: &Path) -> String {
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| TEXT_EXTENSIONS.iter().any(|t| t.eq_ignore_ascii_case(ext)));
        if !supported {
            tracing::warn!(path = %path.display(), "Unsupported document type, no text extracted");
            return String::new();
        }

        match std::fs::read(path) {
            Ok(bytes) => String::from_utf8(bytes)
                .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read document");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_text_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letter.txt");
        std::fs::write(&path, "Deck: Concrete").unwrap();
        assert_eq!(FileTextSource.extract_text(&path), "Deck: Concrete");
    }

    #[test]
    fn test_failures_yield_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(FileTextSource.extract_text(&dir.path().join("missing.txt")), "");

        let pdf = dir.path().join("letter.pdf");
        std::fs::write(&pdf, "%PDF-1.7").unwrap();
        assert_eq!(FileTextSource.extract_text(&pdf), "");
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letter.rtf");
        std::fs::write(&path, b"Deck: Metal \xff").unwrap();
        assert!(FileTextSource.extract_text(&path).starts_with("Deck: Metal"));
    }
}
