// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared document processing pipeline used by the roofstack CLI.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod source;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{
    emit_assemblies, process_document, process_document_as, process_files, DocumentResult,
    ProcessingStats,
};
pub use source::{FileTextSource, TextSource, TEXT_EXTENSIONS};
