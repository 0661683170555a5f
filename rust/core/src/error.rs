// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the extraction core.
//!
//! Extraction itself never fails: a missed field is simply absent from the
//! record. These errors cover the few fallible entry points around it.

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the extraction core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown document kind: {0}")]
    UnknownDocumentKind(String),

    #[error("Unknown field key: {0}")]
    UnknownFieldKey(String),
}
