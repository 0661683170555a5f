// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or writing a drawing
#[derive(Error, Debug)]
pub enum Error {
    #[error("Empty layer stack: {0}")]
    EmptyStack(String),

    #[error("Invalid output path: {}", .0.display())]
    InvalidOutputPath(PathBuf),

    #[error("Failed to write drawing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
