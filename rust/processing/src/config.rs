// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration loaded from environment variables.

use std::path::PathBuf;

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory receiving drawings and JSON results.
    pub output_dir: PathBuf,
    /// Number of worker threads for parallel emission.
    pub worker_threads: usize,
    /// Write `<stem>.json` next to the drawings.
    pub write_json: bool,
    /// Emit one DXF drawing per assembly.
    pub emit_drawings: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            output_dir: var("ROOFSTACK_OUTPUT_DIR")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "./drawings".into())
                .into(),
            worker_threads: var("ROOFSTACK_WORKER_THREADS")
                .and_then(|s| s.trim().parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or_else(num_cpus::get),
            write_json: var("ROOFSTACK_WRITE_JSON")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(true),
            emit_drawings: var("ROOFSTACK_EMIT_DRAWINGS")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(true),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
