// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roofstack CLI
//!
//! Reads roofing documents (assembly letters, contracts, specifications,
//! roof plans, schedules of values), extracts their fields and writes one
//! DXF section detail per roof assembly.
//!
//! Configuration comes from `ROOFSTACK_*` environment variables; flags
//! override them. Logs go to stderr, filtered by `RUST_LOG`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use roofstack_core::DocumentKind;
use roofstack_processing::{process_files, Config, FileTextSource, ProcessingStats};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "roofstack",
    version,
    about = "Extract roof assemblies from roofing documents and draw their section details"
)]
struct Cli {
    /// Documents to process (.txt or .rtf)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output directory for drawings and JSON [env: ROOFSTACK_OUTPUT_DIR]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Treat every input as this kind instead of detecting it
    /// (assembly_letter, contract, specification, roof_plan, schedule_of_values)
    #[arg(short, long)]
    kind: Option<DocumentKind>,

    /// Do not write DXF drawings
    #[arg(long)]
    no_drawings: bool,

    /// Do not write JSON files; with a single input the result goes to stdout
    #[arg(long)]
    no_json: bool,

    /// Worker threads [env: ROOFSTACK_WORKER_THREADS]
    #[arg(short = 'j', long)]
    threads: Option<usize>,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(threads) = self.threads {
            config.worker_threads = threads.max(1);
        }
        if self.no_drawings {
            config.emit_drawings = false;
        }
        if self.no_json {
            config.write_json = false;
        }
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,roofstack=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    tracing::info!(
        files = cli.files.len(),
        output_dir = %config.output_dir.display(),
        worker_threads = config.worker_threads,
        write_json = config.write_json,
        emit_drawings = config.emit_drawings,
        "Starting roofstack"
    );

    let results = process_files(&cli.files, &FileTextSource, cli.kind, &config)
        .context("Failed to start document processing")?;

    let print_result = cli.files.len() == 1 && !config.write_json;
    for (path, result) in cli.files.iter().zip(&results) {
        match result {
            Ok(doc) if print_result => {
                let value = doc
                    .output_value()
                    .with_context(|| format!("Failed to serialize {}", path.display()))?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            Ok(doc) => {
                for written in doc.json_path.iter().chain(&doc.drawings) {
                    println!("{}", written.display());
                }
            }
            Err(e) => tracing::error!(path = %path.display(), error = %e, "Document failed"),
        }
    }

    let stats = ProcessingStats::from_results(&results);
    tracing::info!(
        documents = stats.documents,
        failed_documents = stats.failed_documents,
        assemblies = stats.assemblies,
        drawings_written = stats.drawings_written,
        drawings_failed = stats.drawings_failed,
        "Done"
    );

    if stats.all_drawings_failed() {
        bail!("none of the {} drawings could be written", stats.drawings_failed);
    }
    if stats.documents > 0 && stats.failed_documents == stats.documents {
        bail!("no document could be processed");
    }
    Ok(())
}
