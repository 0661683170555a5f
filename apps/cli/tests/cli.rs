// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const LETTER: &str = "Carlisle SynTec Systems\n\
Re: Store #1234, Springfield, MO\n\
\n\
Main Store Roof\n\
Deck: 22 ga Metal\n\
Insulation: 2.6\" Polyiso, mechanically fastened\n\
Membrane: 60 mil TPO, fully adhered\n\
\n\
Canopy Roofs\n\
Deck: Wood Plank\n\
Membrane: 60 mil TPO, mechanically fastened\n";

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_roofstack")));
    for var in [
        "ROOFSTACK_OUTPUT_DIR",
        "ROOFSTACK_WORKER_THREADS",
        "ROOFSTACK_WRITE_JSON",
        "ROOFSTACK_EMIT_DRAWINGS",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn write_input(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn cli_letter_writes_drawings_and_json() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "letter.txt", LETTER);
    let out = dir.path().join("out");

    cmd()
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Main_Store_Roof.dxf"))
        .stdout(predicate::str::contains("Canopy_Roofs.dxf"))
        .stdout(predicate::str::contains("letter.json"));

    assert!(out.join("letter.json").exists());
    assert!(out.join("letter").join("Main_Store_Roof.dxf").exists());
    let dxf = std::fs::read_to_string(out.join("letter").join("Canopy_Roofs.dxf")).unwrap();
    assert!(dxf.contains("WOOD PLANK (BY OTHERS)"));
}

#[test]
fn cli_single_file_without_json_prints_result() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "letter.txt", LETTER);

    let output = cmd()
        .arg(&input)
        .args(["--no-json", "--no-drawings", "--output"])
        .arg(dir.path().join("out"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["manufacturer"], "Carlisle SynTec");
    assert_eq!(json["assemblies"][0]["roof_area"], "Main Store Roof");
    assert_eq!(json["assemblies"][1]["membrane_1_attachment"], "mechanically fastened");
    assert!(!dir.path().join("out").exists());
}

#[test]
fn cli_kind_override() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        dir.path(),
        "document.txt",
        "Owner: Walmart Inc.\nThe Contract Sum shall be $98,000.00\n",
    );

    cmd()
        .arg(&input)
        .args(["--kind", "contract", "--no-json", "--no-drawings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"contract_sum\": \"$98,000.00\""));
}

#[test]
fn cli_rejects_unknown_kind() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "letter.txt", LETTER);

    cmd()
        .arg(&input)
        .args(["--kind", "invoice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invoice"));
}

#[test]
fn cli_requires_files() {
    cmd().assert().failure();
}

#[test]
fn cli_fails_when_output_is_unusable() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "letter.txt", LETTER);
    let blocker = write_input(dir.path(), "not_a_dir", "");

    cmd()
        .arg(&input)
        .arg("--output")
        .arg(&blocker)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no document could be processed"));
}
