// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Letter text through to DXF files on disk

use approx::assert_relative_eq;
use roofstack_core::{parse_assembly_letter, AssemblyRecord, FieldKey};
use roofstack_geometry::{build_stack, emit_record, LayerKind, MEMBRANE_CLEARANCE};

const LETTER: &str = r#"Carlisle SynTec Systems
March 14, 2024
Re: Walmart Supercenter #1234, Springfield, MO

Main Store Roof
Deck: 22 ga Metal
Vapor Barrier: 725TR self-adhered
Insulation: 2.6" Polyiso, mechanically fastened
Insulation: 2.6" Polyiso, adhered with Flexible DASH
Cover board: 1/2" Securock, mechanically fastened
Membrane: 60 mil Sure-Weld TPO, fully adhered

Canopy Roofs
Deck: Wood Plank
Cover board: 1/4" DensDeck Prime, mechanically fastened
Membrane: 60 mil Sure-Weld TPO, mechanically fastened
"#;

fn assemblies() -> Vec<AssemblyRecord> {
    parse_assembly_letter(LETTER).into_assemblies()
}

#[test]
fn test_main_roof_stack_heights() {
    let records = assemblies();
    let stack = build_stack(&records[0]);

    let kinds: Vec<LayerKind> = stack.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LayerKind::Deck,
            LayerKind::VaporBarrier,
            LayerKind::Insulation,
            LayerKind::Insulation,
            LayerKind::Coverboard,
            LayerKind::Adhesive,
            LayerKind::Membrane,
        ]
    );

    let coverboard = &stack[4];
    assert_relative_eq!(coverboard.thickness, 0.5);
    assert_relative_eq!(coverboard.y_end, 3.0 + 0.03125 + 2.6 + 2.6 + 0.5, epsilon = 1e-9);

    let membrane = &stack[6];
    assert_relative_eq!(membrane.y_start, coverboard.y_end + MEMBRANE_CLEARANCE, epsilon = 1e-9);
    assert_relative_eq!(stack[5].y_start, membrane.y_start);
    assert_eq!(membrane.label, "60 MIL SURE-WELD TPO");
    assert_eq!(membrane.attachment.as_deref(), Some("fully adhered"));

    assert_eq!(stack[2].label, "2.6\" POLYISO");
    assert_eq!(stack[3].attachment.as_deref(), Some("adhered with flexible dash"));
}

#[test]
fn test_canopy_stack_is_independent() {
    let records = assemblies();
    let stack = build_stack(&records[1]);
    assert_eq!(stack[0].label, "WOOD PLANK (BY OTHERS)");
    assert!(stack.iter().all(|l| l.kind != LayerKind::Insulation));
    assert!(stack.iter().all(|l| l.kind != LayerKind::Adhesive));
    let membrane = stack.last().unwrap();
    assert_relative_eq!(membrane.y_start, 3.0 + 0.25 + MEMBRANE_CLEARANCE, epsilon = 1e-9);
}

#[test]
fn test_one_drawing_per_assembly() {
    let dir = tempfile::tempdir().unwrap();
    let records = assemblies();

    let paths: Vec<_> = records
        .iter()
        .enumerate()
        .map(|(i, record)| emit_record(record, dir.path(), i + 1).unwrap())
        .collect();

    assert_eq!(paths[0].file_name().unwrap(), "Main_Store_Roof.dxf");
    assert_eq!(paths[1].file_name().unwrap(), "Canopy_Roofs.dxf");

    let main = std::fs::read_to_string(&paths[0]).unwrap();
    for layer in [
        "DECK-OUTLINE",
        "DECK-HATCH",
        "VAPOR-BARRIER-HATCH",
        "INSULATION-TEXT",
        "COVERBOARD-OUTLINE",
        "MEMBRANE-ADHESIVE",
    ] {
        assert!(main.contains(layer), "{layer} missing");
    }
    assert!(main.contains("INSUL"));
    assert!(main.contains("AR-SAND"));
    assert!(main.contains("SOLID"));

    let canopy = std::fs::read_to_string(&paths[1]).unwrap();
    assert!(!canopy.contains("MEMBRANE-ADHESIVE"));
    assert!(!canopy.contains("INSULATION"));
}

#[test]
fn test_unnamed_record_falls_back_to_number() {
    let dir = tempfile::tempdir().unwrap();
    let record: AssemblyRecord = [(FieldKey::Membrane1, "80 mil PVC".to_string())]
        .into_iter()
        .collect();
    let path = emit_record(&record, dir.path(), 3).unwrap();
    assert_eq!(path.file_name().unwrap(), "Assembly_3.dxf");
}
