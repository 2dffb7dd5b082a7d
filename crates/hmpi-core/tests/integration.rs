//! Integration tests for the import -> compute -> store -> export pipeline.

use hmpi_core::error::HmpiError;
use hmpi_core::export::to_csv;
use hmpi_core::import::{import_bytes, BatchFormat};
use hmpi_core::model::{Category, MetalKey};
use hmpi_core::reference::{self, ReferenceTable};
use hmpi_core::session::{CalculateTarget, Session};
use hmpi_core::{analyze_batch, analyze_file};
use rust_decimal_macros::dec;
use std::io::Write;

const HEADER: &str = "sampleName,latitude,longitude,cd,pb,cr,cu,zn,ni";

// ---------------------------------------------------------------------------
// Test 1: CSV batch with all three categories
// ---------------------------------------------------------------------------
#[test]
fn csv_batch_classifies_each_sample() {
    let csv = format!(
        "{HEADER}\n\
         Village well,26.91,75.79,0.001,0.004,0.02,0.8,1.1,0.03\n\
         Tubewell 4,26.95,75.81,0.0045,0.015,0.075,3.0,4.5,0.105\n\
         Mine seep,27.02,75.90,0.012,0.05,0.2,6.0,9.0,0.3\n"
    );

    let analysis = analyze_batch(csv.as_bytes(), BatchFormat::Csv, ReferenceTable::default())
        .unwrap();

    assert_eq!(analysis.success_count, 3);
    assert_eq!(analysis.error_count, 0);
    let categories: Vec<Category> = analysis.results.iter().map(|r| r.category).collect();
    assert_eq!(
        categories,
        vec![Category::Safe, Category::Moderate, Category::Hazardous]
    );
    // Tubewell 4 has every metal at 1.5x its standard.
    assert_eq!(analysis.results[1].hmpi, dec!(150));
    assert_eq!(analysis.summary.hazardous, 1);
}

// ---------------------------------------------------------------------------
// Test 2: Structured records, one bad record does not abort the batch
// ---------------------------------------------------------------------------
#[test]
fn json_batch_partial_failure() {
    let json = br#"[
        { "sampleName": "R1", "cd": 0.001, "pb": 0.005, "cr": 0.01, "cu": 1, "zn": 1, "ni": 0.01 },
        { "sampleName": "R2", "cd": 0.002, "pb": 0.005, "cr": 0.01, "cu": 1, "zn": 1, "ni": 0.01 },
        { "sampleName": "R3", "cd": -0.002, "pb": 0.005, "cr": 0.01, "cu": 1, "zn": 1, "ni": 0.01 },
        { "cd": "0.003", "pb": "0.01", "cr": "0.05", "cu": "2", "zn": "3", "ni": "0.07" },
        { "sampleName": "R5", "latitude": -90, "longitude": 180,
          "cd": 0, "pb": 0, "cr": 0, "cu": 0, "zn": 0, "ni": 0 }
    ]"#;

    let summary = import_bytes(json, BatchFormat::Json).unwrap();

    assert_eq!(summary.success_count, 4);
    assert_eq!(summary.error_count, 1);
    assert_eq!(summary.imported.len(), 4);
    assert_eq!(summary.failures[0].record, 3);
    assert!(summary.failures[0].reason.contains("cadmium"));
    assert_eq!(summary.imported[2].name(), "Sample 4");
}

// ---------------------------------------------------------------------------
// Test 3: Missing column fails before any row is processed
// ---------------------------------------------------------------------------
#[test]
fn csv_missing_cr_column_is_format_error() {
    let csv = "sampleName,latitude,longitude,cd,pb,cu,zn,ni\nW,1,1,0,0,0,0,0\n";

    let err = import_bytes(csv.as_bytes(), BatchFormat::Csv).unwrap_err();

    match err {
        HmpiError::MissingColumns(cols) => assert_eq!(cols, vec!["cr"]),
        other => panic!("expected MissingColumns, got {other}"),
    }
}

// ---------------------------------------------------------------------------
// Test 4: Batch with no valid record fails as a whole
// ---------------------------------------------------------------------------
#[test]
fn batch_without_valid_records_fails() {
    let csv = format!("{HEADER}\n,,,0,0,0,0,0,0\nW,91,0,0,0,0,0,0,0\n");

    let err = analyze_batch(csv.as_bytes(), BatchFormat::Csv, ReferenceTable::default())
        .unwrap_err();

    assert!(matches!(err, HmpiError::NoValidRecords { errors: 2 }));
}

// ---------------------------------------------------------------------------
// Test 5: Export then re-import keeps concentrations exactly
// ---------------------------------------------------------------------------
#[test]
fn export_round_trip_preserves_concentrations() {
    let csv = format!(
        "{HEADER}\n\
         \"Well, north\",12.345678,-45.5,0.00125,0.0087,0.0333,1.999,2.75,0.0701\n\
         Spring,,,1.5e-3,0.010,0.050,2.0,3.0,0.070\n"
    );
    let mut session = Session::default();
    session
        .on_batch_file_loaded(csv.as_bytes(), BatchFormat::Csv)
        .unwrap();
    let exported = to_csv(session.store().results()).unwrap();

    let reimported = import_bytes(exported.as_bytes(), BatchFormat::Csv).unwrap();

    assert_eq!(reimported.success_count, 2);
    for (original, again) in session.store().samples().iter().zip(&reimported.imported) {
        assert_eq!(original.name(), again.name());
        assert_eq!(original.metals(), again.metals());
        assert_eq!(original.latitude(), again.latitude());
        assert_eq!(original.longitude(), again.longitude());
        assert_ne!(original.id(), again.id());
    }
}

// ---------------------------------------------------------------------------
// Test 6: Store removal and recompute leniency through the session
// ---------------------------------------------------------------------------
#[test]
fn removed_sample_is_not_recomputed() {
    let csv = format!("{HEADER}\nA,,,0.003,0.01,0.05,2,3,0.07\nB,,,0,0,0,0,0,0\n");
    let mut session = Session::default();
    session
        .on_batch_file_loaded(csv.as_bytes(), BatchFormat::Csv)
        .unwrap();
    let id = session.store().samples()[0].id();

    session.store_mut().remove(id);

    assert!(session.store().result(id).is_none());
    let recomputed = session
        .on_calculate_requested(CalculateTarget::Sample(id))
        .unwrap();
    assert!(recomputed.is_empty());
    let all = session.on_calculate_requested(CalculateTarget::All).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].sample_name, "B");
    assert_eq!(all[0].dominant_metal, None);
}

// ---------------------------------------------------------------------------
// Test 7: Custom reference table changes the index
// ---------------------------------------------------------------------------
#[test]
fn custom_reference_table_from_file() {
    let mut def = reference::builtin::builtin_def();
    for entry in &mut def.metals {
        if entry.metal == MetalKey::Cd {
            // Relax cadmium to 0.006 mg/L.
            entry.standard = dec!(0.006);
        }
    }
    let mut table_file = tempfile::NamedTempFile::new().unwrap();
    table_file
        .write_all(serde_json::to_string(&def).unwrap().as_bytes())
        .unwrap();
    let table = reference::load_table(table_file.path()).unwrap();

    let mut data_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(data_file, "{HEADER}").unwrap();
    writeln!(data_file, "W,,,0.006,0,0,0,0,0").unwrap();

    let builtin = analyze_file(data_file.path(), ReferenceTable::default()).unwrap();
    let custom = analyze_file(data_file.path(), table).unwrap();

    // 2 * 0.20 * 100 = 40 with the built-in standard, half that when relaxed.
    assert_eq!(builtin.results[0].hmpi, dec!(40));
    assert_eq!(custom.results[0].hmpi, dec!(20));
}

// ---------------------------------------------------------------------------
// Test 8: A row whose index overflows is rejected without losing the batch
// ---------------------------------------------------------------------------
#[test]
fn overflowing_row_does_not_abort_batch() {
    let csv = format!(
        "{HEADER}\n\
         Good,,,0.003,0.01,0.05,2,3,0.07\n\
         Huge,,,1e27,0.01,0.05,2,3,0.07\n"
    );

    let analysis = analyze_batch(csv.as_bytes(), BatchFormat::Csv, ReferenceTable::default())
        .unwrap();

    assert_eq!(analysis.results.len(), 1);
    assert_eq!(analysis.results[0].sample_name, "Good");
    assert_eq!(analysis.results[0].hmpi, dec!(100));
    assert_eq!(analysis.success_count, 1);
    assert_eq!(analysis.error_count, 1);
    assert_eq!(analysis.failures.len(), 1);
    assert_eq!(analysis.failures[0].record, 2);
    assert_eq!(analysis.failures[0].name.as_deref(), Some("Huge"));
    assert_eq!(analysis.failures[0].field, "cd");
    assert_eq!(analysis.summary.samples, 1);
}
