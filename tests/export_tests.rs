// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Export artifact tests: schema, filtering, and overwrite semantics.

use running_sync::export::Exporter;
use running_sync::ledger::Ledger;
use running_sync::models::{calculate_pace, Record, Source};

fn record(run_id: u64, start: Option<&str>, distance_m: f64) -> Record {
    Record {
        run_id,
        name: format!("run-{run_id}"),
        distance: distance_m,
        moving_time: 1530,
        elapsed_time: 1530,
        activity_type: "Run".to_string(),
        start_date: start.map(str::to_string),
        start_date_local: start.map(str::to_string),
        location_country: None,
        average_heartrate: None,
        average_speed: None,
        pace: calculate_pace(distance_m, 1530),
        start_lat: None,
        start_lng: None,
        source: Source::Mi,
    }
}

#[test]
fn test_csv_schema_and_distance_filter() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(dir.path());

    let ledger = Ledger::merge(vec![vec![
        record(1, Some("2023-01-02 07:00:00"), 5000.0),
        record(2, Some("2023-01-03 07:00:00"), 0.0),
        record(3, Some("2023-01-04 07:00:00"), -100.0),
    ]]);
    let path = exporter.write_csv(&ledger).unwrap();

    let contents = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "DT,distance_Km,heart,pace,start_lat,start_lng");
    // Zero and negative distances are excluded
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "2023-01-02 07:00:00,5.00,120,5:06,,");
}

#[test]
fn test_combined_json_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(dir.path());

    let ledger = Ledger::merge(vec![vec![
        record(1, Some("2023-01-02 07:00:00"), 5000.0),
        record(2, None, 0.0),
    ]]);
    let path = exporter.write_combined_json(&ledger).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(json["data_source"], "combined");
    // The zero-distance record stays in the ledger but never reaches an
    // export; the combined JSON carries eligible records only
    assert_eq!(ledger.len(), 2);
    assert_eq!(json["records"].as_array().unwrap().len(), 1);
    assert_eq!(json["records"][0]["run_id"], 1);
    assert_eq!(json["records"][0]["source"], "mi");
    assert_eq!(json["records"][0]["type"], "Run");
}

#[test]
fn test_source_json_tags_and_distance_filter() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(dir.path());

    let records = vec![
        record(1, Some("2023-01-02 07:00:00"), 5000.0),
        record(2, Some("2023-01-03 07:00:00"), 0.0),
        record(3, Some("2023-01-04 07:00:00"), -100.0),
    ];
    let path = exporter
        .write_source_json("running_records_manual_add.json", &records, "manual_add")
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(json["data_source"], "manual_add");
    // Non-positive distances are excluded from per-source exports too
    assert_eq!(json["records"].as_array().unwrap().len(), 1);
    assert_eq!(json["records"][0]["run_id"], 1);
}

#[test]
fn test_reexport_is_full_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(dir.path());

    let big = Ledger::merge(vec![vec![
        record(1, Some("2023-01-02 07:00:00"), 5000.0),
        record(2, Some("2023-01-03 07:00:00"), 6000.0),
    ]]);
    let small = Ledger::merge(vec![vec![record(3, Some("2023-01-04 07:00:00"), 7000.0)]]);

    exporter.write_csv(&big).unwrap();
    let path = exporter.write_csv(&small).unwrap();

    let contents = std::fs::read_to_string(path).unwrap();
    // Second export fully replaces the first, never appends
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.contains("7.00"));
    assert!(!contents.contains("5.00"));
}

#[test]
fn test_empty_ledger_exports_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(dir.path());

    let empty = Ledger::merge(vec![]);
    let csv_path = exporter.write_csv(&empty).unwrap();
    let json_path = exporter.write_combined_json(&empty).unwrap();

    let csv = std::fs::read_to_string(csv_path).unwrap();
    assert_eq!(csv.lines().count(), 1);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(json["records"].as_array().unwrap().len(), 0);
}
