// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exporter: serializes the ledger to the interchange files consumed by
//! the rendering tooling.
//!
//! Two forms:
//! - a CSV table (`running.csv`) with fixed column order
//! - structured JSON (`{ "records": [...], "data_source": tag }`), one
//!   file per source plus the combined ledger
//!
//! Both forms carry only positive-distance records; the filter is applied
//! here so no export path can leak an ineligible record.
//!
//! Every export is a whole-file replacement via a temp file renamed into
//! place, so a crash mid-write never leaves a half-written artifact.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::ledger::Ledger;
use crate::models::Record;

/// CSV header, column order is part of the external contract.
const CSV_HEADER: [&str; 6] = ["DT", "distance_Km", "heart", "pace", "start_lat", "start_lng"];

/// Placeholder written when a record has no heart-rate reading.
const HEART_PLACEHOLDER: &str = "120";

/// Sentinel written when a record has no computable pace.
const PACE_SENTINEL: &str = "-";

/// Structured export envelope.
#[derive(Debug, Serialize)]
struct ExportEnvelope<'a> {
    records: Vec<&'a Record>,
    data_source: &'a str,
}

/// Writes export artifacts into a data directory.
pub struct Exporter {
    data_dir: PathBuf,
}

impl Exporter {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Write the tabular export for the ledger's eligible records.
    pub fn write_csv(&self, ledger: &Ledger) -> Result<PathBuf> {
        let path = self.data_dir.join("running.csv");
        let records: Vec<&Record> = ledger.positive_distance().collect();

        let mut buf = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buf);
            writer
                .write_record(CSV_HEADER)
                .map_err(|e| AppError::Export(e.to_string()))?;
            for record in &records {
                writer
                    .write_record(csv_row(record))
                    .map_err(|e| AppError::Export(e.to_string()))?;
            }
            writer
                .flush()
                .map_err(|e| AppError::Export(e.to_string()))?;
        }

        write_atomic(&path, &buf)?;
        tracing::info!(path = %path.display(), records = records.len(), "Wrote CSV export");
        Ok(path)
    }

    /// Write the combined structured export for the merged ledger.
    pub fn write_combined_json(&self, ledger: &Ledger) -> Result<PathBuf> {
        self.write_records_json("running_records_combined.json", ledger.records(), "combined")
    }

    /// Write a per-source structured export (e.g. the raw Mi or Strava
    /// record set before merging).
    pub fn write_source_json(
        &self,
        file_name: &str,
        records: &[Record],
        data_source: &str,
    ) -> Result<PathBuf> {
        self.write_records_json(file_name, records, data_source)
    }

    fn write_records_json(
        &self,
        file_name: &str,
        records: &[Record],
        data_source: &str,
    ) -> Result<PathBuf> {
        let path = self.data_dir.join(file_name);
        let eligible: Vec<&Record> = records
            .iter()
            .filter(|r| r.has_positive_distance())
            .collect();
        let skipped = records.len() - eligible.len();

        let written = eligible.len();
        let envelope = ExportEnvelope {
            records: eligible,
            data_source,
        };
        let json = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| AppError::Export(e.to_string()))?;
        write_atomic(&path, &json)?;
        tracing::info!(
            path = %path.display(),
            records = written,
            skipped,
            data_source,
            "Wrote JSON export"
        );
        Ok(path)
    }
}

/// One CSV row in the fixed column order.
fn csv_row(record: &Record) -> [String; 6] {
    [
        record.start_timestamp().unwrap_or("").to_string(),
        format!("{:.2}", record.distance / 1000.0),
        record
            .average_heartrate
            .map(|hr| format!("{}", hr.round() as i64))
            .unwrap_or_else(|| HEART_PLACEHOLDER.to_string()),
        record
            .pace
            .clone()
            .unwrap_or_else(|| PACE_SENTINEL.to_string()),
        record.start_lat.map(|v| v.to_string()).unwrap_or_default(),
        record.start_lng.map(|v| v.to_string()).unwrap_or_default(),
    ]
}

/// Replace `path` with `contents` atomically: write a sibling temp file,
/// then rename it over the destination.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(path)
        .map_err(|e| AppError::Export(format!("rename into {}: {}", path.display(), e.error)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{calculate_pace, Source};

    fn record(run_id: u64, distance_m: f64) -> Record {
        Record {
            run_id,
            name: "Morning".to_string(),
            distance: distance_m,
            moving_time: 1530,
            elapsed_time: 1530,
            activity_type: "Run".to_string(),
            start_date: Some("2023-01-02 07:00:00".to_string()),
            start_date_local: Some("2023-01-02 07:00:00".to_string()),
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
    fn test_csv_row_defaults() {
        let row = csv_row(&record(1, 5000.0));
        assert_eq!(
            row,
            [
                "2023-01-02 07:00:00".to_string(),
                "5.00".to_string(),
                "120".to_string(),
                "5:06".to_string(),
                String::new(),
                String::new(),
            ]
        );
    }

    #[test]
    fn test_csv_row_with_optionals() {
        let mut rec = record(1, 10000.0);
        rec.average_heartrate = Some(151.6);
        rec.start_lat = Some(39.9);
        rec.start_lng = Some(116.4);
        let row = csv_row(&rec);
        assert_eq!(row[1], "10.00");
        assert_eq!(row[2], "152");
        assert_eq!(row[4], "39.9");
        assert_eq!(row[5], "116.4");
    }

    #[test]
    fn test_csv_pace_sentinel() {
        let mut rec = record(1, 5000.0);
        rec.pace = None;
        assert_eq!(csv_row(&rec)[3], "-");
    }
}
