// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Adapter for the line-oriented Mi history export.
//!
//! The export is a whitespace-tokenized text file with one activity per
//! row. Expected token order:
//!
//! ```text
//! name distance_km moving_time date time country heartrate avg_speed
//! ```
//!
//! The first line is a header and is discarded. Mi rows carry no native
//! activity id, so the adapter assigns sequential synthetic ids starting
//! at [`MI_ID_OFFSET`] to keep them out of Strava's id space.

use std::path::Path;

use crate::adapters::{ParseOutcome, Warning};
use crate::models::{calculate_pace, Record, Source};

/// Synthetic id namespace for Mi records, distinct from Strava's native ids.
pub const MI_ID_OFFSET: u64 = 100_000;

/// Minimum token count for a row to be considered well-formed.
const MIN_TOKENS: usize = 8;

/// Parser for the Mi history export format.
pub struct MiAdapter;

impl MiAdapter {
    /// Parse the export file at `path`.
    ///
    /// A missing file is not an error: this source then contributes zero
    /// records and the run continues.
    pub fn parse_file(path: &Path) -> ParseOutcome {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Mi export not readable, skipping source");
                return ParseOutcome::default();
            }
        };
        let outcome = Self::parse_str(&contents);
        tracing::info!(
            path = %path.display(),
            records = outcome.records.len(),
            skipped = outcome.warnings.len(),
            "Parsed Mi export"
        );
        outcome
    }

    /// Parse export contents. The first line is the header and is dropped.
    pub fn parse_str(contents: &str) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        let mut run_id = MI_ID_OFFSET;

        for line in contents.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_row(line, run_id) {
                Ok(record) => {
                    outcome.records.push(record);
                    run_id += 1;
                }
                Err(reason) => outcome.warnings.push(Warning::new(reason, line)),
            }
        }
        outcome
    }
}

/// Parse one whitespace-tokenized row into a record.
fn parse_row(line: &str, run_id: u64) -> Result<Record, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < MIN_TOKENS {
        return Err(format!("expected at least {MIN_TOKENS} tokens, got {}", parts.len()));
    }

    let name = parts[0].to_string();

    // Source distance is in km; store meters rounded to 0.1 m
    let distance = parts[1]
        .parse::<f64>()
        .map(|km| (km * 1000.0 * 10.0).round() / 10.0)
        .map_err(|_| format!("unparsable distance token '{}'", parts[1]))?;

    let moving_time = parse_moving_time(parts[2]);
    let start_date = format!("{} {}", parts[3], parts[4]);

    let location_country = match parts[5] {
        "null" | "NULL" => None,
        c => Some(c.to_string()),
    };

    // Per-field defensive: a bad heartrate or speed token degrades to None
    let average_heartrate = match parts[6].to_lowercase().as_str() {
        "null" => None,
        hr => hr.parse::<f64>().ok(),
    };
    let average_speed = parts[7].parse::<f64>().ok();

    Ok(Record {
        run_id,
        name,
        distance,
        moving_time,
        elapsed_time: moving_time,
        activity_type: "Run".to_string(),
        start_date: Some(start_date.clone()),
        start_date_local: Some(start_date),
        location_country,
        average_heartrate,
        average_speed,
        pace: calculate_pace(distance, moving_time),
        start_lat: None,
        start_lng: None,
        source: Source::Mi,
    })
}

/// Parse a moving-time token.
///
/// Accepts `mm:ss` and `hh:mm:ss`, then falls back to a raw seconds
/// number, then to 0. Never fails: a garbled duration still leaves a
/// usable record.
fn parse_moving_time(token: &str) -> u64 {
    let segs: Vec<&str> = token.split(':').collect();
    let parsed = match segs.as_slice() {
        [m, s] => match (m.parse::<u64>(), s.parse::<u64>()) {
            (Ok(m), Ok(s)) => Some(m * 60 + s),
            _ => None,
        },
        [h, m, s] => match (h.parse::<u64>(), m.parse::<u64>(), s.parse::<u64>()) {
            (Ok(h), Ok(m), Ok(s)) => Some(h * 3600 + m * 60 + s),
            _ => None,
        },
        _ => None,
    };
    parsed.or_else(|| token.parse::<f64>().ok().map(|f| f as u64)).unwrap_or(0)
}
