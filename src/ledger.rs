// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The reconciler: merges adapter outputs into one canonical ledger.
//!
//! Ordering is a total order, so the merge is idempotent and independent
//! of the order adapters ran in:
//! 1. Dated records (start timestamp parses) before undated ones.
//! 2. Dated records ascend by parsed timestamp, then by id.
//! 3. Undated records ascend by id.
//!
//! The reconciler never mutates or drops a record; invalid-date records
//! stay in the ledger and sort to the end.

use chrono::NaiveDateTime;

use crate::models::Record;
use crate::time_utils::parse_datetime_flexible;

/// The fully merged, deterministically ordered record sequence for a run.
///
/// Built fresh on every run and immutable afterwards; the sole input to
/// the exporter and the statistics engine.
#[derive(Debug, Default)]
pub struct Ledger {
    records: Vec<Record>,
}

impl Ledger {
    /// Merge record sequences from all adapters into an ordered ledger.
    pub fn merge(sequences: Vec<Vec<Record>>) -> Self {
        let mut records: Vec<Record> = sequences.into_iter().flatten().collect();
        records.sort_by_cached_key(sort_key);
        tracing::info!(records = records.len(), "Merged ledger");
        Self { records }
    }

    /// All records in ledger order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records eligible for statistics and export (positive distance).
    pub fn positive_distance(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| r.has_positive_distance())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Total-order sort key for a record.
///
/// Undated records compare greater than every dated one via the leading
/// discriminant; the timestamp slot is then irrelevant for them.
fn sort_key(record: &Record) -> (u8, NaiveDateTime, u64) {
    match record.start_timestamp().and_then(parse_datetime_flexible) {
        Some(dt) => (0, dt, record.run_id),
        None => (1, NaiveDateTime::MIN, record.run_id),
    }
}

/// Parsed start timestamp of a record, if it is dated.
pub fn record_datetime(record: &Record) -> Option<NaiveDateTime> {
    record.start_timestamp().and_then(parse_datetime_flexible)
}
