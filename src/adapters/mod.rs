// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Source adapters - one per origin format.
//!
//! Each adapter turns its source's native shape into canonical [`Record`]s.
//! Malformed individual items are skipped and reported as warnings; a
//! missing or unreachable source yields an empty record set so the rest of
//! the pipeline keeps going.

pub mod mi;
pub mod strava;

pub use mi::MiAdapter;
pub use strava::{StravaAdapter, StravaClient};

use crate::models::Record;

/// Result of parsing one source: the records that survived plus a warning
/// for every item that did not.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub records: Vec<Record>,
    pub warnings: Vec<Warning>,
}

/// One skipped item, with enough context to find it in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Human-readable reason the item was skipped
    pub reason: String,
    /// Raw item text or identifier, truncated for logging
    pub item: String,
}

impl Warning {
    pub fn new(reason: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            item: item.into(),
        }
    }
}

impl ParseOutcome {
    /// Log every warning at warn level, tagged with the source name.
    pub fn log_warnings(&self, source: &str) {
        for w in &self.warnings {
            tracing::warn!(source, reason = %w.reason, item = %w.item, "Skipped item");
        }
    }
}
