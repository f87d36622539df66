// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Canonical activity record shared by all sources.

use serde::{Deserialize, Serialize};

/// Origin adapter of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Line-oriented Mi history export
    Mi,
    /// Strava API sync
    Strava,
}

/// One normalized activity occurrence.
///
/// Ids are unique across the merged ledger by namespace separation: Mi
/// records get synthetic ids starting at 100000 while Strava records keep
/// their native API ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Unique id within the source's namespace
    pub run_id: u64,
    /// Activity name/title
    pub name: String,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    pub moving_time: u64,
    /// Elapsed time in seconds (falls back to moving time)
    pub elapsed_time: u64,
    /// Sport type (Run, Ride, etc.)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Start timestamp ("YYYY-MM-DD HH:MM:SS" when known)
    pub start_date: Option<String>,
    /// Start timestamp in local time, preferred for ordering
    pub start_date_local: Option<String>,
    /// Country where the activity started
    pub location_country: Option<String>,
    /// Average heart rate in bpm
    pub average_heartrate: Option<f64>,
    /// Average speed in m/s
    pub average_speed: Option<f64>,
    /// Pace as "M:SS" per km, absent when distance or time is zero
    pub pace: Option<String>,
    /// Start coordinates; both present or both absent
    pub start_lat: Option<f64>,
    pub start_lng: Option<f64>,
    /// Origin adapter
    pub source: Source,
}

impl Record {
    /// Whether this record counts toward statistics and exports.
    pub fn has_positive_distance(&self) -> bool {
        self.distance > 0.0
    }

    /// Best available start timestamp string (local preferred).
    pub fn start_timestamp(&self) -> Option<&str> {
        self.start_date_local
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.start_date.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Compute pace as a "M:SS" per-km string.
///
/// Returns `None` when distance or moving time is zero, matching the
/// policy that pace is simply absent rather than infinite.
pub fn calculate_pace(distance_m: f64, moving_time_s: u64) -> Option<String> {
    if distance_m <= 0.0 || moving_time_s == 0 {
        return None;
    }
    let pace_sec_per_km = moving_time_s as f64 / (distance_m / 1000.0);
    let total_seconds = pace_sec_per_km.round() as u64;
    Some(format!("{}:{:02}", total_seconds / 60, total_seconds % 60))
}
