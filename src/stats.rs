// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Statistics engine: pure, calendar-aligned derivations over the ledger.
//!
//! Everything here re-derives from scratch each run; data volumes are a
//! few thousand records at most, so there is no caching layer. Records
//! with non-positive distance are excluded from every computation, and
//! only dated records participate in the calendar statistics.
//!
//! "Now" is always an explicit parameter so the engine stays deterministic
//! under test; the binary passes the wall clock.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::ledger::{record_datetime, Ledger};
use crate::models::Record;
use crate::time_utils::days_in_month;

/// Months in the rolling aggregation window.
const ROLLING_WINDOW_MONTHS: usize = 12;

/// Monthly attendance percentages, all-time and current-calendar-year.
#[derive(Debug, Clone, PartialEq)]
pub struct Attendance {
    /// Index 0 = January. Percentage of eligible calendar days with at
    /// least one activity, over the full history's year range.
    pub all_time: [f64; 12],
    /// Same, restricted to the current calendar year.
    pub current_year: [f64; 12],
}

/// Aggregate numbers for the renderer's info panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Count of eligible records
    pub total_runs: usize,
    /// Sum of all eligible distances, km
    pub total_km: f64,
    /// Calendar years spanned by dated records (inclusive)
    pub years_spanned: u32,
    /// Distance run in the current calendar year, km
    pub current_year_km: f64,
    /// Date and distance (km) of the most recent dated run
    pub latest: Option<(NaiveDate, f64)>,
}

/// Dated, positive-distance records with their parsed timestamps, in
/// ledger order. The working set for every calendar statistic.
fn dated_records(ledger: &Ledger) -> Vec<(NaiveDateTime, &Record)> {
    ledger
        .positive_distance()
        .filter_map(|r| record_datetime(r).map(|dt| (dt, r)))
        .collect()
}

/// Running sum of distance in kilometers, one value per eligible record,
/// in ledger order. Monotonically non-decreasing.
pub fn accumulated_km(ledger: &Ledger) -> Vec<f64> {
    let mut acc = 0.0;
    ledger
        .positive_distance()
        .map(|r| {
            acc += r.distance / 1000.0;
            acc
        })
        .collect()
}

/// Per-record pace values in seconds per kilometer, in ledger order.
///
/// Raw values only: percentile clipping is the renderer's business, the
/// engine never discards outliers. Records without a computable pace
/// (zero distance or zero moving time) are skipped.
pub fn pace_seconds(ledger: &Ledger) -> Vec<u32> {
    ledger
        .positive_distance()
        .filter(|r| r.moving_time > 0)
        .map(pace_secs_per_km)
        .collect()
}

/// Pace values restricted to dated records in `year`.
pub fn pace_seconds_for_year(ledger: &Ledger, year: i32) -> Vec<u32> {
    dated_records(ledger)
        .into_iter()
        .filter(|(dt, r)| dt.year() == year && r.moving_time > 0)
        .map(|(_, r)| pace_secs_per_km(r))
        .collect()
}

fn pace_secs_per_km(record: &Record) -> u32 {
    (record.moving_time as f64 / (record.distance / 1000.0)).round() as u32
}

/// Monthly attendance over the full history and over the current year.
///
/// For month m: distinct activity days in m (across the relevant years)
/// divided by the calendar days m spans over that same range, as a
/// percentage. Multiple runs on one day count that day once. A month
/// with zero eligible days yields 0.0.
pub fn monthly_attendance(ledger: &Ledger, today: NaiveDate) -> Attendance {
    let dated = dated_records(ledger);
    let this_year = today.year();

    let mut all_time = [0.0; 12];
    let mut current_year = [0.0; 12];
    if dated.is_empty() {
        return Attendance {
            all_time,
            current_year,
        };
    }

    // Distinct activity days, bucketed by calendar month
    let mut days_all: [HashSet<NaiveDate>; 12] = Default::default();
    let mut days_this_year: [HashSet<NaiveDate>; 12] = Default::default();
    for (dt, _) in &dated {
        let date = dt.date();
        let m = date.month0() as usize;
        days_all[m].insert(date);
        if date.year() == this_year {
            days_this_year[m].insert(date);
        }
    }

    // Calendar-day denominators. The all-time span runs from the first
    // dated record's month to the last's, with partial first/last years.
    let (first, _) = dated[0];
    let (last, _) = dated[dated.len() - 1];
    let span_days = calendar_days_per_month(
        first.year(),
        last.year(),
        Some(first.month()),
        Some(last.month()),
    );
    let year_days = calendar_days_per_month(this_year, this_year, None, None);

    for m in 0..12 {
        if span_days[m] > 0 {
            all_time[m] = days_all[m].len() as f64 / span_days[m] as f64 * 100.0;
        }
        if year_days[m] > 0 {
            current_year[m] = days_this_year[m].len() as f64 / year_days[m] as f64 * 100.0;
        }
    }

    Attendance {
        all_time,
        current_year,
    }
}

/// Total calendar days each month spans between `year_start` and
/// `year_end` inclusive, with optional partial first and last years.
///
/// A month outside the span contributes 0 days.
fn calendar_days_per_month(
    year_start: i32,
    year_end: i32,
    month_start: Option<u32>,
    month_end: Option<u32>,
) -> [u32; 12] {
    let mut totals = [0u32; 12];
    for y in year_start..=year_end {
        let from = if y == year_start {
            month_start.unwrap_or(1)
        } else {
            1
        };
        let to = if y == year_end {
            month_end.unwrap_or(12)
        } else {
            12
        };
        for m in from..=to {
            totals[(m - 1) as usize] += days_in_month(y, m);
        }
    }
    totals
}

/// Summed distance (km) per month for the trailing 12 calendar months
/// ending at `today`'s month, inclusive.
///
/// Always exactly 12 `("YYYY-MM", km)` pairs in ascending order; months
/// without activity yield 0.0.
pub fn rolling_12_month_totals(ledger: &Ledger, today: NaiveDate) -> Vec<(String, f64)> {
    let mut km_by_month: BTreeMap<String, f64> = BTreeMap::new();
    for (dt, record) in dated_records(ledger) {
        let key = format!("{:04}-{:02}", dt.year(), dt.month());
        *km_by_month.entry(key).or_insert(0.0) += record.distance / 1000.0;
    }

    let mut window = Vec::with_capacity(ROLLING_WINDOW_MONTHS);
    let (mut year, mut month) = (today.year(), today.month());
    for _ in 0..ROLLING_WINDOW_MONTHS {
        window.push((year, month));
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    window.reverse();

    window
        .into_iter()
        .map(|(y, m)| {
            let label = format!("{y:04}-{m:02}");
            let km = km_by_month.get(&label).copied().unwrap_or(0.0);
            (label, km)
        })
        .collect()
}

/// Close a series into a loop for polar/radar display by repeating its
/// first element at the end. Series of length 0 or 1 are unchanged.
pub fn make_circular<T: Clone>(mut series: Vec<T>) -> Vec<T> {
    if series.len() > 1 {
        series.push(series[0].clone());
    }
    series
}

/// Aggregate figures for the renderer's info panel.
pub fn summary(ledger: &Ledger, today: NaiveDate) -> Summary {
    let dated = dated_records(ledger);
    let this_year = today.year();

    let total_runs = ledger.positive_distance().count();
    let total_km: f64 = ledger.positive_distance().map(|r| r.distance / 1000.0).sum();
    let current_year_km: f64 = dated
        .iter()
        .filter(|(dt, _)| dt.year() == this_year)
        .map(|(_, r)| r.distance / 1000.0)
        .sum();

    let years_spanned = match (dated.first(), dated.last()) {
        (Some((first, _)), Some((last, _))) => (last.year() - first.year() + 1).max(1) as u32,
        _ => 0,
    };
    let latest = dated
        .last()
        .map(|(dt, r)| (dt.date(), r.distance / 1000.0));

    Summary {
        total_runs,
        total_km,
        years_spanned,
        current_year_km,
        latest,
    }
}
