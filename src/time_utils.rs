// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.
//!
//! Source timestamps arrive in several textual forms; ordering and the
//! calendar statistics all go through [`parse_datetime_flexible`] so every
//! consumer agrees on which records count as dated.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Accepted datetime formats, tried in order. First match wins.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Accepted date-only formats, tried after the datetime forms.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Canonical textual form used across exports: "YYYY-MM-DD HH:MM:SS".
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a timestamp string against the accepted formats.
///
/// Tries `"YYYY-MM-DD HH:MM:SS"`, `"YYYY/MM/DD HH:MM:SS"`, `"YYYY-MM-DD"`,
/// `"YYYY/MM/DD"`, then a generic ISO-8601 fallback. Returns `None` when
/// nothing matches; callers treat such records as undated.
pub fn parse_datetime_flexible(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?);
        }
    }
    // ISO-8601 fallback: with offset first, then the bare "T" form
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Number of days in a calendar month, leap years included.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_y, next_m) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    // Valid for all month values 1..=12
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month start");
    let next = NaiveDate::from_ymd_opt(next_y, next_m, 1).expect("valid next month start");
    (next - first).num_days() as u32
}
