// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Running-Sync: reconcile Mi and Strava running records into one ledger.
//!
//! This crate parses a Mi history export and the Strava API into a
//! canonical, deterministically ordered ledger, exports it for external
//! rendering tools, and derives calendar-aligned statistics (accumulated
//! distance, attendance, rolling 12-month totals, pace distributions).

pub mod adapters;
pub mod config;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod stats;
pub mod time_utils;
