// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Only structural failures surface as errors; per-record and per-source
//! problems are downgraded to warnings at the adapter boundary so one bad
//! source never aborts the run.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Sentinel message for Strava auth failures.
    pub const STRAVA_TOKEN_ERROR: &'static str = "Strava token invalid or expired";

    /// Whether this error indicates a Strava auth problem (expired or
    /// revoked token) rather than a transport failure.
    ///
    /// Matches only the sentinel set on 401 responses; message substrings
    /// would misclassify transport failures that merely mention tokens.
    pub fn is_strava_token_error(&self) -> bool {
        matches!(self, AppError::StravaApi(msg) if msg == Self::STRAVA_TOKEN_ERROR)
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, AppError>;
