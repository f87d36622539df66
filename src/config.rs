// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Strava credentials are optional: when any of them is missing the Strava
//! source simply contributes zero records instead of failing the run.

use std::env;
use std::path::PathBuf;

/// Strava OAuth credentials for the refresh-token flow.
#[derive(Debug, Clone)]
pub struct StravaCredentials {
    /// Strava OAuth client ID (public)
    pub client_id: String,
    /// Strava OAuth client secret
    pub client_secret: String,
    /// Long-lived refresh token issued to this athlete
    pub refresh_token: String,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the Mi export and all output artifacts
    pub data_dir: PathBuf,
    /// Strava credentials; `None` disables the Strava source
    pub strava: Option<StravaCredentials>,
    /// Only fetch Strava activities after this instant (RFC 3339)
    pub fetch_after: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            strava: None,
            fetch_after: "2010-01-01T00:00:00Z".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let strava = match (
            env::var("STRAVA_CLIENT_ID"),
            env::var("STRAVA_CLIENT_SECRET"),
            env::var("STRAVA_REFRESH_TOKEN"),
        ) {
            (Ok(client_id), Ok(client_secret), Ok(refresh_token)) => Some(StravaCredentials {
                client_id: client_id.trim().to_string(),
                client_secret: client_secret.trim().to_string(),
                refresh_token: refresh_token.trim().to_string(),
            }),
            _ => {
                tracing::warn!("Strava credentials not set, Strava source disabled");
                None
            }
        };

        let fetch_after = env::var("STRAVA_FETCH_AFTER")
            .unwrap_or_else(|_| "2010-01-01T00:00:00Z".to_string());
        chrono::DateTime::parse_from_rfc3339(&fetch_after)
            .map_err(|e| ConfigError::Invalid("STRAVA_FETCH_AFTER", e.to_string()))?;

        Ok(Self {
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            strava,
            fetch_after,
        })
    }

    /// Path of the Mi history export inside the data directory.
    pub fn mi_history_path(&self) -> PathBuf {
        self.data_dir.join("mi_running_history.txt")
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
