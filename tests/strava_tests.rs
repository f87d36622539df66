// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava source boundary tests.
//!
//! Conversion of raw API payloads is unit-tested in the adapter module;
//! these tests cover the degradation policy: a source that cannot be
//! reached contributes zero records instead of failing the run.

use running_sync::adapters::{StravaAdapter, StravaClient};
use running_sync::config::StravaCredentials;

fn test_credentials() -> StravaCredentials {
    StravaCredentials {
        client_id: "12345".to_string(),
        client_secret: "secret".to_string(),
        refresh_token: "refresh".to_string(),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_degrades_to_empty() {
    // Nothing listens on port 1; the token refresh fails immediately
    let client = StravaClient::with_base_url(test_credentials(), "http://127.0.0.1:1");
    let outcome = StravaAdapter::new(client)
        .fetch("2010-01-01T00:00:00Z")
        .await;

    assert!(outcome.records.is_empty());
    assert!(outcome.warnings.is_empty());
}

#[tokio::test]
async fn test_invalid_fetch_after_degrades_to_empty() {
    let client = StravaClient::with_base_url(test_credentials(), "http://127.0.0.1:1");
    let outcome = StravaAdapter::new(client).fetch("not an instant").await;

    assert!(outcome.records.is_empty());
}
