// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client and adapter.
//!
//! Handles:
//! - Token refresh via the OAuth refresh-token flow
//! - Paginated activity listing
//! - Conversion of raw API activities into canonical records
//!
//! Activities are fetched as raw JSON and converted field by field: a
//! numeric field that fails to coerce becomes its zero/absent default
//! instead of dropping the whole record. Auth or network failure degrades
//! the source to zero records so the rest of the run proceeds.

use serde::Deserialize;
use serde_json::Value;

use crate::adapters::{ParseOutcome, Warning};
use crate::config::StravaCredentials;
use crate::error::AppError;
use crate::models::{calculate_pace, Record, Source};
use crate::time_utils::{parse_datetime_flexible, CANONICAL_FORMAT};

/// Activities fetched per page (Strava maximum).
const PER_PAGE: u32 = 200;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    auth_url: String,
    credentials: StravaCredentials,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(credentials: StravaCredentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://www.strava.com/api/v3".to_string(),
            auth_url: "https://www.strava.com/oauth/token".to_string(),
            credentials,
        }
    }

    /// Create a client pointed at a mock server (tests).
    pub fn with_base_url(credentials: StravaCredentials, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{base_url}/api/v3"),
            auth_url: format!("{base_url}/oauth/token"),
            credentials,
        }
    }

    /// Exchange the refresh token for a fresh access token.
    pub async fn refresh_access_token(&self) -> Result<String, AppError> {
        let response = self
            .http
            .post(&self.auth_url)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        let token: TokenRefreshResponse = self.check_response_json(response).await?;
        tracing::info!("Strava token refreshed");
        Ok(token.access_token)
    }

    /// List all activities after a Unix timestamp, walking every page.
    ///
    /// Activities are returned as raw JSON values; field coercion happens
    /// in the adapter so one bad field never poisons a page.
    pub async fn list_activities_after(
        &self,
        access_token: &str,
        after: i64,
    ) -> Result<Vec<Value>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);
        let mut all = Vec::new();
        let mut page = 1u32;

        loop {
            let response = self
                .http
                .get(&url)
                .bearer_auth(access_token)
                .query(&[
                    ("after", after.to_string()),
                    ("page", page.to_string()),
                    ("per_page", PER_PAGE.to_string()),
                ])
                .send()
                .await
                .map_err(|e| AppError::StravaApi(e.to_string()))?;

            let batch: Vec<Value> = self.check_response_json(response).await?;
            let len = batch.len();
            all.extend(batch);
            if len < PER_PAGE as usize {
                break;
            }
            page += 1;
        }
        Ok(all)
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 {
                return Err(AppError::StravaApi(
                    AppError::STRAVA_TOKEN_ERROR.to_string(),
                ));
            }
            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
}

/// Adapter turning Strava API activities into canonical records.
pub struct StravaAdapter {
    client: StravaClient,
}

impl StravaAdapter {
    pub fn new(client: StravaClient) -> Self {
        Self { client }
    }

    /// Fetch and convert all activities after `fetch_after` (RFC 3339).
    ///
    /// Any failure at the source boundary (token refresh, network, bad
    /// pagination) logs an error and yields an empty outcome; the run is
    /// never aborted by this source.
    pub async fn fetch(&self, fetch_after: &str) -> ParseOutcome {
        let after = match chrono::DateTime::parse_from_rfc3339(fetch_after) {
            Ok(dt) => dt.timestamp(),
            Err(e) => {
                tracing::error!(fetch_after, error = %e, "Invalid fetch-after instant, skipping Strava source");
                return ParseOutcome::default();
            }
        };

        let access_token = match self.client.refresh_access_token().await {
            Ok(t) => t,
            Err(e) if e.is_strava_token_error() => {
                tracing::error!(error = %e, "Strava authorization rejected, skipping source");
                return ParseOutcome::default();
            }
            Err(e) => {
                tracing::error!(error = %e, "Strava token refresh failed, skipping source");
                return ParseOutcome::default();
            }
        };

        let raw = match self.client.list_activities_after(&access_token, after).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Strava activity fetch failed, skipping source");
                return ParseOutcome::default();
            }
        };

        let mut outcome = ParseOutcome::default();
        for activity in &raw {
            match convert_activity(activity) {
                Ok(record) => outcome.records.push(record),
                Err(reason) => outcome
                    .warnings
                    .push(Warning::new(reason, summarize(activity))),
            }
        }
        tracing::info!(
            records = outcome.records.len(),
            skipped = outcome.warnings.len(),
            "Fetched Strava activities"
        );
        outcome
    }
}

/// Convert one raw API activity into a record.
///
/// Only a missing id rejects the activity; every other field degrades to
/// its default when it fails to coerce.
pub fn convert_activity(activity: &Value) -> Result<Record, String> {
    let run_id = activity
        .get("id")
        .and_then(Value::as_u64)
        .ok_or_else(|| "activity has no usable id".to_string())?;

    let name = activity
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let distance = activity.get("distance").and_then(as_f64_lenient).unwrap_or(0.0);
    let moving_time = activity
        .get("moving_time")
        .and_then(as_f64_lenient)
        .map(|f| f as u64)
        .unwrap_or(0);
    let elapsed_time = activity
        .get("elapsed_time")
        .and_then(as_f64_lenient)
        .map(|f| f as u64)
        .unwrap_or(moving_time);

    let activity_type = activity
        .get("sport_type")
        .and_then(Value::as_str)
        .or_else(|| activity.get("type").and_then(Value::as_str))
        .unwrap_or("Run")
        .to_string();

    let (start_lat, start_lng) = extract_latlng(activity.get("start_latlng"));

    Ok(Record {
        run_id,
        name,
        distance,
        moving_time,
        elapsed_time,
        activity_type,
        start_date: canonical_timestamp(activity.get("start_date")),
        start_date_local: canonical_timestamp(activity.get("start_date_local")),
        location_country: activity
            .get("location_country")
            .and_then(Value::as_str)
            .map(str::to_string),
        average_heartrate: activity.get("average_heartrate").and_then(as_f64_lenient),
        average_speed: activity.get("average_speed").and_then(as_f64_lenient),
        pace: calculate_pace(distance, moving_time),
        start_lat,
        start_lng,
        source: Source::Strava,
    })
}

/// Coerce a JSON value to f64, accepting numbers and numeric strings.
fn as_f64_lenient(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Reformat an API timestamp to "YYYY-MM-DD HH:MM:SS".
///
/// Falls back to the raw string when it does not parse, so the reconciler
/// can still classify the record as undated rather than losing the text.
fn canonical_timestamp(v: Option<&Value>) -> Option<String> {
    let raw = v?.as_str()?;
    if raw.is_empty() {
        return None;
    }
    match parse_datetime_flexible(raw) {
        Some(dt) => Some(dt.format(CANONICAL_FORMAT).to_string()),
        None => Some(raw.to_string()),
    }
}

/// Extract a start coordinate only when both components are convertible.
fn extract_latlng(v: Option<&Value>) -> (Option<f64>, Option<f64>) {
    if let Some(Value::Array(pair)) = v {
        if pair.len() == 2 {
            if let (Some(lat), Some(lng)) = (as_f64_lenient(&pair[0]), as_f64_lenient(&pair[1])) {
                return (Some(lat), Some(lng));
            }
        }
    }
    (None, None)
}

/// Short identifier for warning logs.
fn summarize(activity: &Value) -> String {
    activity
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| "<unnamed activity>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_full_activity() {
        let activity = json!({
            "id": 555,
            "name": "Evening Run",
            "distance": 8012.3,
            "moving_time": 2400,
            "elapsed_time": 2500,
            "sport_type": "Run",
            "start_date": "2023-01-02T07:00:00Z",
            "start_date_local": "2023-01-02T15:00:00Z",
            "average_heartrate": 152.4,
            "average_speed": 3.34,
            "start_latlng": [39.9, 116.4]
        });

        let rec = convert_activity(&activity).unwrap();
        assert_eq!(rec.run_id, 555);
        assert_eq!(rec.distance, 8012.3);
        assert_eq!(rec.elapsed_time, 2500);
        assert_eq!(rec.start_date.as_deref(), Some("2023-01-02 07:00:00"));
        assert_eq!(rec.start_date_local.as_deref(), Some("2023-01-02 15:00:00"));
        assert_eq!(rec.start_lat, Some(39.9));
        assert_eq!(rec.start_lng, Some(116.4));
        assert_eq!(rec.source, Source::Strava);
        assert!(rec.pace.is_some());
    }

    #[test]
    fn test_convert_defensive_fields() {
        // Strings where numbers belong, nulls everywhere else
        let activity = json!({
            "id": 7,
            "name": "Odd Run",
            "distance": "5000",
            "moving_time": "not a number",
            "sport_type": "Run"
        });

        let rec = convert_activity(&activity).unwrap();
        assert_eq!(rec.distance, 5000.0);
        assert_eq!(rec.moving_time, 0);
        assert_eq!(rec.elapsed_time, 0);
        assert_eq!(rec.average_heartrate, None);
        // Pace absent because moving time degraded to zero
        assert_eq!(rec.pace, None);
    }

    #[test]
    fn test_convert_without_id_is_rejected() {
        let activity = json!({ "name": "No id" });
        assert!(convert_activity(&activity).is_err());
    }

    #[test]
    fn test_elapsed_falls_back_to_moving() {
        let activity = json!({ "id": 1, "moving_time": 900 });
        let rec = convert_activity(&activity).unwrap();
        assert_eq!(rec.elapsed_time, 900);
    }

    #[test]
    fn test_latlng_requires_both_components() {
        let one = json!({ "id": 1, "start_latlng": [39.9] });
        let rec = convert_activity(&one).unwrap();
        assert_eq!((rec.start_lat, rec.start_lng), (None, None));

        let bad = json!({ "id": 2, "start_latlng": [39.9, null] });
        let rec = convert_activity(&bad).unwrap();
        assert_eq!((rec.start_lat, rec.start_lng), (None, None));

        let empty = json!({ "id": 3, "start_latlng": [] });
        let rec = convert_activity(&empty).unwrap();
        assert_eq!((rec.start_lat, rec.start_lng), (None, None));
    }

    #[test]
    fn test_unparsable_timestamp_kept_raw() {
        let activity = json!({ "id": 1, "start_date": "someday soon" });
        let rec = convert_activity(&activity).unwrap();
        assert_eq!(rec.start_date.as_deref(), Some("someday soon"));
    }
}
