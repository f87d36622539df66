// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use running_sync::error::AppError;

#[test]
fn test_is_strava_token_error_matches_sentinel() {
    let err = AppError::StravaApi(AppError::STRAVA_TOKEN_ERROR.to_string());
    assert!(err.is_strava_token_error());
}

#[test]
fn test_is_strava_token_error_no_match() {
    let err = AppError::StravaApi("HTTP 500: boom".to_string());
    assert!(!err.is_strava_token_error());

    // Transport failures that mention tokens are not auth errors
    let err = AppError::StravaApi("Token refresh request failed: timed out".to_string());
    assert!(!err.is_strava_token_error());

    let err = AppError::Export("disk full".to_string());
    assert!(!err.is_strava_token_error());
}
