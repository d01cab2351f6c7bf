// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use portfolio_edge::error::AppError;

mod common;

#[tokio::test]
async fn test_error_status_codes() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED, "unauthorized"),
        (
            AppError::BadRequest("nope".to_string()),
            StatusCode::BAD_REQUEST,
            "bad_request",
        ),
        (
            AppError::Storage("disk full".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
            "storage_error",
        ),
        (
            AppError::Internal(anyhow::anyhow!("boom")),
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
        ),
    ];

    for (err, status, code) in cases {
        let response = err.into_response();
        assert_eq!(response.status(), status);
        let body = common::body_json(response).await;
        assert_eq!(body["error"], code);
    }
}

#[tokio::test]
async fn test_bad_request_carries_details() {
    let response = AppError::BadRequest("data must be an object".to_string()).into_response();
    let body = common::body_json(response).await;
    assert_eq!(body["details"], "data must be an object");
}

#[tokio::test]
async fn test_server_errors_hide_details() {
    let response = AppError::Storage("/var/data/secret_key.json: EIO".to_string()).into_response();
    let body = common::body_json(response).await;
    assert!(body.get("details").is_none());
}
