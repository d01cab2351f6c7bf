// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin API routes.
//! The auth middleware is applied in routes/mod.rs for these routes.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_CREDENTIAL_LEN: u64 = 256;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/data", post(save_data))
        .route("/api/change-password", post(change_password))
}

// ─── Portfolio Content ───────────────────────────────────────

#[derive(Deserialize)]
pub struct SaveDataRequest {
    /// Must be a JSON object; checked by the portfolio service
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export))]
pub struct SaveDataResponse {
    pub message: String,
    pub last_time: String,
}

/// Replace the portfolio document.
async fn save_data(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveDataRequest>,
) -> Result<Json<SaveDataResponse>> {
    let last_time = state.portfolio.save(request.data).await?;

    Ok(Json(SaveDataResponse {
        message: "Data updated successfully".to_string(),
        last_time,
    }))
}

// ─── Credentials ─────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_CREDENTIAL_LEN))]
    username: String,
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_CREDENTIAL_LEN))]
    password: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export))]
pub struct MessageResponse {
    pub message: String,
}

/// Overwrite the admin credentials. Existing sessions stay valid.
async fn change_password(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    request.validate().map_err(|_| {
        AppError::BadRequest(format!(
            "Username and password required (at most {} characters)",
            MAX_CREDENTIAL_LEN
        ))
    })?;

    state
        .credentials
        .update(&request.username, &request.password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, password: &str) -> ChangePasswordRequest {
        ChangePasswordRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn credential_length_limits() {
        let max = MAX_CREDENTIAL_LEN as usize;
        assert!(request("admin", &"p".repeat(max)).validate().is_ok());
        assert!(request(&"u".repeat(max), "pw").validate().is_ok());

        assert!(request("admin", &"p".repeat(max + 1)).validate().is_err());
        assert!(request(&"u".repeat(max + 1), "pw").validate().is_err());
        assert!(request("", "pw").validate().is_err());
        assert!(request("admin", "").validate().is_err());
    }
}
