// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contribution calendar routes.

use crate::error::{AppError, Result};
use crate::models::{ContributionDay, ContributionWeek, SourceTier};
use crate::services::bucket_by_week;
use crate::time_utils::today_utc;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// GitHub's username length limit.
const MAX_IDENTITY_LEN: usize = 39;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/contributions", get(get_default_contributions))
        .route("/api/contributions/{identity}", get(get_contributions))
}

/// A resolved calendar, both flat and bucketed by week.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export))]
pub struct ContributionsResponse {
    pub identity: String,
    /// Which fallback tier produced the data
    pub source: SourceTier,
    pub days: Vec<ContributionDay>,
    pub weeks: Vec<ContributionWeek>,
}

/// Check an identity is a plausible GitHub login.
pub fn validate_identity(identity: &str) -> Result<()> {
    let valid = !identity.is_empty()
        && identity.len() <= MAX_IDENTITY_LEN
        && identity.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Identity must be 1-{} letters, digits or hyphens",
            MAX_IDENTITY_LEN
        )))
    }
}

async fn get_contributions(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
) -> Result<Json<ContributionsResponse>> {
    validate_identity(&identity)?;
    Ok(Json(calendar_for(&state, identity).await))
}

/// Calendar for the identity named in the portfolio document, or the
/// configured default if the document has none or cannot be read.
async fn get_default_contributions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ContributionsResponse>> {
    let stored = match state.portfolio.load().await {
        Ok(doc) => doc.github_username().map(str::to_string),
        Err(e) => {
            tracing::warn!(error = %e, "Portfolio document unreadable, using default identity");
            None
        }
    };
    let identity = stored.unwrap_or_else(|| state.config.default_github_username.clone());

    validate_identity(&identity)?;
    Ok(Json(calendar_for(&state, identity).await))
}

async fn calendar_for(state: &AppState, identity: String) -> ContributionsResponse {
    let today = today_utc();
    let resolved = state.contributions.resolve_on(&identity, today).await;
    let weeks = bucket_by_week(&resolved.days, today);

    ContributionsResponse {
        identity,
        source: resolved.source,
        days: resolved.days,
        weeks,
    }
}
