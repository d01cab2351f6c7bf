// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portfolio content document storage.

use crate::db::{keys, KvStore};
use crate::error::AppError;
use crate::models::portfolio::{fill_defaults, PortfolioDocument};
use crate::time_utils::format_utc_rfc3339;
use serde_json::Value;
use std::sync::Arc;

/// Loads and saves the `portfolio_data` document.
#[derive(Clone)]
pub struct PortfolioService {
    kv: Arc<dyn KvStore>,
}

impl PortfolioService {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// The stored document, or the empty default if nothing was saved yet.
    pub async fn load(&self) -> Result<PortfolioDocument, AppError> {
        let Some(raw) = self.kv.get(keys::PORTFOLIO_DATA).await? else {
            return Ok(PortfolioDocument::default());
        };

        serde_json::from_str(&raw).map_err(|e| {
            AppError::Storage(format!("Stored portfolio document is unreadable: {}", e))
        })
    }

    /// Validate and store a new `data` object, returning the save timestamp.
    pub async fn save(&self, data: Value) -> Result<String, AppError> {
        let Value::Object(mut data) = data else {
            return Err(AppError::BadRequest(
                "Invalid data format: data must be an object".to_string(),
            ));
        };
        fill_defaults(&mut data);

        let last_time = format_utc_rfc3339(chrono::Utc::now());
        let doc = PortfolioDocument {
            data,
            last_time: Some(last_time.clone()),
        };
        let raw = serde_json::to_string(&doc)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Document encode failed: {}", e)))?;
        self.kv.put(keys::PORTFOLIO_DATA, &raw).await?;

        tracing::info!(last_time = %last_time, "Portfolio document saved");
        Ok(last_time)
    }
}
