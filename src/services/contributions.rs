// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contribution calendar acquisition with tiered fallback.
//!
//! Tiers, tried strictly in order until one yields at least one day:
//! 1. JSON APIs ([`ApiSource`]), in configured priority order
//! 2. The provider's calendar markup via a CORS proxy ([`MarkupSource`])
//! 3. Deterministic synthesis, which cannot fail
//!
//! Failures of the first two tiers are logged and swallowed; callers always
//! get a calendar back.

use crate::models::{ContributionDay, SourceTier};
use crate::services::sources::{parse_markup, unwrap_proxy_body, ApiSource, MarkupSource};
use crate::services::synthesis::synthesize;
use crate::time_utils::today_utc;
use anyhow::Context;
use chrono::NaiveDate;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Serialize;
use std::time::Duration;

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Why a single source attempt was abandoned.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("response decode failed: {0}")]
    Decode(String),

    #[error("no contribution days in response")]
    Empty,
}

/// A calendar and the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedContributions {
    pub days: Vec<ContributionDay>,
    pub source: SourceTier,
}

/// Resolves contribution calendars.
#[derive(Clone)]
pub struct ContributionService {
    http: reqwest::Client,
    sources: Vec<ApiSource>,
    markup: Option<MarkupSource>,
}

impl ContributionService {
    /// Service with the default public sources.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        Self::with_sources(timeout, ApiSource::defaults(), Some(MarkupSource::default()))
    }

    /// Service with explicit sources; `markup: None` skips the markup tier.
    pub fn with_sources(
        timeout: Duration,
        sources: Vec<ApiSource>,
        markup: Option<MarkupSource>,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed building contribution HTTP client")?;

        Ok(Self {
            http,
            sources,
            markup,
        })
    }

    /// Resolve a calendar ending today (UTC).
    pub async fn resolve(&self, identity: &str) -> ResolvedContributions {
        self.resolve_on(identity, today_utc()).await
    }

    /// Resolve a calendar; `today` only affects the synthesized tier's window.
    pub async fn resolve_on(&self, identity: &str, today: NaiveDate) -> ResolvedContributions {
        for source in &self.sources {
            match self.fetch_api(source, identity).await {
                Ok(days) => {
                    tracing::info!(
                        identity,
                        source = %source.name,
                        count = days.len(),
                        "Fetched contributions from API"
                    );
                    return ResolvedContributions {
                        days,
                        source: SourceTier::Api,
                    };
                }
                Err(e) => {
                    tracing::warn!(identity, source = %source.name, error = %e, "Contribution source failed");
                }
            }
        }

        if let Some(markup) = &self.markup {
            match self.fetch_markup(markup, identity).await {
                Ok(days) => {
                    tracing::info!(identity, count = days.len(), "Parsed contributions from markup");
                    return ResolvedContributions {
                        days,
                        source: SourceTier::Markup,
                    };
                }
                Err(e) => {
                    tracing::warn!(identity, error = %e, "Contribution markup fallback failed");
                }
            }
        }

        tracing::info!(identity, "All contribution sources failed, synthesizing calendar");
        ResolvedContributions {
            days: synthesize(identity, today),
            source: SourceTier::Generated,
        }
    }

    async fn fetch_api(
        &self,
        source: &ApiSource,
        identity: &str,
    ) -> Result<Vec<ContributionDay>, SourceError> {
        let body = self.get_text(&source.url_for(identity)).await?;
        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| SourceError::Decode(e.to_string()))?;

        non_empty(source.parse(&json))
    }

    async fn fetch_markup(
        &self,
        markup: &MarkupSource,
        identity: &str,
    ) -> Result<Vec<ContributionDay>, SourceError> {
        let body = self.get_text(&markup.url_for(identity)).await?;
        non_empty(parse_markup(&unwrap_proxy_body(&body)))
    }

    /// GET a URL and return the body of a 2xx response.
    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))
    }
}

fn non_empty(days: Vec<ContributionDay>) -> Result<Vec<ContributionDay>, SourceError> {
    if days.is_empty() {
        Err(SourceError::Empty)
    } else {
        Ok(days)
    }
}
