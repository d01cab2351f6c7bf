// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portfolio Edge API Server
//!
//! Serves the portfolio content document, the admin editing flow and
//! contribution calendars.

use anyhow::Context;
use portfolio_edge::{config::Config, db::FileKv, services::ContributionService, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(port = config.port, "Starting Portfolio Edge API");

    let kv = FileKv::open(&config.data_dir)
        .await
        .context("Failed to open key-value store")?;

    let contributions = ContributionService::new(config.contribution_timeout)?;
    tracing::info!(
        timeout_secs = config.contribution_timeout.as_secs(),
        "Contribution pipeline initialized"
    );

    let state = Arc::new(AppState::new(config.clone(), Arc::new(kv), contributions));

    // Bootstrap the token secret and admin record
    state.auth_tokens.ensure_initialized().await?;
    state.credentials.ensure_initialized().await?;

    // Build router
    let app = portfolio_edge::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_edge=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
