// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Portfolio Edge: content and contribution-calendar backend for a personal
//! portfolio site.
//!
//! This crate serves the portfolio content document from a key-value store,
//! gates editing behind a signed cookie token, and resolves GitHub-style
//! contribution calendars with a fallback chain that always produces data.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::KvStore;
use models::AdminCredentials;
use services::{AuthTokenService, ContributionService, CredentialStore, PortfolioService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub kv: Arc<dyn KvStore>,
    pub auth_tokens: AuthTokenService,
    pub credentials: CredentialStore,
    pub portfolio: PortfolioService,
    pub contributions: ContributionService,
}

impl AppState {
    /// Wire every service to one store.
    pub fn new(config: Config, kv: Arc<dyn KvStore>, contributions: ContributionService) -> Self {
        let default_admin = AdminCredentials {
            username: config.default_admin_username.clone(),
            password: config.default_admin_password.clone(),
        };

        Self {
            auth_tokens: AuthTokenService::new(kv.clone()),
            credentials: CredentialStore::new(kv.clone(), default_admin),
            portfolio: PortfolioService::new(kv.clone()),
            contributions,
            kv,
            config,
        }
    }
}
