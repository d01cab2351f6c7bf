// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin credential storage and checking.

use crate::db::{keys, KvStore};
use crate::error::AppError;
use crate::models::AdminCredentials;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Reads, bootstraps and updates the single admin credential record.
#[derive(Clone)]
pub struct CredentialStore {
    kv: Arc<dyn KvStore>,
    default: AdminCredentials,
}

impl CredentialStore {
    /// `default` is written when no record exists yet.
    pub fn new(kv: Arc<dyn KvStore>, default: AdminCredentials) -> Self {
        Self { kv, default }
    }

    /// Load the stored record, writing the default first if there is none.
    ///
    /// An unparsable record is treated as absent and overwritten.
    pub async fn ensure_initialized(&self) -> Result<AdminCredentials, AppError> {
        if let Some(raw) = self.kv.get(keys::ADMIN_CREDENTIALS).await? {
            match serde_json::from_str::<AdminCredentials>(&raw) {
                Ok(creds) => return Ok(creds),
                Err(e) => {
                    tracing::warn!(error = %e, "Stored admin credentials are malformed, resetting to default");
                    self.kv
                        .put(keys::ADMIN_CREDENTIALS, &self.encode(&self.default)?)
                        .await?;
                    return Ok(self.default.clone());
                }
            }
        }

        let written = self
            .kv
            .put_if_absent(keys::ADMIN_CREDENTIALS, &self.encode(&self.default)?)
            .await?;
        if written {
            tracing::info!(username = %self.default.username, "Initialized default admin credentials");
            return Ok(self.default.clone());
        }

        // Someone else initialized first.
        let raw = self
            .kv
            .get(keys::ADMIN_CREDENTIALS)
            .await?
            .ok_or_else(|| AppError::Storage("Admin credentials vanished".to_string()))?;
        serde_json::from_str(&raw)
            .map_err(|e| AppError::Storage(format!("Admin credentials unreadable: {}", e)))
    }

    /// Compare a login attempt against the stored record.
    ///
    /// Both fields are always compared so the result does not reveal which
    /// one was wrong.
    pub async fn check(&self, username: &str, password: &str) -> Result<bool, AppError> {
        let stored = self.ensure_initialized().await?;

        let user_ok = username.as_bytes().ct_eq(stored.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(stored.password.as_bytes());
        Ok(bool::from(user_ok & pass_ok))
    }

    /// Replace the stored record.
    pub async fn update(&self, username: &str, password: &str) -> Result<(), AppError> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::BadRequest(
                "Username and password required".to_string(),
            ));
        }

        let creds = AdminCredentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.kv
            .put(keys::ADMIN_CREDENTIALS, &self.encode(&creds)?)
            .await?;

        tracing::info!(username = %creds.username, "Admin credentials updated");
        Ok(())
    }

    fn encode(&self, creds: &AdminCredentials) -> Result<String, AppError> {
        serde_json::to_string(creds)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Credentials encode failed: {}", e)))
    }
}
