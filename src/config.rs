// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Values are read once at startup. A `.env` file is honored for local
//! development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Identity used when neither the request nor the stored document names one.
pub const DEFAULT_GITHUB_USERNAME: &str = "octocat";
/// Bootstrap admin username written on first login attempt.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// Bootstrap admin password written on first login attempt.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
/// Per-attempt timeout for contribution sources.
pub const DEFAULT_CONTRIBUTION_TIMEOUT_SECS: u64 = 5;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Directory backing the file key-value store
    pub data_dir: PathBuf,
    /// Fallback identity for `/api/contributions`
    pub default_github_username: String,
    /// Credentials written when no admin record exists yet
    pub default_admin_username: String,
    pub default_admin_password: String,
    /// Upper bound on a single contribution source attempt
    pub contribution_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let timeout_secs = match env::var("CONTRIBUTION_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("CONTRIBUTION_TIMEOUT_SECS", raw.clone()))?;
                if secs == 0 {
                    return Err(ConfigError::Invalid("CONTRIBUTION_TIMEOUT_SECS", raw));
                }
                secs
            }
            Err(_) => DEFAULT_CONTRIBUTION_TIMEOUT_SECS,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            default_github_username: env::var("DEFAULT_GITHUB_USERNAME")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|_| DEFAULT_GITHUB_USERNAME.to_string()),
            default_admin_username: non_empty_var("ADMIN_DEFAULT_USERNAME")?
                .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
            default_admin_password: non_empty_var("ADMIN_DEFAULT_PASSWORD")?
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            contribution_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Config for tests: nothing read from the environment.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            data_dir: PathBuf::from("./test-data"),
            default_github_username: DEFAULT_GITHUB_USERNAME.to_string(),
            default_admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            default_admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            contribution_timeout: Duration::from_secs(2),
        }
    }
}

/// Read an optional variable, rejecting a present-but-blank value.
fn non_empty_var(name: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(v) if v.trim().is_empty() => Err(ConfigError::Invalid(name, v)),
        Ok(v) => Ok(Some(v.trim().to_string())),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
