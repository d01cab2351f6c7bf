// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key-value storage layer.
//!
//! The store is an opaque async string map. Adapters:
//! - [`MemoryKv`]: in-process, used by tests and ephemeral deployments
//! - [`FileKv`]: one file per key under a data directory

pub mod file;
pub mod memory;

pub use file::FileKv;
pub use memory::MemoryKv;

use crate::error::AppError;
use async_trait::async_trait;

/// Key names as constants.
pub mod keys {
    /// Hex-encoded HMAC secret for admin tokens
    pub const SECRET_KEY: &str = "secret_key";
    /// Admin username/password record
    pub const ADMIN_CREDENTIALS: &str = "admin_credentials";
    /// The portfolio content document
    pub const PORTFOLIO_DATA: &str = "portfolio_data";
}

/// Async key-value map used for all persisted state.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Store `value` only if `key` is currently absent.
    ///
    /// Returns `true` if this call wrote the value.
    async fn put_if_absent(&self, key: &str, value: &str) -> Result<bool, AppError>;
}
