// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory key-value store.

use super::KvStore;
use crate::error::AppError;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// DashMap-backed store. Contents are lost when the process exits.
#[derive(Default, Clone)]
pub struct MemoryKv {
    entries: std::sync::Arc<DashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, value: &str) -> Result<bool, AppError> {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value.to_string());
                Ok(true)
            }
        }
    }
}
