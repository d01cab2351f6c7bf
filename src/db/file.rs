// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Directory-backed key-value store.
//!
//! Each key is a file named `<key>.json` under the data directory. Writes go
//! to a temporary file first so readers never observe a partial value.

use super::KvStore;
use crate::error::AppError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// File-per-key store rooted at a directory.
#[derive(Clone)]
pub struct FileKv {
    root: PathBuf,
    tmp_counter: Arc<AtomicU64>,
}

impl FileKv {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, AppError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            AppError::Storage(format!("Failed to create {}: {}", root.display(), e))
        })?;

        tracing::info!(path = %root.display(), "Opened file key-value store");

        Ok(Self {
            root,
            tmp_counter: Arc::new(AtomicU64::new(0)),
        })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
        if !valid {
            return Err(AppError::Storage(format!("Invalid key name: {:?}", key)));
        }
        Ok(self.root.join(format!("{key}.json")))
    }

    fn tmp_path(&self, key: &str) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        self.root
            .join(format!(".{key}.{}.{n}.tmp", std::process::id()))
    }

    async fn write_tmp(&self, key: &str, value: &str) -> Result<PathBuf, AppError> {
        let tmp = self.tmp_path(key);
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
        Ok(tmp)
    }
}

#[async_trait]
impl KvStore for FileKv {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        let tmp = self.write_tmp(key, value).await?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            AppError::Storage(format!("Failed to replace {}: {}", path.display(), e))
        })
    }

    async fn put_if_absent(&self, key: &str, value: &str) -> Result<bool, AppError> {
        let path = self.path_for(key)?;
        let tmp = self.write_tmp(key, value).await?;

        // hard_link fails if the target exists, so only one writer can win.
        let result = tokio::fs::hard_link(&tmp, &path).await;
        if let Err(e) = tokio::fs::remove_file(&tmp).await {
            tracing::warn!(error = %e, path = %tmp.display(), "Failed to remove temp file");
        }

        match result {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to create {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path()).await.unwrap();
        kv.put("portfolio_data", r#"{"data":{}}"#).await.unwrap();

        let reopened = FileKv::open(dir.path()).await.unwrap();
        assert_eq!(
            reopened.get("portfolio_data").await.unwrap().as_deref(),
            Some(r#"{"data":{}}"#)
        );
    }

    #[tokio::test]
    async fn put_if_absent_keeps_first_value() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path()).await.unwrap();

        assert!(kv.put_if_absent("secret_key", "aa").await.unwrap());
        assert!(!kv.put_if_absent("secret_key", "bb").await.unwrap());
        assert_eq!(kv.get("secret_key").await.unwrap().as_deref(), Some("aa"));

        // No temp files left behind
        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        assert_eq!(names, vec!["secret_key.json".to_string()]);
    }

    #[tokio::test]
    async fn missing_key_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path()).await.unwrap();

        assert!(kv.get("nothing").await.unwrap().is_none());

        kv.put("k", "v").await.unwrap();
        kv.put("k", "w").await.unwrap();
        assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("w"));
    }

    #[tokio::test]
    async fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path()).await.unwrap();

        assert!(matches!(
            kv.get("../etc/passwd").await,
            Err(AppError::Storage(_))
        ));
        assert!(matches!(kv.put("", "v").await, Err(AppError::Storage(_))));
    }
}
