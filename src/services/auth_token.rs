// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed, time-limited admin session tokens.
//!
//! Token format: `base64(payload_json) "." base64(hmac_sha256(secret, base64(payload_json)))`
//! using the standard padded alphabet. There is no server-side session table;
//! a token is valid while its signature matches the current secret and it is
//! younger than [`TOKEN_TTL_MILLIS`]. Rotating the secret revokes every token.

use crate::db::{keys, KvStore};
use crate::error::AppError;
use crate::time_utils::now_millis;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime: 24 hours.
pub const TOKEN_TTL_MILLIS: i64 = 24 * 60 * 60 * 1000;
/// Secret size in bytes (stored hex-encoded).
pub const SECRET_LEN: usize = 32;
const SALT_LEN: usize = 8;

/// Signed token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub username: String,
    /// Issue time in Unix milliseconds
    #[serde(rename = "timestamp")]
    pub issued_at_millis: i64,
    pub salt: String,
}

/// Issues and verifies admin session tokens.
#[derive(Clone)]
pub struct AuthTokenService {
    kv: Arc<dyn KvStore>,
    rng: SystemRandom,
}

impl AuthTokenService {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            rng: SystemRandom::new(),
        }
    }

    /// Make sure a well-formed secret is persisted and return it.
    ///
    /// Idempotent. A missing secret is created with a conditional put, so two
    /// concurrent first calls converge on whichever write landed first. A
    /// malformed stored secret is replaced.
    pub async fn ensure_initialized(&self) -> Result<String, AppError> {
        match self.kv.get(keys::SECRET_KEY).await? {
            Some(secret) if is_valid_secret(&secret) => return Ok(secret),
            Some(_) => {
                tracing::warn!("Stored token secret is malformed, regenerating");
                let secret = self.generate_secret()?;
                self.kv.put(keys::SECRET_KEY, &secret).await?;
                return Ok(secret);
            }
            None => {}
        }

        let secret = self.generate_secret()?;
        if self.kv.put_if_absent(keys::SECRET_KEY, &secret).await? {
            tracing::info!("Generated new token secret");
            return Ok(secret);
        }

        // Lost the race; use the winner's secret.
        match self.kv.get(keys::SECRET_KEY).await? {
            Some(existing) if is_valid_secret(&existing) => Ok(existing),
            _ => Err(AppError::Storage(
                "Token secret vanished during initialization".to_string(),
            )),
        }
    }

    /// Issue a token for `username`, valid for 24 hours from now.
    pub async fn issue(&self, username: &str) -> Result<String, AppError> {
        self.issue_at(username, now_millis()).await
    }

    /// Issue a token stamped with an explicit issue time.
    pub async fn issue_at(&self, username: &str, now_millis: i64) -> Result<String, AppError> {
        let secret = self.ensure_initialized().await?;

        let payload = TokenPayload {
            username: username.to_string(),
            issued_at_millis: now_millis,
            salt: self.random_hex(SALT_LEN)?,
        };
        let payload_json = serde_json::to_string(&payload)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Token payload encode failed: {}", e)))?;
        let payload_b64 = BASE64.encode(payload_json.as_bytes());

        let mut mac = new_mac(&secret)?;
        mac.update(payload_b64.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!("{}.{}", payload_b64, BASE64.encode(signature)))
    }

    /// Check a presented token against the current secret and clock.
    pub async fn verify(&self, token: &str) -> bool {
        self.verify_at(token, now_millis()).await
    }

    /// Check a presented token as of `now_millis`. Never errors: any failure,
    /// including a storage failure, is reported as invalid.
    pub async fn verify_at(&self, token: &str, now_millis: i64) -> bool {
        let secret = match self.kv.get(keys::SECRET_KEY).await {
            Ok(Some(secret)) if is_valid_secret(&secret) => secret,
            Ok(_) => return false,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load token secret");
                return false;
            }
        };

        match decode_and_check(token, &secret) {
            Some(payload) => now_millis - payload.issued_at_millis < TOKEN_TTL_MILLIS,
            None => false,
        }
    }

    fn generate_secret(&self) -> Result<String, AppError> {
        self.random_hex(SECRET_LEN)
    }

    fn random_hex(&self, len: usize) -> Result<String, AppError> {
        let mut bytes = vec![0u8; len];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;
        Ok(hex::encode(bytes))
    }
}

/// The key is the UTF-8 bytes of the hex string, not the decoded bytes.
fn new_mac(secret: &str) -> Result<HmacSha256, AppError> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))
}

fn is_valid_secret(secret: &str) -> bool {
    secret.len() == SECRET_LEN * 2 && secret.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Split, authenticate and decode a token. `None` on any failure.
fn decode_and_check(token: &str, secret: &str) -> Option<TokenPayload> {
    let mut parts = token.split('.');
    let (payload_b64, signature_b64) = match (parts.next(), parts.next(), parts.next()) {
        (Some(p), Some(s), None) => (p, s),
        _ => return None,
    };

    let signature = BASE64.decode(signature_b64).ok()?;

    let mut mac = new_mac(secret).ok()?;
    mac.update(payload_b64.as_bytes());
    if mac.verify_slice(&signature).is_err() {
        tracing::debug!("Token signature mismatch");
        return None;
    }

    let payload_json = BASE64.decode(payload_b64).ok()?;
    serde_json::from_slice(&payload_json).ok()
}
