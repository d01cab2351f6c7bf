// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin cookie authentication middleware.

use crate::error::AppError;
use crate::services::auth_token::TOKEN_TTL_MILLIS;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

/// Cookie carrying the admin session token.
pub const AUTH_COOKIE: &str = "auth_token";

/// Whether the request carries a currently valid admin token.
pub async fn is_authenticated(state: &AppState, jar: &CookieJar) -> bool {
    match jar.get(AUTH_COOKIE) {
        Some(cookie) => state.auth_tokens.verify(cookie.value()).await,
        None => false,
    }
}

/// Middleware that rejects requests without a valid admin cookie (401).
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !is_authenticated(&state, &jar).await {
        tracing::debug!(path = %request.uri().path(), "Rejected unauthenticated admin request");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Session cookie for a freshly issued token. Lifetime matches the token's.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .max_age(time::Duration::milliseconds(TOKEN_TTL_MILLIS))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build()
}

/// Cookie that clears the session on the client.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, "")).path("/").build()
}
