// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin login, logout and the management page.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::middleware::auth::{is_authenticated, removal_cookie, session_cookie};
use crate::routes::pages;
use crate::AppState;

/// Generic message: never reveal which field was wrong.
const LOGIN_FAILED: &str = "Invalid username or password";
const LOGIN_ERROR: &str = "Login failed, please try again";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/manage", get(manage))
        .route("/login", post(login))
        .route("/logout", get(logout))
}

/// Management page when authenticated, otherwise the login form.
async fn manage(State(state): State<Arc<AppState>>, jar: CookieJar) -> Html<String> {
    if is_authenticated(&state, &jar).await {
        Html(pages::management_page())
    } else {
        Html(pages::login_page(None))
    }
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Check credentials; on success set the session cookie and go to `/manage`.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let ok = match state.credentials.check(&form.username, &form.password).await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::error!(error = %e, "Credential check failed");
            return Html(pages::login_page(Some(LOGIN_ERROR))).into_response();
        }
    };

    if !ok {
        tracing::warn!("Failed admin login attempt");
        return Html(pages::login_page(Some(LOGIN_FAILED))).into_response();
    }

    match state.auth_tokens.issue(&form.username).await {
        Ok(token) => {
            tracing::info!(username = %form.username, "Admin logged in");
            (jar.add(session_cookie(token)), found("/manage")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Token issuance failed");
            Html(pages::login_page(Some(LOGIN_ERROR))).into_response()
        }
    }
}

/// Clear the cookie. The token itself stays valid until it expires.
async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.remove(removal_cookie()), found("/manage"))
}

/// Plain 302 redirect.
fn found(location: &'static str) -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, location)])
}
