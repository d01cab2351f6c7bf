// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use portfolio_edge::config::Config;
use portfolio_edge::db::MemoryKv;
use portfolio_edge::routes::create_router;
use portfolio_edge::services::ContributionService;
use portfolio_edge::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// An address nothing listens on; connections are refused immediately.
#[allow(dead_code)]
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Create a test app backed by an in-memory store.
/// The contribution pipeline has no remote sources, so it always synthesizes.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let contributions =
        ContributionService::with_sources(Duration::from_secs(2), vec![], None).unwrap();
    create_test_app_with(contributions)
}

/// Create a test app with an explicit contribution pipeline.
#[allow(dead_code)]
pub fn create_test_app_with(contributions: ContributionService) -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    let state = Arc::new(AppState::new(
        config,
        Arc::new(MemoryKv::new()),
        contributions,
    ));

    (create_router(state.clone()), state)
}

/// Every Set-Cookie header on a response.
#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// POST the login form.
#[allow(dead_code)]
pub async fn post_login(app: &Router, username: &str, password: &str) -> Response {
    let body = format!(
        "username={}&password={}",
        urlencoding::encode(username),
        urlencoding::encode(password)
    );

    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Log in with the default credentials and return a `Cookie` header value.
#[allow(dead_code)]
pub async fn login_cookie(app: &Router) -> String {
    let response = post_login(app, "admin", "admin123").await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let cookie = set_cookie_headers(&response)
        .into_iter()
        .find(|c| c.starts_with("auth_token="))
        .expect("login should set auth_token");

    cookie.split(';').next().unwrap().to_string()
}

/// Read a response body as UTF-8.
#[allow(dead_code)]
pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// Serve `body` with `status` for every path on a local port.
#[allow(dead_code)]
pub async fn spawn_fixture_server(status: StatusCode, body: &str) -> SocketAddr {
    let body = body.to_string();
    let app = Router::new().fallback(move || {
        let body = body.clone();
        async move { (status, body) }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}
