// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public read-only API routes.

use crate::error::Result;
use crate::models::PortfolioDocument;
use crate::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const UNKNOWN: &str = "unknown";
/// IPv6 addresses longer than this are shortened for display.
const MAX_DISPLAY_IP_LEN: usize = 26;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/data", get(get_data))
        .route("/api/visitor-ip", get(visitor_ip))
}

// ─── Portfolio Content ───────────────────────────────────────

/// The stored portfolio document, or an empty default.
async fn get_data(State(state): State<Arc<AppState>>) -> Result<Json<PortfolioDocument>> {
    Ok(Json(state.portfolio.load().await?))
}

// ─── Visitor IP ──────────────────────────────────────────────

/// Where the current visitor appears to connect from.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct VisitorIpResponse {
    /// Address shortened for display
    pub ip: String,
    #[serde(rename = "fullIP")]
    pub full_ip: String,
    pub country: String,
    pub region: String,
    pub city: String,
    /// Known location parts joined with spaces
    pub location: String,
}

async fn visitor_ip(headers: HeaderMap) -> impl IntoResponse {
    let body = visitor_info(&headers);
    ([(header::CACHE_CONTROL, "no-cache")], Json(body))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Read client address and location from edge-proxy headers.
pub fn visitor_info(headers: &HeaderMap) -> VisitorIpResponse {
    let full_ip = header_value(headers, "cf-connecting-ip")
        .or_else(|| {
            header_value(headers, "x-forwarded-for")
                .and_then(|v| v.split(',').next())
                .map(str::trim)
        })
        .or_else(|| header_value(headers, "x-real-ip"))
        .unwrap_or(UNKNOWN)
        .to_string();

    let ip = if full_ip.contains(':') && full_ip.len() > 20 {
        let cut: String = full_ip.chars().take(MAX_DISPLAY_IP_LEN).collect();
        format!("{cut}...")
    } else {
        full_ip.clone()
    };

    let country = header_value(headers, "cf-ipcountry").unwrap_or(UNKNOWN).to_string();
    let region = header_value(headers, "cf-region").unwrap_or(UNKNOWN).to_string();
    let city = header_value(headers, "cf-ipcity").unwrap_or(UNKNOWN).to_string();

    let known: Vec<&str> = [country.as_str(), region.as_str(), city.as_str()]
        .into_iter()
        .filter(|part| *part != UNKNOWN)
        .collect();
    let location = if known.is_empty() {
        "unknown location".to_string()
    } else {
        known.join(" ")
    };

    VisitorIpResponse {
        ip,
        full_ip,
        country,
        region,
        city,
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn prefers_cloudflare_header() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("203.0.113.9"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("198.51.100.1"));
        headers.insert("cf-ipcountry", HeaderValue::from_static("NZ"));

        let info = visitor_info(&headers);
        assert_eq!(info.ip, "203.0.113.9");
        assert_eq!(info.country, "NZ");
        assert_eq!(info.location, "NZ");
    }

    #[test]
    fn forwarded_for_uses_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("198.51.100.1, 10.0.0.1"),
        );
        assert_eq!(visitor_info(&headers).full_ip, "198.51.100.1");
    }

    #[test]
    fn long_ipv6_is_shortened() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-real-ip",
            HeaderValue::from_static("2001:0db8:85a3:0000:0000:8a2e:0370:7334"),
        );
        let info = visitor_info(&headers);
        assert_eq!(info.ip, "2001:0db8:85a3:0000:0000:8...");
        assert_eq!(info.full_ip, "2001:0db8:85a3:0000:0000:8a2e:0370:7334");
    }

    #[test]
    fn missing_headers_are_unknown() {
        let info = visitor_info(&HeaderMap::new());
        assert_eq!(info.ip, UNKNOWN);
        assert_eq!(info.location, "unknown location");
    }

    #[test]
    fn serializes_full_ip_key() {
        let json = serde_json::to_value(visitor_info(&HeaderMap::new())).unwrap();
        assert!(json.get("fullIP").is_some());
    }
}
