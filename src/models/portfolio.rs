// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portfolio content document.
//!
//! The document is mostly free-form JSON edited through the management page.
//! Only the top-level field set is fixed: every field listed in
//! [`REQUIRED_FIELDS`] is present after [`fill_defaults`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields every stored `data` object carries.
pub const REQUIRED_FIELDS: &[&str] = &[
    "github",
    "web_info",
    "quoteData",
    "timelineData",
    "projectsData",
    "sitesData",
    "skillsData",
    "socialData",
    "tagsData",
    "imagesData",
    "profileData",
    "locationData",
    "ice",
    "thema",
];

/// Stored under `portfolio_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioDocument {
    pub data: Map<String, Value>,
    /// When the document was last saved (RFC3339), `None` if never saved
    #[serde(default)]
    pub last_time: Option<String>,
}

impl Default for PortfolioDocument {
    fn default() -> Self {
        let mut data = Map::new();
        fill_defaults(&mut data);
        Self {
            data,
            last_time: None,
        }
    }
}

impl PortfolioDocument {
    /// The `github` field, if set to a non-blank string.
    pub fn github_username(&self) -> Option<&str> {
        self.data
            .get("github")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Default value for a required field.
fn default_for(field: &str) -> Value {
    match field {
        "web_info" | "profileData" | "locationData" => Value::Object(Map::new()),
        "ice" | "thema" => Value::Bool(false),
        "quoteData" => Value::String(String::new()),
        f if f.ends_with("Data") => Value::Array(Vec::new()),
        _ => Value::String(String::new()),
    }
}

/// Insert defaults for any missing required field. Existing values are kept.
pub fn fill_defaults(data: &mut Map<String, Value>) {
    for field in REQUIRED_FIELDS {
        if !data.contains_key(*field) {
            data.insert((*field).to_string(), default_for(field));
        }
    }
}
