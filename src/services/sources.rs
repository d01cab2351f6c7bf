// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contribution data source descriptors and response parsers.
//!
//! Every parser is lenient: entries it cannot understand are skipped rather
//! than failing the whole response. An empty result is what tells the
//! pipeline to move on.

use crate::models::contribution::min_count_for_level;
use crate::models::ContributionDay;
use chrono::NaiveDate;
use serde_json::Value;

/// Placeholder substituted with the percent-encoded identity.
pub const IDENTITY_PLACEHOLDER: &str = "{identity}";
/// Placeholder substituted with the percent-encoded page URL in proxy templates.
pub const URL_PLACEHOLDER: &str = "{url}";

pub const JOGRUBER_V4_URL: &str = "https://github-contributions-api.jogruber.de/v4/{identity}";
pub const CALENDAR_API_URL: &str = "https://github-calendar-api.vercel.app/api/{identity}";
pub const GITHUB_CALENDAR_PAGE_URL: &str = "https://github.com/users/{identity}/contributions";
pub const ALLORIGINS_PROXY_URL: &str = "https://api.allorigins.win/get?url={url}";

/// Response shape understood by a JSON source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `{"contributions": [{"date": "YYYY-MM-DD", "count": N}, ...]}`
    DatedList,
    /// `{"contributions": {"YYYY-MM-DD": N, ...}}`
    DateMap,
}

/// A JSON contribution API.
#[derive(Debug, Clone)]
pub struct ApiSource {
    pub name: String,
    /// Endpoint with an `{identity}` placeholder
    pub url_template: String,
    pub format: SourceFormat,
}

impl ApiSource {
    pub fn new(name: impl Into<String>, url_template: impl Into<String>, format: SourceFormat) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            format,
        }
    }

    /// Default priority order.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("jogruber-v4", JOGRUBER_V4_URL, SourceFormat::DatedList),
            Self::new("calendar-api", CALENDAR_API_URL, SourceFormat::DateMap),
        ]
    }

    pub fn url_for(&self, identity: &str) -> String {
        fill_identity(&self.url_template, identity)
    }

    pub fn parse(&self, body: &Value) -> Vec<ContributionDay> {
        match self.format {
            SourceFormat::DatedList => parse_dated_list(body),
            SourceFormat::DateMap => parse_date_map(body),
        }
    }
}

/// The provider's human-facing calendar page, fetched through a CORS proxy.
#[derive(Debug, Clone)]
pub struct MarkupSource {
    /// Calendar page with an `{identity}` placeholder
    pub page_template: String,
    /// Proxy endpoint with a `{url}` placeholder
    pub proxy_template: String,
}

impl Default for MarkupSource {
    fn default() -> Self {
        Self {
            page_template: GITHUB_CALENDAR_PAGE_URL.to_string(),
            proxy_template: ALLORIGINS_PROXY_URL.to_string(),
        }
    }
}

impl MarkupSource {
    pub fn url_for(&self, identity: &str) -> String {
        let page = fill_identity(&self.page_template, identity);
        self.proxy_template
            .replace(URL_PLACEHOLDER, &urlencoding::encode(&page))
    }
}

fn fill_identity(template: &str, identity: &str) -> String {
    template.replace(IDENTITY_PLACEHOLDER, &urlencoding::encode(identity))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    raw.trim().parse().ok()
}

fn parse_count(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

/// Parse `{"contributions": [{"date", "count"}, ...]}`.
pub fn parse_dated_list(body: &Value) -> Vec<ContributionDay> {
    let Some(entries) = body.get("contributions").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let date = entry.get("date").and_then(Value::as_str).and_then(parse_date)?;
            let count = entry.get("count").and_then(parse_count)?;
            Some(ContributionDay::new(date, count))
        })
        .collect()
}

/// Parse `{"contributions": {"YYYY-MM-DD": count, ...}}`. Output is date-ordered.
pub fn parse_date_map(body: &Value) -> Vec<ContributionDay> {
    let Some(entries) = body.get("contributions").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut days: Vec<ContributionDay> = entries
        .iter()
        .filter_map(|(date, count)| Some(ContributionDay::new(parse_date(date)?, parse_count(count)?)))
        .collect();
    days.sort_by_key(|d| d.date);
    days
}

/// Extract the markup from a proxy response.
///
/// The proxy wraps the page as `{"contents": "..."}`; anything else is taken
/// to be the markup itself.
pub fn unwrap_proxy_body(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("contents").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Parse day cells out of calendar markup.
///
/// Any tag with a `data-date` attribute is a day. The count comes from
/// `data-count` when present, otherwise from `data-level` via the smallest
/// count in that level. Repeated dates are all kept, in document order.
pub fn parse_markup(html: &str) -> Vec<ContributionDay> {
    let mut days = Vec::new();

    for chunk in html.split('<').skip(1) {
        let tag = chunk.split('>').next().unwrap_or_default();
        let Some(date) = attr_value(tag, "data-date").and_then(parse_date) else {
            continue;
        };

        let count = attr_value(tag, "data-count")
            .and_then(|c| c.trim().parse::<u32>().ok())
            .or_else(|| {
                attr_value(tag, "data-level")
                    .and_then(|l| l.trim().parse::<u8>().ok())
                    .map(|l| min_count_for_level(l.min(4)))
            })
            .unwrap_or(0);

        days.push(ContributionDay::new(date, count));
    }

    days
}

/// Value of attribute `name` inside a tag body, quoted or bare.
fn attr_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let mut offset = 0;
    while let Some(pos) = tag[offset..].find(name) {
        let start = offset + pos;
        let end = start + name.len();
        offset = end;

        let preceded_by_space = tag[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_whitespace());
        if !preceded_by_space {
            continue;
        }

        let Some(value) = tag[end..].trim_start().strip_prefix('=') else {
            continue;
        };
        let value = value.trim_start();

        return match value.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &value[1..];
                inner.find(quote).map(|close| &inner[..close])
            }
            Some(_) => {
                let close = value
                    .find(|c: char| c.is_ascii_whitespace() || c == '/')
                    .unwrap_or(value.len());
                Some(&value[..close])
            }
            None => None,
        };
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn dated_list_parses_and_levels() {
        let body = json!({"contributions": [{"date": "2024-01-01", "count": 5}]});
        let days = parse_dated_list(&body);
        assert_eq!(days, vec![ContributionDay { date: day(2024, 1, 1), count: 5, level: 2 }]);
    }

    #[test]
    fn dated_list_skips_bad_entries() {
        let body = json!({"total": {}, "contributions": [
            {"date": "2024-01-01", "count": 1, "level": 4},
            {"date": "not-a-date", "count": 3},
            {"date": "2024-01-03", "count": -1},
            {"date": "2024-01-04", "count": 2.5},
            {"date": "2024-01-05"},
            "junk"
        ]});
        let days = parse_dated_list(&body);
        assert_eq!(days.len(), 1);
        // Source-provided level is ignored in favor of level_of(count)
        assert_eq!(days[0].level, 1);
    }

    #[test]
    fn dated_list_wrong_shape_is_empty() {
        assert!(parse_dated_list(&json!({"contributions": {"2024-01-01": 1}})).is_empty());
        assert!(parse_dated_list(&json!([])).is_empty());
        assert!(parse_dated_list(&Value::Null).is_empty());
    }

    #[test]
    fn date_map_parses_sorted() {
        let body = json!({"contributions": {"2024-01-02": 11, "2024-01-01": 0, "bad": 3}});
        let days = parse_date_map(&body);
        assert_eq!(
            days,
            vec![ContributionDay::new(day(2024, 1, 1), 0), ContributionDay::new(day(2024, 1, 2), 11)]
        );
        assert_eq!(days[1].level, 4);
    }

    #[test]
    fn urls_are_templated_and_encoded() {
        let src = ApiSource::new("x", "https://example.test/v4/{identity}", SourceFormat::DatedList);
        assert_eq!(src.url_for("octo cat"), "https://example.test/v4/octo%20cat");

        let markup = MarkupSource::default();
        assert_eq!(
            markup.url_for("octocat"),
            "https://api.allorigins.win/get?url=https%3A%2F%2Fgithub.com%2Fusers%2Foctocat%2Fcontributions"
        );
    }

    #[test]
    fn markup_prefers_count_then_level() {
        let html = r#"
            <svg><rect class="day" data-date="2024-01-01" data-count="7" data-level="1"></rect>
            <td tabindex="0" data-ix="1" data-date='2024-01-02' data-level="2" class="ContributionCalendar-day"></td>
            <td data-date="2024-01-03" class="ContributionCalendar-day"></td>
            <td data-date=2024-01-04 data-level=9></td>
            <td data-date="2024-01-01" data-count="1"></td>
            <td xdata-date="2024-01-05"></td>
            <td data-date="garbage" data-count="3"></td></svg>
        "#;
        let days = parse_markup(html);
        assert_eq!(
            days,
            vec![
                ContributionDay::new(day(2024, 1, 1), 7),
                ContributionDay::new(day(2024, 1, 2), 3),
                ContributionDay::new(day(2024, 1, 3), 0),
                ContributionDay::new(day(2024, 1, 4), 11),
                ContributionDay::new(day(2024, 1, 1), 1),
            ]
        );
        assert_eq!(days[1].level, 2);
    }

    #[test]
    fn markup_duplicates_resolve_to_last_in_calendar() {
        let html = r#"<td data-date="2025-06-17" data-count="4"></td>
            <td data-date="2025-06-17" data-count="9"></td>"#;
        let days = parse_markup(html);
        assert_eq!(days.len(), 2);

        let weeks = crate::services::bucket_by_week(&days, day(2025, 6, 18));
        let tuesday = &weeks.last().unwrap()[2];
        assert_eq!(tuesday.date, day(2025, 6, 17));
        assert_eq!(tuesday.count, 9);
    }

    #[test]
    fn proxy_body_unwraps_contents() {
        assert_eq!(unwrap_proxy_body(r#"{"contents":"<td>","status":{}}"#), "<td>");
        assert_eq!(unwrap_proxy_body("<html></html>"), "<html></html>");
    }
}
