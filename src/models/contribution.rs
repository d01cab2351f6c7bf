// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contribution calendar model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Number of days in a calendar week.
pub const DAYS_PER_WEEK: usize = 7;

/// One day of contribution activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export))]
pub struct ContributionDay {
    /// Calendar date (serialized as `YYYY-MM-DD`)
    pub date: NaiveDate,
    pub count: u32,
    /// Visual intensity bucket, always `level_of(count)`
    pub level: u8,
}

impl ContributionDay {
    /// Build a day whose level is derived from `count`.
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self {
            date,
            count,
            level: level_of(count),
        }
    }

    /// Zero-count placeholder for a date with no data.
    pub fn empty(date: NaiveDate) -> Self {
        Self::new(date, 0)
    }
}

/// A Sunday-aligned run of exactly seven days.
pub type ContributionWeek = [ContributionDay; DAYS_PER_WEEK];

/// Which fallback tier produced a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum SourceTier {
    /// A JSON contribution API
    Api,
    /// The provider's calendar markup, fetched through a proxy
    Markup,
    /// Deterministic synthesis
    Generated,
}

impl fmt::Display for SourceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceTier::Api => "api",
            SourceTier::Markup => "markup",
            SourceTier::Generated => "generated",
        })
    }
}

/// Bucket a daily count into the 0-4 intensity scale.
///
/// 0 → 0, 1-2 → 1, 3-5 → 2, 6-10 → 3, above 10 → 4.
pub fn level_of(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        6..=10 => 3,
        _ => 4,
    }
}

/// Smallest count that falls in `level`, used when a source only reports levels.
pub fn min_count_for_level(level: u8) -> u32 {
    match level {
        0 => 0,
        1 => 1,
        2 => 3,
        3 => 6,
        _ => 11,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_boundaries() {
        assert_eq!(level_of(0), 0);
        assert_eq!(level_of(1), 1);
        assert_eq!(level_of(2), 1);
        assert_eq!(level_of(3), 2);
        assert_eq!(level_of(5), 2);
        assert_eq!(level_of(6), 3);
        assert_eq!(level_of(10), 3);
        assert_eq!(level_of(11), 4);
        assert_eq!(level_of(u32::MAX), 4);
    }

    #[test]
    fn level_is_monotonic() {
        let mut prev = 0;
        for count in 0..200 {
            let level = level_of(count);
            assert!(level >= prev, "level dropped at count {count}");
            prev = level;
        }
    }

    #[test]
    fn min_count_round_trips_through_level() {
        for level in 0..=4u8 {
            assert_eq!(level_of(min_count_for_level(level)), level);
        }
    }

    #[test]
    fn day_serializes_with_iso_date() {
        let day = ContributionDay::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 5);
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"date": "2024-01-01", "count": 5, "level": 2})
        );
    }

    #[test]
    fn source_tier_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SourceTier::Generated).unwrap(),
            "\"generated\""
        );
        assert_eq!(SourceTier::Markup.to_string(), "markup");
    }
}
