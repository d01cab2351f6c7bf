// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Week bucketing for the contribution calendar.

use crate::models::contribution::DAYS_PER_WEEK;
use crate::models::{ContributionDay, ContributionWeek};
use crate::time_utils::one_year_before;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;

/// First day (Sunday) of the calendar window ending at `reference`.
pub fn window_start(reference: NaiveDate) -> NaiveDate {
    let from = one_year_before(reference);
    from - Duration::days(i64::from(from.weekday().num_days_from_sunday()))
}

/// Last day (Saturday) of the calendar window ending at `reference`.
pub fn window_end(reference: NaiveDate) -> NaiveDate {
    reference + Duration::days(6 - i64::from(reference.weekday().num_days_from_sunday()))
}

/// Lay `days` out as Sunday-first weeks covering the window around `reference`.
///
/// Dates with no record get a zero placeholder; records outside the window
/// are ignored. If a date appears more than once the last record wins.
pub fn bucket_by_week(days: &[ContributionDay], reference: NaiveDate) -> Vec<ContributionWeek> {
    let by_date: HashMap<NaiveDate, &ContributionDay> =
        days.iter().map(|day| (day.date, day)).collect();

    let start = window_start(reference);
    let end = window_end(reference);

    let mut weeks = Vec::new();
    let mut current = Vec::with_capacity(DAYS_PER_WEEK);
    let mut date = start;

    while date <= end || !current.is_empty() {
        // Past the window end only to pad the final week
        let day = if date <= end {
            by_date
                .get(&date)
                .map(|d| (*d).clone())
                .unwrap_or_else(|| ContributionDay::empty(date))
        } else {
            ContributionDay::empty(date)
        };
        current.push(day);

        if current.len() == DAYS_PER_WEEK {
            let week: ContributionWeek = std::mem::take(&mut current)
                .try_into()
                .unwrap_or_else(|_| unreachable!("week holds exactly {DAYS_PER_WEEK} days"));
            weeks.push(week);
        }

        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    weeks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_is_sunday_to_saturday() {
        // 2025-06-18 is a Wednesday; 2024-06-18 is a Tuesday
        let reference = day(2025, 6, 18);
        assert_eq!(window_start(reference), day(2024, 6, 16));
        assert_eq!(window_end(reference), day(2025, 6, 21));
        assert_eq!(window_start(reference).weekday(), Weekday::Sun);
        assert_eq!(window_end(reference).weekday(), Weekday::Sat);
    }

    #[test]
    fn window_bounds_already_aligned() {
        // 2025-06-21 is a Saturday, 2024-06-21 a Friday
        let reference = day(2025, 6, 21);
        assert_eq!(window_end(reference), reference);
        assert_eq!(window_start(reference), day(2024, 6, 16));
    }

    #[test]
    fn every_week_has_seven_days_and_dates_are_unique() {
        let reference = day(2025, 6, 18);
        let weeks = bucket_by_week(&[], reference);

        let start = window_start(reference);
        let end = window_end(reference);
        let expected_days = (end - start).num_days() + 1;

        let all: Vec<_> = weeks.iter().flat_map(|w| w.iter()).collect();
        assert_eq!(all.len() as i64, expected_days);
        assert_eq!(all.len(), weeks.len() * 7);

        for (i, d) in all.iter().enumerate() {
            assert_eq!(d.date, start + Duration::days(i as i64));
        }
        for week in &weeks {
            assert_eq!(week[0].date.weekday(), Weekday::Sun);
            assert_eq!(week[6].date.weekday(), Weekday::Sat);
        }
    }

    #[test]
    fn records_are_placed_and_gaps_filled() {
        let reference = day(2025, 6, 18);
        let days = vec![
            ContributionDay::new(day(2025, 6, 17), 4),
            ContributionDay::new(day(2025, 6, 17), 9), // duplicate, replaces the 4
            ContributionDay::new(day(2020, 1, 1), 50), // outside window
        ];
        let weeks = bucket_by_week(&days, reference);

        let last = weeks.last().unwrap();
        // Tuesday of the final week
        assert_eq!(last[2].date, day(2025, 6, 17));
        assert_eq!(last[2].count, 9);
        assert_eq!(last[2].level, 3);
        assert_eq!(last[3].count, 0);
        assert_eq!(last[3].level, 0);

        let total: u32 = weeks.iter().flat_map(|w| w.iter()).map(|d| d.count).sum();
        assert_eq!(total, 9);
    }

    #[test]
    fn later_duplicate_replaces_earlier() {
        let reference = day(2025, 6, 18);
        let days = vec![
            ContributionDay::new(day(2025, 6, 16), 12),
            ContributionDay::new(day(2025, 6, 16), 0),
        ];
        let weeks = bucket_by_week(&days, reference);

        let monday = &weeks.last().unwrap()[1];
        assert_eq!(monday.date, day(2025, 6, 16));
        assert_eq!(monday.count, 0);
        assert_eq!(monday.level, 0);
    }

    #[test]
    fn is_pure() {
        let reference = day(2024, 2, 29);
        let days = vec![ContributionDay::new(day(2024, 1, 1), 3)];
        assert_eq!(bucket_by_week(&days, reference), bucket_by_week(&days, reference));
    }
}
