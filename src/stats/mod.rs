//! Pure aggregations over tracker snapshots.
//!
//! Everything here takes the collection plus an explicit `today` so results
//! are reproducible; records whose `date` does not parse are skipped by the
//! date-windowed views.

pub mod budget;
pub mod dashboard;
pub mod habit;
pub mod mood;
pub mod period;
pub mod sleep;
pub mod water;
pub mod workout;

use crate::models::{
    BudgetEntry, HabitEntry, MoodEntry, PeriodEntry, SleepEntry, WaterEntry, WorkoutEntry,
};
use chrono::{Datelike, Duration, Local, Months, NaiveDate};
use std::collections::HashSet;

/// Current local date, for callers that don't pin `today` themselves.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    month_start(month_start(date) + Duration::days(32)) - Duration::days(1)
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Every day from `start` through `end` inclusive.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// First days of the `count` months ending with the month of `today`,
/// oldest first.
pub fn trailing_months(today: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let current = month_start(today);
    (0..count)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .collect()
}

pub fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Consecutive days with an entry, walking back from `from` until the
/// first gap.
pub fn streak_from(days: &HashSet<NaiveDate>, from: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = from;
    while days.contains(&day) {
        streak += 1;
        day = day - Duration::days(1);
    }
    streak
}

/// `min(100, round(value / goal * 100))`, or 0 without a positive goal.
pub fn percent_of(value: f64, goal: f64) -> u32 {
    if goal <= 0.0 {
        return 0;
    }
    (value / goal * 100.0).round().clamp(0.0, 100.0) as u32
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Records that carry a calendar date.
pub trait Dated {
    fn date_str(&self) -> Option<&str>;

    fn day(&self) -> Option<NaiveDate> {
        self.date_str().and_then(parse_date)
    }
}

macro_rules! dated {
    ($($ty:ty),*) => {
        $(impl Dated for $ty {
            fn date_str(&self) -> Option<&str> {
                Some(&self.date)
            }
        })*
    };
}

dated!(SleepEntry, PeriodEntry, WorkoutEntry, BudgetEntry, MoodEntry, WaterEntry);

impl Dated for HabitEntry {
    fn date_str(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

pub(crate) fn days_with_entries<T: Dated>(records: &[T]) -> HashSet<NaiveDate> {
    records.iter().filter_map(|record| record.day()).collect()
}

/// Range selector shared by the tracker charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartView {
    Week,
    #[default]
    Month,
    Year,
}

/// Dashboard time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    #[default]
    Last7Days,
    Last30Days,
    ThisMonth,
    ThisYear,
}

impl TimeFilter {
    pub fn cutoff(self, today: NaiveDate) -> NaiveDate {
        match self {
            TimeFilter::Last7Days => today - Duration::days(7),
            TimeFilter::Last30Days => today - Duration::days(30),
            TimeFilter::ThisMonth => month_start(today),
            TimeFilter::ThisYear => today.with_ordinal(1).unwrap_or(today),
        }
    }

    /// Records dated strictly after the cutoff.
    pub fn apply<'a, T: Dated>(self, records: &'a [T], today: NaiveDate) -> Vec<&'a T> {
        let cutoff = self.cutoff(today);
        records
            .iter()
            .filter(|record| record.day().is_some_and(|day| day > cutoff))
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streak_stops_at_first_gap() {
        let today = ymd(2026, 1, 5);
        let days: HashSet<_> = [0, 1, 2, 4]
            .into_iter()
            .map(|offset| today - Duration::days(offset))
            .collect();
        assert_eq!(streak_from(&days, today), 3);
        assert_eq!(streak_from(&days, today - Duration::days(3)), 0);
    }

    #[test]
    fn week_start_is_monday() {
        assert_eq!(week_start(ymd(2026, 1, 8)), ymd(2026, 1, 5));
        assert_eq!(week_start(ymd(2026, 1, 5)), ymd(2026, 1, 5));
        assert_eq!(week_label(ymd(2026, 1, 5)), "2026-W02");
    }

    #[test]
    fn trailing_months_cross_year_boundary() {
        let months = trailing_months(ymd(2026, 2, 17), 3);
        assert_eq!(months, vec![ymd(2025, 12, 1), ymd(2026, 1, 1), ymd(2026, 2, 1)]);
        assert_eq!(month_key(months[0]), "2025-12");
        assert_eq!(days_between(ymd(2026, 2, 1), month_end(ymd(2026, 2, 1))).count(), 28);
    }

    #[test]
    fn percent_is_rounded_and_capped() {
        assert_eq!(percent_of(2.5, 8.0), 31);
        assert_eq!(percent_of(12.0, 8.0), 100);
        assert_eq!(percent_of(5.0, 0.0), 0);
    }

    #[test]
    fn time_filter_keeps_dates_after_cutoff() {
        let today = ymd(2026, 3, 15);
        let entries = vec![
            WaterEntry::new("1", "2026-03-08", 1.0),
            WaterEntry::new("2", "2026-03-09", 1.0),
            WaterEntry::new("3", "2026-03-01", 1.0),
            WaterEntry::new("4", "garbage", 1.0),
        ];
        let ids = |filter: TimeFilter| -> Vec<String> {
            filter
                .apply(&entries, today)
                .into_iter()
                .map(|entry| entry.id.clone())
                .collect()
        };
        assert_eq!(ids(TimeFilter::Last7Days), vec!["2"]);
        assert_eq!(ids(TimeFilter::ThisMonth), vec!["1", "2"]);
        assert_eq!(ids(TimeFilter::ThisYear), vec!["1", "2", "3"]);
    }
}
