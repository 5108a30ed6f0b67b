use super::{
    Dated, date_key, days_between, mean, month_end, month_key, month_start, trailing_months,
};
use crate::models::{Flow, PeriodEntry, PeriodKind};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

pub const DEFAULT_CYCLE_LENGTH: i64 = 28;
pub const DEFAULT_PERIOD_LENGTH: i64 = 5;
/// How far after a period day later period days still count as the same run.
const PERIOD_WINDOW_DAYS: i64 = 10;
const SUMMARY_MONTHS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleStats {
    pub average_cycle_length: i64,
    pub average_period_length: i64,
    pub last_period: NaiveDate,
    pub next_period: NaiveDate,
    pub days_until_next: i64,
    pub phase: CyclePhase,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: String,
    pub has_period: bool,
    pub has_spotting: bool,
    pub has_symptoms: bool,
    pub flow: Option<Flow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodMonth {
    pub month: String,
    pub period_days: usize,
    pub symptom_days: usize,
}

/// Distinct dates of "period" entries, ascending. Same-day duplicates
/// collapse so they never produce a zero-day cycle.
fn period_days(entries: &[PeriodEntry]) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = entries
        .iter()
        .filter(|entry| entry.kind == PeriodKind::Period)
        .filter_map(|entry| entry.day())
        .collect();
    days.sort_unstable();
    days.dedup();
    days
}

/// Cycle averages and the next predicted period. Needs at least two
/// distinct period dates.
pub fn cycle_stats(entries: &[PeriodEntry], today: NaiveDate) -> Option<CycleStats> {
    let days = period_days(entries);
    if days.len() < 2 {
        return None;
    }

    let average_cycle_length = mean(
        days.windows(2)
            .map(|pair| (pair[1] - pair[0]).num_days() as f64),
    )
    .map_or(DEFAULT_CYCLE_LENGTH, |avg| avg.round() as i64);

    let period_lengths = days.iter().filter_map(|&start| {
        let end = start + Duration::days(PERIOD_WINDOW_DAYS);
        let run: Vec<&NaiveDate> = days.iter().filter(|day| **day >= start && **day <= end).collect();
        match run.as_slice() {
            [first, .., last] => Some(((**last - **first).num_days() + 1) as f64),
            _ => None,
        }
    });
    let average_period_length =
        mean(period_lengths).map_or(DEFAULT_PERIOD_LENGTH, |avg| avg.round() as i64);

    let last_period = *days.last()?;
    let next_period = last_period + Duration::days(average_cycle_length);
    let days_since_last = (today - last_period).num_days();

    Some(CycleStats {
        average_cycle_length,
        average_period_length,
        last_period,
        next_period,
        days_until_next: (next_period - today).num_days(),
        phase: phase_for(days_since_last, average_period_length),
    })
}

pub fn cycle_stats_today(entries: &[PeriodEntry]) -> Option<CycleStats> {
    cycle_stats(entries, super::today())
}

pub fn phase_for(days_since_last: i64, period_length: i64) -> CyclePhase {
    if days_since_last < period_length {
        CyclePhase::Menstrual
    } else if days_since_last < 14 {
        CyclePhase::Follicular
    } else if days_since_last < 17 {
        CyclePhase::Ovulation
    } else {
        CyclePhase::Luteal
    }
}

/// Days until the next period assuming a standard cycle after the latest
/// period entry; never negative. Without any period entry the whole
/// default cycle remains.
pub fn next_period_in(entries: &[PeriodEntry], today: NaiveDate) -> i64 {
    match period_days(entries).last() {
        Some(&last) => ((last + Duration::days(DEFAULT_CYCLE_LENGTH)) - today)
            .num_days()
            .max(0),
        None => DEFAULT_CYCLE_LENGTH,
    }
}

/// One cell per day of the month containing `month`.
pub fn calendar_month(entries: &[PeriodEntry], month: NaiveDate) -> Vec<CalendarDay> {
    days_between(month_start(month), month_end(month))
        .map(|day| {
            let on_day: Vec<&PeriodEntry> =
                entries.iter().filter(|entry| entry.day() == Some(day)).collect();
            let has = |kind: PeriodKind| on_day.iter().any(|entry| entry.kind == kind);
            CalendarDay {
                date: date_key(day),
                has_period: has(PeriodKind::Period),
                has_spotting: has(PeriodKind::Spotting),
                has_symptoms: has(PeriodKind::Symptoms),
                flow: on_day
                    .iter()
                    .find(|entry| entry.kind == PeriodKind::Period)
                    .and_then(|entry| entry.flow),
            }
        })
        .collect()
}

/// Period and symptom entry counts for the last six months, oldest first.
/// A period entry that lists symptoms counts toward both.
pub fn monthly_summary(entries: &[PeriodEntry], today: NaiveDate) -> Vec<PeriodMonth> {
    trailing_months(today, SUMMARY_MONTHS)
        .into_iter()
        .map(|start| {
            let end = month_end(start);
            let in_month: Vec<&PeriodEntry> = entries
                .iter()
                .filter(|entry| entry.day().is_some_and(|day| day >= start && day <= end))
                .collect();
            PeriodMonth {
                month: month_key(start),
                period_days: in_month
                    .iter()
                    .filter(|entry| entry.kind == PeriodKind::Period)
                    .count(),
                symptom_days: in_month
                    .iter()
                    .filter(|entry| match entry.kind {
                        PeriodKind::Symptoms => true,
                        PeriodKind::Period => entry
                            .symptoms
                            .as_ref()
                            .is_some_and(|symptoms| !symptoms.is_empty()),
                        PeriodKind::Spotting => false,
                    })
                    .count(),
            }
        })
        .collect()
}
