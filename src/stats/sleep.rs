use super::{ChartView, Dated, mean, month_end, month_start, round1, week_start};
use crate::models::SleepEntry;
use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde::Serialize;

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;
const NOON: f64 = 12.0 * 60.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepStats {
    pub avg_bedtime: String,
    pub avg_wake_time: String,
    pub avg_quality: f64,
    pub avg_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepPoint {
    pub date: String,
    pub duration: f64,
    pub quality: u8,
}

/// Averages over the whole collection, `None` when it is empty.
///
/// Bedtimes before noon count as after midnight so that 23:00 and 01:00
/// average to 00:00.
pub fn sleep_stats(entries: &[SleepEntry]) -> Option<SleepStats> {
    if entries.is_empty() {
        return None;
    }

    let avg_bedtime = mean(entries.iter().filter_map(|entry| {
        clock_minutes(&entry.bedtime).map(|minutes| {
            if minutes < NOON {
                minutes + MINUTES_PER_DAY
            } else {
                minutes
            }
        })
    }));
    let avg_wake_time = mean(entries.iter().filter_map(|entry| clock_minutes(&entry.wake_time)));

    Some(SleepStats {
        avg_bedtime: avg_bedtime.map(format_clock).unwrap_or_default(),
        avg_wake_time: avg_wake_time.map(format_clock).unwrap_or_default(),
        avg_quality: round1(
            mean(entries.iter().map(|entry| f64::from(entry.quality))).unwrap_or_default(),
        ),
        avg_duration: round1(mean(entries.iter().map(|entry| entry.duration)).unwrap_or_default()),
    })
}

/// Date-sorted chart points for the selected window. `Year` keeps
/// everything.
pub fn sleep_chart(entries: &[SleepEntry], view: ChartView, today: NaiveDate) -> Vec<SleepPoint> {
    let window = match view {
        ChartView::Week => {
            let start = week_start(today);
            Some((start, start + Duration::days(6)))
        }
        ChartView::Month => Some((month_start(today), month_end(today))),
        ChartView::Year => None,
    };

    let mut dated: Vec<(NaiveDate, &SleepEntry)> = entries
        .iter()
        .filter_map(|entry| entry.day().map(|day| (day, entry)))
        .filter(|(day, _)| window.is_none_or(|(start, end)| *day >= start && *day <= end))
        .collect();
    dated.sort_by_key(|(day, _)| *day);

    dated
        .into_iter()
        .map(|(_, entry)| SleepPoint {
            date: entry.date.clone(),
            duration: entry.duration,
            quality: entry.quality,
        })
        .collect()
}

fn clock_minutes(value: &str) -> Option<f64> {
    let time = NaiveTime::parse_from_str(value, "%H:%M").ok()?;
    Some(f64::from(time.hour() * 60 + time.minute()))
}

fn format_clock(minutes: f64) -> String {
    let minutes = (minutes.floor() as i64).rem_euclid(24 * 60);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
