use super::{Dated, date_key, days_with_entries, percent_of, streak_from};
use crate::models::WaterEntry;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Glasses per day.
pub const DEFAULT_DAILY_GOAL: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterStats {
    pub daily_goal: f64,
    pub today_amount: f64,
    pub weekly_average: f64,
    pub completion: u32,
    pub streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyWater {
    pub date: String,
    pub amount: f64,
}

pub fn total_on(entries: &[WaterEntry], day: NaiveDate) -> f64 {
    entries
        .iter()
        .filter(|entry| entry.day() == Some(day))
        .map(|entry| entry.amount)
        .sum()
}

pub fn water_stats(entries: &[WaterEntry], today: NaiveDate, daily_goal: f64) -> WaterStats {
    let today_amount = total_on(entries, today);
    let weekly_average = daily_totals(entries, today, 7)
        .iter()
        .map(|day| day.amount)
        .sum::<f64>()
        / 7.0;

    WaterStats {
        daily_goal,
        today_amount,
        weekly_average,
        completion: percent_of(today_amount, daily_goal),
        streak: streak_from(&days_with_entries(entries), today),
    }
}

pub fn water_stats_today(entries: &[WaterEntry], daily_goal: f64) -> WaterStats {
    water_stats(entries, super::today(), daily_goal)
}

/// Per-day totals for the `days` days ending today, oldest first.
pub fn daily_totals(entries: &[WaterEntry], today: NaiveDate, days: u32) -> Vec<DailyWater> {
    (0..i64::from(days))
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            DailyWater {
                date: date_key(day),
                amount: total_on(entries, day),
            }
        })
        .collect()
}

/// Today's intake bucketed by the hour of each entry's "HH:MM" timestamp.
/// Entries without a usable timestamp are left out.
pub fn hourly_breakdown(entries: &[WaterEntry], today: NaiveDate) -> [f64; 24] {
    let mut hours = [0.0; 24];
    for entry in entries.iter().filter(|entry| entry.day() == Some(today)) {
        let hour = entry
            .timestamp
            .as_deref()
            .and_then(|stamp| stamp.split(':').next())
            .and_then(|hour| hour.parse::<usize>().ok());
        if let Some(hour) = hour.filter(|hour| *hour < 24) {
            hours[hour] += entry.amount;
        }
    }
    hours
}
