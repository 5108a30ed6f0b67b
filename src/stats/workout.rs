use super::{
    ChartView, Dated, date_key, days_between, days_with_entries, month_end, month_key,
    month_start, streak_from, trailing_months, week_label, week_start,
};
use crate::models::WorkoutEntry;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

const WEEK_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct WorkoutStats {
    pub total_workouts: usize,
    pub total_minutes: u64,
    pub total_calories: u64,
    pub weekly_workouts: usize,
    pub streak: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub kind: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyWorkoutPoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub workouts: usize,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutDay {
    pub date: String,
    pub weekday: String,
    pub workouts: usize,
    pub minutes: u64,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutPoint {
    pub date: String,
    pub duration: u64,
    pub calories: u64,
    pub count: usize,
}

pub fn workout_stats(entries: &[WorkoutEntry], today: NaiveDate) -> WorkoutStats {
    if entries.is_empty() {
        return WorkoutStats::default();
    }

    let start = week_start(today);
    let end = start + Duration::days(6);
    let weekly_workouts = entries
        .iter()
        .filter_map(|entry| entry.day())
        .filter(|day| *day >= start && *day <= end)
        .count();

    WorkoutStats {
        total_workouts: entries.len(),
        total_minutes: entries.iter().map(|entry| u64::from(entry.duration)).sum(),
        total_calories: entries
            .iter()
            .map(|entry| u64::from(entry.calories.unwrap_or(0)))
            .sum(),
        weekly_workouts,
        streak: workout_streak(entries, today),
    }
}

/// Consecutive workout days ending today, or ending yesterday when
/// nothing has been logged yet today.
pub fn workout_streak(entries: &[WorkoutEntry], today: NaiveDate) -> u32 {
    let days = days_with_entries(entries);
    match streak_from(&days, today) {
        0 => streak_from(&days, today - Duration::days(1)),
        streak => streak,
    }
}

/// Workout counts per type, most frequent first; ties keep first-seen order.
pub fn type_distribution(entries: &[WorkoutEntry]) -> Vec<TypeCount> {
    let mut counts: Vec<TypeCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        match index.get(entry.kind.as_str()) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(&entry.kind, counts.len());
                counts.push(TypeCount {
                    kind: entry.kind.clone(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Per-day totals across the current week or month, or per-month totals
/// for the last twelve months.
pub fn workout_chart(
    entries: &[WorkoutEntry],
    view: ChartView,
    today: NaiveDate,
) -> Vec<WorkoutPoint> {
    if entries.is_empty() {
        return Vec::new();
    }

    let point = |date: String, from: NaiveDate, to: NaiveDate| {
        let hits: Vec<&WorkoutEntry> = entries
            .iter()
            .filter(|entry| entry.day().is_some_and(|day| day >= from && day <= to))
            .collect();
        WorkoutPoint {
            date,
            duration: hits.iter().map(|entry| u64::from(entry.duration)).sum(),
            calories: hits
                .iter()
                .map(|entry| u64::from(entry.calories.unwrap_or(0)))
                .sum(),
            count: hits.len(),
        }
    };
    let daily = |start: NaiveDate, end: NaiveDate| -> Vec<WorkoutPoint> {
        days_between(start, end)
            .map(|day| point(date_key(day), day, day))
            .collect()
    };

    match view {
        ChartView::Week => {
            let start = week_start(today);
            daily(start, start + Duration::days(6))
        }
        ChartView::Month => daily(month_start(today), month_end(today)),
        ChartView::Year => trailing_months(today, 12)
            .into_iter()
            .map(|start| point(month_key(start), start, month_end(start)))
            .collect(),
    }
}

/// Totals for the last eight Monday-based weeks, oldest first.
pub fn weekly_totals(entries: &[WorkoutEntry], today: NaiveDate) -> Vec<WeeklyWorkoutPoint> {
    let by_day = totals_by_day(entries);
    let current_week_start = week_start(today);

    (0..WEEK_COUNT)
        .rev()
        .map(|offset| {
            let start = current_week_start - Duration::weeks(offset as i64);
            let end = start + Duration::days(6);
            let (workouts, minutes) = (0..7)
                .map(|day_offset| {
                    by_day
                        .get(&(start + Duration::days(day_offset)))
                        .copied()
                        .unwrap_or_default()
                })
                .fold((0, 0), |(count, sum), (c, m)| (count + c, sum + m));

            WeeklyWorkoutPoint {
                week: week_label(start),
                start_date: date_key(start),
                end_date: date_key(end),
                workouts,
                minutes,
            }
        })
        .collect()
}

/// Monday-to-Sunday breakdown of the current week.
pub fn this_week_by_day(entries: &[WorkoutEntry], today: NaiveDate) -> Vec<WorkoutDay> {
    let by_day = totals_by_day(entries);
    let start = week_start(today);

    (0..7)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let (workouts, minutes) = by_day.get(&date).copied().unwrap_or_default();
            WorkoutDay {
                date: date_key(date),
                weekday: date.format("%a").to_string(),
                workouts,
                minutes,
                is_today: date == today,
            }
        })
        .collect()
}

fn totals_by_day(entries: &[WorkoutEntry]) -> HashMap<NaiveDate, (usize, u64)> {
    let mut by_day: HashMap<NaiveDate, (usize, u64)> = HashMap::new();
    for entry in entries {
        if let Some(day) = entry.day() {
            let slot = by_day.entry(day).or_default();
            slot.0 += 1;
            slot.1 += u64::from(entry.duration);
        }
    }
    by_day
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Intensity;
    use crate::stats::ymd;

    fn workout(id: &str, date: NaiveDate, kind: &str, minutes: u32) -> WorkoutEntry {
        WorkoutEntry::new(id, date_key(date), kind, minutes, Intensity::Medium)
    }

    #[test]
    fn chart_buckets_by_view() {
        let today = ymd(2026, 1, 8);
        let mut swim = workout("1", ymd(2026, 1, 5), "swim", 40);
        swim.calories = Some(300);
        let entries = vec![
            swim,
            workout("2", ymd(2026, 1, 5), "run", 20),
            workout("3", ymd(2026, 1, 20), "run", 30),
            workout("4", ymd(2025, 3, 2), "yoga", 60),
        ];

        let week = workout_chart(&entries, ChartView::Week, today);
        assert_eq!(week.len(), 7);
        assert_eq!(
            week[0],
            WorkoutPoint {
                date: "2026-01-05".into(),
                duration: 60,
                calories: 300,
                count: 2,
            }
        );
        assert_eq!(week[1].count, 0);

        let month = workout_chart(&entries, ChartView::Month, today);
        assert_eq!(month.len(), 31);
        assert_eq!(month[19].duration, 30);

        let year = workout_chart(&entries, ChartView::Year, today);
        assert_eq!(year.len(), 12);
        assert_eq!(year[0].date, "2025-02");
        assert_eq!(year[1].duration, 60);
        assert_eq!(year[11].count, 3);
    }

    #[test]
    fn streak_counts_consecutive_days_back_from_today() {
        let today = ymd(2026, 1, 8);
        let entries: Vec<_> = [0, 1, 2, 3, 5]
            .into_iter()
            .map(|offset| workout(&offset.to_string(), today - Duration::days(offset), "run", 30))
            .collect();
        assert_eq!(workout_streak(&entries, today), 4);
    }

    #[test]
    fn streak_may_end_yesterday() {
        let today = ymd(2026, 1, 8);
        let entries = vec![
            workout("1", today - Duration::days(1), "run", 30),
            workout("2", today - Duration::days(2), "run", 30),
        ];
        assert_eq!(workout_streak(&entries, today), 2);
        assert_eq!(workout_streak(&entries, today + Duration::days(1)), 0);
    }

    #[test]
    fn stats_sum_totals_and_this_week() {
        let today = ymd(2026, 1, 8);
        let mut early = workout("1", ymd(2025, 12, 20), "swim", 45);
        early.calories = Some(300);
        let entries = vec![
            early,
            workout("2", ymd(2026, 1, 5), "run", 30),
            workout("3", ymd(2026, 1, 7), "yoga", 60),
        ];
        let stats = workout_stats(&entries, today);
        assert_eq!(stats.total_workouts, 3);
        assert_eq!(stats.total_minutes, 135);
        assert_eq!(stats.total_calories, 300);
        assert_eq!(stats.weekly_workouts, 2);
        assert_eq!(stats.streak, 1);
    }

    #[test]
    fn distribution_orders_by_count() {
        let day = ymd(2026, 1, 8);
        let entries = vec![
            workout("1", day, "yoga", 30),
            workout("2", day, "run", 30),
            workout("3", day, "run", 30),
        ];
        let distribution = type_distribution(&entries);
        assert_eq!(distribution[0], TypeCount { kind: "run".into(), count: 2 });
        assert_eq!(distribution[1].kind, "yoga");
    }

    #[test]
    fn weekly_series_covers_eight_weeks() {
        let today = ymd(2026, 1, 8);
        let entries = vec![workout("1", ymd(2026, 1, 6), "run", 40)];
        let weeks = weekly_totals(&entries, today);
        assert_eq!(weeks.len(), 8);
        let current = weeks.last().unwrap();
        assert_eq!(current.start_date, "2026-01-05");
        assert_eq!(current.workouts, 1);
        assert_eq!(current.minutes, 40);

        let days = this_week_by_day(&entries, today);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].weekday, "Mon");
        assert!(days[3].is_today);
        assert_eq!(days[1].minutes, 40);
    }
}
