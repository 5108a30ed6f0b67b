use super::{
    ChartView, Dated, date_key, days_between, mean, month_end, month_key, month_start, round1,
    trailing_months,
};
use crate::models::MoodEntry;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

const TOP_ACTIVITIES: usize = 5;
const MIN_CORRELATION_SAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct MoodStats {
    pub average_mood: f64,
    pub today_mood: Option<u8>,
    /// Last 7 days' average minus the 7 days before, one decimal.
    pub week_trend: f64,
    pub top_activities: Vec<ActivityCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityCount {
    pub activity: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodPoint {
    pub date: String,
    /// `None` when the bucket has no entries.
    pub mood: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityMood {
    pub activity: String,
    pub average_mood: f64,
    pub count: usize,
}

pub fn mood_stats(entries: &[MoodEntry], today: NaiveDate) -> MoodStats {
    if entries.is_empty() {
        return MoodStats::default();
    }

    let average_mood = round1(mean(entries.iter().map(|entry| f64::from(entry.mood))).unwrap_or_default());
    let today_mood = entries
        .iter()
        .find(|entry| entry.day() == Some(today))
        .map(|entry| entry.mood);

    // Ages count back from today, so future-dated entries sit in neither
    // window.
    let in_window = |from: i64, to: i64| {
        mean(
            entries
                .iter()
                .filter(|entry| {
                    entry.day().is_some_and(|day| {
                        let age = (today - day).num_days();
                        age >= from && age <= to
                    })
                })
                .map(|entry| f64::from(entry.mood)),
        )
    };
    let week_trend = match (in_window(0, 7), in_window(8, 14)) {
        (Some(this_week), Some(last_week)) => round1(this_week - last_week),
        _ => 0.0,
    };

    let mut top_activities: Vec<ActivityCount> = tally_activities(entries)
        .into_iter()
        .map(|(activity, count, _)| ActivityCount { activity, count })
        .collect();
    top_activities.sort_by(|a, b| b.count.cmp(&a.count));
    top_activities.truncate(TOP_ACTIVITIES);

    MoodStats {
        average_mood,
        today_mood,
        week_trend,
        top_activities,
    }
}

/// Average mood per bucket: each of the last seven days, each day of the
/// current month, or each of the last twelve months.
pub fn mood_chart(entries: &[MoodEntry], view: ChartView, today: NaiveDate) -> Vec<MoodPoint> {
    if entries.is_empty() {
        return Vec::new();
    }

    let average = |from: NaiveDate, to: NaiveDate| {
        mean(
            entries
                .iter()
                .filter(|entry| entry.day().is_some_and(|day| day >= from && day <= to))
                .map(|entry| f64::from(entry.mood)),
        )
        .map(round1)
    };
    let daily = |day: NaiveDate| MoodPoint {
        date: date_key(day),
        mood: average(day, day),
    };

    match view {
        ChartView::Week => days_between(today - Duration::days(6), today).map(daily).collect(),
        ChartView::Month => days_between(month_start(today), month_end(today))
            .map(daily)
            .collect(),
        ChartView::Year => trailing_months(today, 12)
            .into_iter()
            .map(|start| MoodPoint {
                date: month_key(start),
                mood: average(start, month_end(start)),
            })
            .collect(),
    }
}

/// Entry counts for each mood level 1 through 10. Out-of-range moods are
/// not counted.
pub fn mood_distribution(entries: &[MoodEntry]) -> [usize; 10] {
    let mut buckets = [0usize; 10];
    for entry in entries {
        if (1..=10).contains(&entry.mood) {
            buckets[usize::from(entry.mood) - 1] += 1;
        }
    }
    buckets
}

/// Activities seen at least three times, by average mood, best first.
pub fn activity_correlation(entries: &[MoodEntry]) -> Vec<ActivityMood> {
    let mut rows: Vec<ActivityMood> = tally_activities(entries)
        .into_iter()
        .filter(|(_, count, _)| *count >= MIN_CORRELATION_SAMPLES)
        .map(|(activity, count, total)| ActivityMood {
            activity,
            average_mood: round1(total / count as f64),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.average_mood.total_cmp(&a.average_mood));
    rows.truncate(TOP_ACTIVITIES);
    rows
}

/// (activity, occurrences, summed mood) in first-seen order.
fn tally_activities(entries: &[MoodEntry]) -> Vec<(String, usize, f64)> {
    let mut rows: Vec<(String, usize, f64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        for activity in entry.activities.iter().flatten() {
            let slot = *index.entry(activity.as_str()).or_insert_with(|| {
                rows.push((activity.clone(), 0, 0.0));
                rows.len() - 1
            });
            rows[slot].1 += 1;
            rows[slot].2 += f64::from(entry.mood);
        }
    }
    rows
}
