//! Cross-tracker overview built from one snapshot of every store.

use super::budget::budget_stats;
use super::habit::completion_stats;
use super::period::next_period_in;
use super::sleep::SleepPoint;
use super::water::{DEFAULT_DAILY_GOAL, WaterStats, water_stats};
use super::workout::this_week_by_day;
use super::{Dated, TimeFilter, mean, week_start};
use crate::models::{MoodEntry, SleepEntry};
use crate::store::Tracker;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

const NEUTRAL_SCORE: f64 = 50.0;
const IDEAL_SLEEP_HOURS: f64 = 8.0;
const TARGET_WEEKLY_WORKOUTS: f64 = 5.0;
const SLEEP_POINTS: usize = 7;

/// 0-100 scores per area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellnessScores {
    pub sleep: f64,
    pub fitness: f64,
    pub habits: f64,
    pub mood: f64,
    pub hydration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub recent_sleep: Vec<SleepPoint>,
    pub next_period_in: i64,
    pub workouts_this_week: usize,
    pub habit_progress: u32,
    pub monthly_expenses: f64,
    pub today_mood: Option<u8>,
    pub water: WaterStats,
    pub wellness: WellnessScores,
}

pub fn build_summary(tracker: &Tracker, filter: TimeFilter, today: NaiveDate) -> DashboardSummary {
    let sleep = tracker.sleep.get_all();
    let workouts = tracker.workout.get_all();
    let habits = tracker.habits.get_all();
    let moods = tracker.mood.get_all();

    let recent_sleep = recent_sleep(&sleep, filter, today);
    let workouts_this_week = this_week_by_day(&workouts, today)
        .iter()
        .map(|day| day.workouts)
        .sum();
    let habit_progress = completion_stats(&habits, today).today;
    let water = water_stats(&tracker.water.get_all(), today, DEFAULT_DAILY_GOAL);
    let budget = budget_stats(
        &tracker.budget.entries.get_all(),
        &tracker.budget.categories.get_all(),
        today,
    );

    let wellness = WellnessScores {
        sleep: sleep_score(&recent_sleep),
        fitness: (workouts_this_week as f64 / TARGET_WEEKLY_WORKOUTS * 100.0).min(100.0),
        habits: f64::from(habit_progress),
        mood: mood_score(&moods, today),
        hydration: f64::from(water.completion),
    };

    DashboardSummary {
        recent_sleep,
        next_period_in: next_period_in(&tracker.period.get_all(), today),
        workouts_this_week,
        habit_progress,
        monthly_expenses: budget.total_expenses,
        today_mood: moods
            .iter()
            .find(|entry| entry.day() == Some(today))
            .map(|entry| entry.mood),
        water,
        wellness,
    }
}

pub fn build_summary_today(tracker: &Tracker, filter: TimeFilter) -> DashboardSummary {
    build_summary(tracker, filter, super::today())
}

/// The last seven nights inside the window, oldest first.
fn recent_sleep(entries: &[SleepEntry], filter: TimeFilter, today: NaiveDate) -> Vec<SleepPoint> {
    let mut dated: Vec<&SleepEntry> = filter.apply(entries, today);
    dated.sort_by_key(|entry| entry.day());
    let skip = dated.len().saturating_sub(SLEEP_POINTS);
    dated
        .into_iter()
        .skip(skip)
        .map(|entry| SleepPoint {
            date: entry.date.clone(),
            duration: entry.duration,
            quality: entry.quality,
        })
        .collect()
}

/// Full marks at eight hours, minus 15 per hour of difference.
pub fn sleep_score(points: &[SleepPoint]) -> f64 {
    match mean(points.iter().map(|point| point.duration)) {
        Some(avg) => 100.0 - ((avg - IDEAL_SLEEP_HOURS).abs() * 15.0).min(100.0),
        None => NEUTRAL_SCORE,
    }
}

/// Mean of this week's daily mood averages, scaled to 0-100.
pub fn mood_score(entries: &[MoodEntry], today: NaiveDate) -> f64 {
    let start = week_start(today);
    let daily = (0..7).filter_map(|offset| {
        let day = start + Duration::days(offset);
        mean(
            entries
                .iter()
                .filter(|entry| entry.day() == Some(day))
                .map(|entry| f64::from(entry.mood)),
        )
    });
    mean(daily).map_or(NEUTRAL_SCORE, |avg| avg * 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HabitEntry, Intensity, PeriodEntry, PeriodKind, WaterEntry, WorkoutEntry};
    use crate::stats::{date_key, today, ymd};

    #[test]
    fn empty_tracker_gives_neutral_scores() {
        let tracker = Tracker::in_memory();
        let summary = build_summary(&tracker, TimeFilter::Last7Days, ymd(2026, 8, 5));
        assert_eq!(summary.wellness.sleep, 50.0);
        assert_eq!(summary.wellness.mood, 50.0);
        assert_eq!(summary.wellness.fitness, 0.0);
        assert_eq!(summary.next_period_in, 28);
        assert_eq!(summary.water.completion, 0);
    }

    #[test]
    fn today_summary_matches_explicit_date() {
        let tracker = Tracker::in_memory();
        tracker.water.add(WaterEntry::new("1", date_key(today()), 2.0));
        let summary = build_summary_today(&tracker, TimeFilter::default());
        assert_eq!(summary, build_summary(&tracker, TimeFilter::default(), today()));
        assert_eq!(summary.water.completion, 25);
    }

    #[test]
    fn summary_reflects_each_tracker() {
        let today = ymd(2026, 8, 5);
        let tracker = Tracker::in_memory();
        tracker.sleep.add(SleepEntry::new("1", "2026-08-04", "23:00", "06:00", 6));
        tracker
            .workout
            .add(WorkoutEntry::new("1", "2026-08-04", "run", 30, Intensity::High));
        tracker.mood.add(MoodEntry::new("1", "2026-08-05", 7));
        tracker.water.add(WaterEntry::new("1", "2026-08-05", 4.0));
        tracker.period.add(PeriodEntry::new("1", "2026-07-30", PeriodKind::Period));
        let mut habit = HabitEntry::new("1", "stretch");
        habit.completed = true;
        tracker.habits.add(habit);

        let summary = build_summary(&tracker, TimeFilter::Last7Days, today);
        assert_eq!(summary.recent_sleep.len(), 1);
        assert_eq!(summary.wellness.sleep, 85.0);
        assert_eq!(summary.workouts_this_week, 1);
        assert_eq!(summary.wellness.fitness, 20.0);
        assert_eq!(summary.wellness.habits, 100.0);
        assert_eq!(summary.wellness.mood, 70.0);
        assert_eq!(summary.wellness.hydration, 50.0);
        assert_eq!(summary.today_mood, Some(7));
        assert_eq!(summary.next_period_in, 22);
    }
}
