use super::{Dated, percent_of};
use crate::models::{HabitEntry, HabitPatch};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

const UNCATEGORIZED: &str = "Other";
const TOP_STREAKS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionStats {
    /// Percentage of today's habits that are completed.
    pub today: u32,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCompletion {
    pub name: String,
    pub total: usize,
    pub completed: usize,
    pub completion: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitStreak {
    pub title: String,
    pub streak: u32,
}

/// Habits due today: undated ones plus those dated today.
pub fn todays_habits(habits: &[HabitEntry], today: NaiveDate) -> Vec<&HabitEntry> {
    habits
        .iter()
        .filter(|habit| habit.date.is_none() || habit.day() == Some(today))
        .collect()
}

pub fn completion_stats(habits: &[HabitEntry], today: NaiveDate) -> CompletionStats {
    let due = todays_habits(habits, today);
    let completed = due.iter().filter(|habit| habit.completed).count();
    CompletionStats {
        today: percent_of(completed as f64, due.len() as f64),
        total: habits.len(),
    }
}

/// Flips completion and moves the streak with it, never below zero.
pub fn toggle_patch(habit: &HabitEntry) -> HabitPatch {
    let streak = habit.streak.unwrap_or(0);
    let streak = if habit.completed {
        streak.saturating_sub(1)
    } else {
        streak.saturating_add(1)
    };
    HabitPatch {
        completed: Some(!habit.completed),
        streak: Some(streak),
        ..HabitPatch::default()
    }
}

/// Completion per category in first-seen order; uncategorised habits
/// are grouped under "Other".
pub fn category_breakdown(habits: &[HabitEntry]) -> Vec<CategoryCompletion> {
    let mut rows: Vec<CategoryCompletion> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for habit in habits {
        let name = habit.category.as_deref().unwrap_or(UNCATEGORIZED);
        let slot = *index.entry(name).or_insert_with(|| {
            rows.push(CategoryCompletion {
                name: name.to_string(),
                total: 0,
                completed: 0,
                completion: 0,
            });
            rows.len() - 1
        });
        rows[slot].total += 1;
        if habit.completed {
            rows[slot].completed += 1;
        }
    }
    for row in &mut rows {
        row.completion = percent_of(row.completed as f64, row.total as f64);
    }
    rows
}

pub fn top_streaks(habits: &[HabitEntry]) -> Vec<HabitStreak> {
    let mut streaks: Vec<HabitStreak> = habits
        .iter()
        .filter_map(|habit| match habit.streak {
            Some(streak) if streak > 0 => Some(HabitStreak {
                title: habit.title.clone(),
                streak,
            }),
            _ => None,
        })
        .collect();
    streaks.sort_by(|a, b| b.streak.cmp(&a.streak));
    streaks.truncate(TOP_STREAKS);
    streaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ymd;

    fn habit(id: &str, completed: bool, date: Option<&str>, category: Option<&str>) -> HabitEntry {
        let mut habit = HabitEntry::new(id, format!("habit {id}"));
        habit.completed = completed;
        habit.date = date.map(str::to_string);
        habit.category = category.map(str::to_string);
        habit
    }

    #[test]
    fn today_includes_undated_and_todays_habits() {
        let today = ymd(2026, 4, 2);
        let habits = vec![
            habit("1", true, None, None),
            habit("2", false, Some("2026-04-02"), None),
            habit("3", true, Some("2026-04-01"), None),
        ];
        assert_eq!(todays_habits(&habits, today).len(), 2);
        let stats = completion_stats(&habits, today);
        assert_eq!(stats.today, 50);
        assert_eq!(stats.total, 3);
    }

    #[test]
    fn toggle_moves_streak_with_completion() {
        let mut done = habit("1", true, None, None);
        done.streak = Some(0);
        let patch = toggle_patch(&done);
        assert_eq!(patch.completed, Some(false));
        assert_eq!(patch.streak, Some(0));

        let open = habit("2", false, None, None);
        assert_eq!(toggle_patch(&open).streak, Some(1));
    }

    #[test]
    fn breakdown_groups_missing_category_as_other() {
        let habits = vec![
            habit("1", true, None, Some("Health")),
            habit("2", false, None, None),
            habit("3", false, None, Some("Health")),
        ];
        let rows = category_breakdown(&habits);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Health");
        assert_eq!(rows[0].completion, 50);
        assert_eq!(rows[1].name, "Other");
        assert_eq!(rows[1].completion, 0);
    }

    #[test]
    fn top_streaks_skip_zero_and_sort() {
        let mut habits: Vec<_> = (0..7).map(|i| habit(&i.to_string(), false, None, None)).collect();
        for (i, habit) in habits.iter_mut().enumerate() {
            habit.streak = Some(i as u32);
        }
        let top = top_streaks(&habits);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].streak, 6);
        assert_eq!(top[4].streak, 2);
    }
}
