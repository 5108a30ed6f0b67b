use chrono::{NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// A persisted tracker entry. Collections are keyed by `id`, which is
/// assumed unique but never checked.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Partial form of the record: every `Some` field overwrites the
    /// matching field on update, `None` leaves it alone.
    type Patch;

    fn id(&self) -> &str;
    fn apply(&mut self, patch: &Self::Patch);
}

fn merge<T: Clone>(field: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *field = value.clone();
    }
}

fn merge_opt<T: Clone>(field: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        *field = value.clone();
    }
}

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp id, strictly increasing within the process.
pub fn next_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, candidate, Ordering::SeqCst, Ordering::Relaxed) {
            Ok(_) => return candidate.to_string(),
            Err(actual) => last = actual,
        }
    }
}

// Sleep

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepEntry {
    pub id: String,
    pub date: String,
    pub bedtime: String,
    pub wake_time: String,
    pub duration: f64,
    pub quality: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SleepEntry {
    /// Builds an entry with `duration` derived from the two clock times.
    /// Unparseable times give a zero duration.
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        bedtime: impl Into<String>,
        wake_time: impl Into<String>,
        quality: u8,
    ) -> Self {
        let bedtime = bedtime.into();
        let wake_time = wake_time.into();
        let duration = sleep_duration(&bedtime, &wake_time).unwrap_or(0.0);
        Self {
            id: id.into(),
            date: date.into(),
            bedtime,
            wake_time,
            duration,
            quality,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Hours slept between two "HH:MM" clock times, wrapping past midnight,
/// rounded to one decimal.
pub fn sleep_duration(bedtime: &str, wake_time: &str) -> Option<f64> {
    let bed = NaiveTime::parse_from_str(bedtime, "%H:%M").ok()?;
    let wake = NaiveTime::parse_from_str(wake_time, "%H:%M").ok()?;
    let mut minutes = (wake - bed).num_minutes();
    if minutes < 0 {
        minutes += 24 * 60;
    }
    Some((minutes as f64 / 60.0 * 10.0).round() / 10.0)
}

#[derive(Debug, Clone, Default)]
pub struct SleepPatch {
    pub date: Option<String>,
    pub bedtime: Option<String>,
    pub wake_time: Option<String>,
    pub duration: Option<f64>,
    pub quality: Option<u8>,
    pub notes: Option<String>,
}

impl SleepPatch {
    /// Patch that moves both clock times and re-derives the duration.
    pub fn times(bedtime: impl Into<String>, wake_time: impl Into<String>) -> Self {
        let bedtime = bedtime.into();
        let wake_time = wake_time.into();
        Self {
            duration: sleep_duration(&bedtime, &wake_time),
            bedtime: Some(bedtime),
            wake_time: Some(wake_time),
            ..Self::default()
        }
    }
}

impl Record for SleepEntry {
    type Patch = SleepPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &SleepPatch) {
        merge(&mut self.date, &patch.date);
        merge(&mut self.bedtime, &patch.bedtime);
        merge(&mut self.wake_time, &patch.wake_time);
        merge(&mut self.duration, &patch.duration);
        merge(&mut self.quality, &patch.quality);
        merge_opt(&mut self.notes, &patch.notes);
    }
}

// Period

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Period,
    Spotting,
    Symptoms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodEntry {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: PeriodKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<Flow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PeriodEntry {
    pub fn new(id: impl Into<String>, date: impl Into<String>, kind: PeriodKind) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            kind,
            flow: None,
            symptoms: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PeriodPatch {
    pub date: Option<String>,
    pub kind: Option<PeriodKind>,
    pub flow: Option<Flow>,
    pub symptoms: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl Record for PeriodEntry {
    type Patch = PeriodPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &PeriodPatch) {
        merge(&mut self.date, &patch.date);
        merge(&mut self.kind, &patch.kind);
        merge_opt(&mut self.flow, &patch.flow);
        merge_opt(&mut self.symptoms, &patch.symptoms);
        merge_opt(&mut self.notes, &patch.notes);
    }
}

// Workout

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Minutes.
    pub duration: u32,
    pub intensity: Intensity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WorkoutEntry {
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        kind: impl Into<String>,
        duration: u32,
        intensity: Intensity,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            kind: kind.into(),
            duration,
            intensity,
            calories: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkoutPatch {
    pub date: Option<String>,
    pub kind: Option<String>,
    pub duration: Option<u32>,
    pub intensity: Option<Intensity>,
    pub calories: Option<u32>,
    pub notes: Option<String>,
}

impl Record for WorkoutEntry {
    type Patch = WorkoutPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &WorkoutPatch) {
        merge(&mut self.date, &patch.date);
        merge(&mut self.kind, &patch.kind);
        merge(&mut self.duration, &patch.duration);
        merge(&mut self.intensity, &patch.intensity);
        merge_opt(&mut self.calories, &patch.calories);
        merge_opt(&mut self.notes, &patch.notes);
    }
}

// Habit

/// Habits are not dated per instance: one with no `date` recurs daily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitEntry {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl HabitEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            completed: false,
            date: None,
            streak: Some(0),
            category: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub date: Option<String>,
    pub streak: Option<u32>,
    pub category: Option<String>,
}

impl Record for HabitEntry {
    type Patch = HabitPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &HabitPatch) {
        merge(&mut self.title, &patch.title);
        merge_opt(&mut self.description, &patch.description);
        merge(&mut self.completed, &patch.completed);
        merge_opt(&mut self.date, &patch.date);
        merge_opt(&mut self.streak, &patch.streak);
        merge_opt(&mut self.category, &patch.category);
    }
}

// Budget

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

/// `category_id` is a weak reference into the category collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEntry {
    pub id: String,
    pub date: String,
    pub amount: f64,
    pub description: String,
    pub category_id: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl BudgetEntry {
    pub fn expense(
        id: impl Into<String>,
        date: impl Into<String>,
        amount: f64,
        category_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            amount,
            description: description.into(),
            category_id: category_id.into(),
            kind: EntryKind::Expense,
        }
    }

    pub fn income(
        id: impl Into<String>,
        date: impl Into<String>,
        amount: f64,
        category_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: EntryKind::Income,
            ..Self::expense(id, date, amount, category_id, description)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BudgetPatch {
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub kind: Option<EntryKind>,
}

impl Record for BudgetEntry {
    type Patch = BudgetPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &BudgetPatch) {
        merge(&mut self.date, &patch.date);
        merge(&mut self.amount, &patch.amount);
        merge(&mut self.description, &patch.description);
        merge(&mut self.category_id, &patch.category_id);
        merge(&mut self.kind, &patch.kind);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategory {
    pub id: String,
    pub name: String,
    pub limit: f64,
    pub color: String,
}

impl BudgetCategory {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        limit: f64,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            limit,
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub limit: Option<f64>,
    pub color: Option<String>,
}

impl Record for BudgetCategory {
    type Patch = CategoryPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &CategoryPatch) {
        merge(&mut self.name, &patch.name);
        merge(&mut self.limit, &patch.limit);
        merge(&mut self.color, &patch.color);
    }
}

/// Categories a fresh or reset budget starts with.
pub fn default_categories() -> Vec<BudgetCategory> {
    vec![
        BudgetCategory::new("1", "Food", 500.0, "#10B981"),
        BudgetCategory::new("2", "Entertainment", 200.0, "#F59E0B"),
        BudgetCategory::new("3", "Housing", 1000.0, "#4F46E5"),
        BudgetCategory::new("4", "Transport", 150.0, "#EC4899"),
        BudgetCategory::new("5", "Savings", 400.0, "#06B6D4"),
    ]
}

// Mood

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: String,
    pub date: String,
    pub mood: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MoodEntry {
    pub fn new(id: impl Into<String>, date: impl Into<String>, mood: u8) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            mood,
            activities: None,
            notes: None,
        }
    }

    pub fn with_activities<I, S>(mut self, activities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.activities = Some(activities.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct MoodPatch {
    pub date: Option<String>,
    pub mood: Option<u8>,
    pub activities: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl Record for MoodEntry {
    type Patch = MoodPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &MoodPatch) {
        merge(&mut self.date, &patch.date);
        merge(&mut self.mood, &patch.mood);
        merge_opt(&mut self.activities, &patch.activities);
        merge_opt(&mut self.notes, &patch.notes);
    }
}

// Water

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterEntry {
    pub id: String,
    pub date: String,
    /// Glasses; fractional amounts are allowed.
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl WaterEntry {
    pub fn new(id: impl Into<String>, date: impl Into<String>, amount: f64) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            amount,
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct WaterPatch {
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub timestamp: Option<String>,
}

impl Record for WaterEntry {
    type Patch = WaterPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &WaterPatch) {
        merge(&mut self.date, &patch.date);
        merge(&mut self.amount, &patch.amount);
        merge_opt(&mut self.timestamp, &patch.timestamp);
    }
}

// HTTP payloads

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleep_duration_wraps_past_midnight() {
        assert_eq!(sleep_duration("22:30", "07:00"), Some(8.5));
        assert_eq!(sleep_duration("23:00", "06:00"), Some(7.0));
        assert_eq!(sleep_duration("01:15", "09:00"), Some(7.8));
        assert_eq!(sleep_duration("late", "07:00"), None);
    }

    #[test]
    fn sleep_entry_derives_duration() {
        let entry = SleepEntry::new("1", "2024-01-01", "22:30", "07:00", 7);
        assert_eq!(entry.duration, 8.5);
    }

    #[test]
    fn serialized_fields_use_camel_case_and_type_tag() {
        let entry = BudgetEntry::expense("1", "2024-01-01", 12.5, "1", "lunch");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["categoryId"], "1");
        assert_eq!(value["type"], "expense");

        let sleep = SleepEntry::new("2", "2024-01-01", "23:00", "06:00", 5);
        let value = serde_json::to_value(&sleep).unwrap();
        assert_eq!(value["wakeTime"], "06:00");
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut entry = MoodEntry::new("1", "2024-01-01", 4).with_activities(["walk"]);
        entry.apply(&MoodPatch {
            mood: Some(8),
            ..MoodPatch::default()
        });
        assert_eq!(entry.mood, 8);
        assert_eq!(entry.date, "2024-01-01");
        assert_eq!(entry.activities, Some(vec!["walk".to_string()]));
    }

    #[test]
    fn next_id_is_strictly_increasing() {
        let first: i64 = next_id().parse().unwrap();
        let second: i64 = next_id().parse().unwrap();
        assert!(second > first);
    }
}
