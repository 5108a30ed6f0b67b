//! Per-domain collections over a [`KeyValueStore`].
//!
//! Each store reads the whole collection, changes it in memory and writes
//! the whole collection back. Storage problems never reach the caller:
//! unreadable slots fall back to the domain default and failed writes
//! are logged and dropped.

use crate::domain::{BUDGET_CATEGORIES_KEY, Domain};
use crate::errors::StorageError;
use crate::models::{
    BudgetCategory, BudgetEntry, HabitEntry, MoodEntry, PeriodEntry, Record, SleepEntry,
    WaterEntry, WorkoutEntry, default_categories,
};
use crate::stats::habit::toggle_patch;
use crate::storage::{KeyValueStore, MemoryStore};
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct DomainStore<T: Record> {
    key: &'static str,
    default: fn() -> Vec<T>,
    backend: Arc<dyn KeyValueStore>,
}

impl<T: Record> DomainStore<T> {
    /// Store whose default collection is empty.
    pub fn new(backend: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self::with_default(backend, key, Vec::new)
    }

    pub fn with_default(
        backend: Arc<dyn KeyValueStore>,
        key: &'static str,
        default: fn() -> Vec<T>,
    ) -> Self {
        Self {
            key,
            default,
            backend,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn get_all(&self) -> Vec<T> {
        match self.load() {
            Ok(Some(records)) => records,
            Ok(None) => {
                debug!(key = self.key, "slot not written yet, using default");
                (self.default)()
            }
            Err(err) => {
                error!(key = self.key, "failed to read collection: {err}");
                (self.default)()
            }
        }
    }

    pub fn add(&self, record: T) {
        let mut records = self.get_all();
        records.push(record);
        self.persist(&records);
    }

    /// Merges `patch` over every record carrying `id`. Persists even when
    /// nothing matched.
    pub fn update(&self, id: &str, patch: &T::Patch) {
        let mut records = self.get_all();
        let mut matched = 0usize;
        for record in records.iter_mut().filter(|record| record.id() == id) {
            record.apply(patch);
            matched += 1;
        }
        if matched == 0 {
            debug!(key = self.key, id, "update matched no records");
        }
        self.persist(&records);
    }

    pub fn delete(&self, id: &str) {
        let mut records = self.get_all();
        let before = records.len();
        records.retain(|record| record.id() != id);
        debug!(key = self.key, id, removed = before - records.len(), "deleted records");
        self.persist(&records);
    }

    pub fn reset(&self) {
        info!(key = self.key, "resetting collection");
        self.persist(&(self.default)());
    }

    fn load(&self) -> Result<Option<Vec<T>>, StorageError> {
        let Some(bytes) = self.backend.get(self.key)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn persist(&self, records: &[T]) {
        if let Err(err) = self.try_persist(records) {
            error!(key = self.key, "failed to write collection: {err}");
        }
    }

    fn try_persist(&self, records: &[T]) -> Result<(), StorageError> {
        let payload = serde_json::to_vec_pretty(records)?;
        self.backend.set(self.key, &payload)
    }
}

impl DomainStore<HabitEntry> {
    /// Flips a habit's completion and streak. Returns `false` when no habit
    /// has `id`.
    pub fn toggle(&self, id: &str) -> bool {
        let Some(habit) = self.get_all().into_iter().find(|habit| habit.id == id) else {
            return false;
        };
        self.update(id, &toggle_patch(&habit));
        true
    }
}

/// Budget entries plus the category collection they point into.
#[derive(Clone)]
pub struct BudgetStore {
    pub entries: DomainStore<BudgetEntry>,
    pub categories: DomainStore<BudgetCategory>,
}

impl BudgetStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            entries: DomainStore::new(Arc::clone(&backend), Domain::Budget.storage_key()),
            categories: DomainStore::with_default(
                backend,
                BUDGET_CATEGORIES_KEY,
                default_categories,
            ),
        }
    }

    /// Empties the entries and reseeds the default categories.
    pub fn reset(&self) {
        self.entries.reset();
        self.categories.reset();
    }
}

/// All seven trackers sharing one backend.
#[derive(Clone)]
pub struct Tracker {
    pub sleep: DomainStore<SleepEntry>,
    pub period: DomainStore<PeriodEntry>,
    pub workout: DomainStore<WorkoutEntry>,
    pub habits: DomainStore<HabitEntry>,
    pub budget: BudgetStore,
    pub mood: DomainStore<MoodEntry>,
    pub water: DomainStore<WaterEntry>,
}

impl Tracker {
    pub fn open(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            sleep: DomainStore::new(Arc::clone(&backend), Domain::Sleep.storage_key()),
            period: DomainStore::new(Arc::clone(&backend), Domain::Period.storage_key()),
            workout: DomainStore::new(Arc::clone(&backend), Domain::Workout.storage_key()),
            habits: DomainStore::new(Arc::clone(&backend), Domain::Habit.storage_key()),
            budget: BudgetStore::new(Arc::clone(&backend)),
            mood: DomainStore::new(Arc::clone(&backend), Domain::Mood.storage_key()),
            water: DomainStore::new(backend, Domain::Water.storage_key()),
        }
    }

    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryStore::new()))
    }

    /// Resets every domain in turn. Not atomic: each reset is an
    /// independent write.
    pub fn reset_all(&self) {
        self.sleep.reset();
        self.period.reset();
        self.workout.reset();
        self.habits.reset();
        self.budget.reset();
        self.mood.reset();
        self.water.reset();
    }
}
