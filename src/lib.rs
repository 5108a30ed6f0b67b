pub mod app;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod stats;
pub mod storage;
pub mod store;

pub use app::router;
pub use config::Config;
pub use domain::Domain;
pub use errors::StorageError;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{BudgetStore, DomainStore, Tracker};
