//! Schedule Importer
//!
//! Reads scraped game schedules, runs them through the game validator and
//! stores the validated games in PostgreSQL. Also hosts the repair tools that
//! clear mis-scraped scores and remove duplicate fixtures from the games table.

pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod store;

pub use config::ImporterConfig;
pub use error::{ImporterError, Result};
pub use loader::{load_records, LoadedRecords, SkippedRow};
pub use models::{GameRow, ImportSummary, UpsertOutcome, ValidationReport};
pub use pipeline::{build_reconciler, to_rows};
pub use store::GameStore;
