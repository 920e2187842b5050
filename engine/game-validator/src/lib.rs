//! Game Validator - Normalizes and reconciles scraped game schedules
//!
//! Scrapers hand over loosely typed game rows. The [`Normalizer`] turns each row
//! into a [`CanonicalGameRecord`] plus a list of [`Issue`]s, the [`Reconciler`]
//! does the same for a whole batch and drops duplicate fixtures, and the
//! [`repair`] planners decide how to fix games that were stored badly before.
//!
//! Nothing in this crate performs I/O apart from loading [`ReferenceTables`]
//! from a JSON file.

pub mod error;
pub mod issue;
pub mod normalizer;
pub mod reconciler;
pub mod reference;
pub mod repair;
pub mod tables;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{Result, ValidatorError};
pub use issue::{Issue, IssueKind};
pub use normalizer::{Normalizer, ValidationResult};
pub use reconciler::{dedup_key, BatchReport, Reconciler, RejectedRecord};
pub use reference::apply_reference_override;
pub use repair::{plan_duplicate_removal, plan_score_corrections, CorrectionReason, ScoreCorrection, StoredGame};
pub use tables::{ReferenceGame, ReferenceTables};
pub use types::{CanonicalGameRecord, GameResult, GameStatus, RawGameRecord};

/// Lowest plausible score
pub const MIN_SCORE: i32 = 0;

/// Highest plausible score
pub const MAX_SCORE: i32 = 30;

/// Kickoff time used when the scraped one is missing or unreadable
pub const DEFAULT_GAME_TIME: &str = "14:00";
