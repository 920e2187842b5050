use chrono::{DateTime, FixedOffset, Utc};
use game_validator::{BatchReport, CanonicalGameRecord, Issue, RejectedRecord};
use serde::Serialize;

/// Database model for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRow {
    pub sport_id: i32,
    pub home_team: String,
    pub away_team: String,
    /// Kickoff in UTC
    pub start_time: DateTime<Utc>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    /// Result code ("0" draw, "1" home win, "2" away win)
    pub result: Option<String>,
    pub is_closed: bool,
    pub stadium: Option<String>,
}

impl GameRow {
    /// Convert a validated record to a database row
    ///
    /// Returns `None` when the date or time cannot form a timestamp.
    pub fn from_canonical(
        record: &CanonicalGameRecord,
        sport_id: i32,
        offset: FixedOffset,
    ) -> Option<Self> {
        Some(Self {
            sport_id,
            home_team: record.home_team.clone(),
            away_team: record.away_team.clone(),
            start_time: record.start_time(offset)?,
            home_score: record.home_score.map(i32::from),
            away_score: record.away_score.map(i32::from),
            result: record.result.map(|r| r.code().to_string()),
            is_closed: record.is_finished(),
            stadium: record.stadium.clone(),
        })
    }
}

/// Outcome of writing a batch of rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub failed: usize,
    /// Records that could not be turned into rows
    pub skipped: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.failed + self.skipped
    }
}

/// Whether an upsert created or changed a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Counters written at the top of a validation report
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub original_count: usize,
    pub valid_count: usize,
    pub duplicate_count: usize,
    pub rejected_count: usize,
    pub success_rate: f64,
    pub validated_at: DateTime<Utc>,
}

/// Validation report as written to disk
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport<'a> {
    pub metadata: ReportMetadata,
    pub games: &'a [CanonicalGameRecord],
    pub issues: &'a [Issue],
    pub rejected: &'a [RejectedRecord],
}

impl<'a> ValidationReport<'a> {
    pub fn new(report: &'a BatchReport, validated_at: DateTime<Utc>) -> Self {
        Self {
            metadata: ReportMetadata {
                original_count: report.original_count,
                valid_count: report.valid_count,
                duplicate_count: report.duplicate_count,
                rejected_count: report.rejected.len(),
                success_rate: report.success_rate,
                validated_at,
            },
            games: &report.validated_games,
            issues: &report.issues,
            rejected: &report.rejected,
        }
    }
}
