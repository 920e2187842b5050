use crate::issue::{Issue, IssueKind};
use crate::normalizer::Normalizer;
use crate::tables::ReferenceTables;
use crate::types::{CanonicalGameRecord, RawGameRecord};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// Identity of a fixture regardless of which side was recorded as home
///
/// The two team names are sorted and joined with the date.
pub fn dedup_key(date: &str, home_team: &str, away_team: &str) -> String {
    let (first, second) =
        if home_team <= away_team { (home_team, away_team) } else { (away_team, home_team) };
    format!("{first}|{second}|{date}")
}

/// A raw record that was rejected for missing identifying fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    /// 1-based position in the batch
    pub record: usize,
    pub raw: RawGameRecord,
}

/// Outcome of reconciling one batch of scraped records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub original_count: usize,

    /// Canonical records in input order, duplicates and rejected records removed
    pub validated_games: Vec<CanonicalGameRecord>,

    /// Records with no blocking issue after normalization, counted before dedup
    pub valid_count: usize,

    pub duplicate_count: usize,

    /// Per-record issues in input order, then duplicate issues
    pub issues: Vec<Issue>,

    /// `validated_games / original_count * 100`, 0 for an empty batch
    pub success_rate: f64,

    /// Records dropped for missing date or teams, kept for auditing
    pub rejected: Vec<RejectedRecord>,
}

impl BatchReport {
    /// Issues that make their record invalid
    pub fn blocking_issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.is_blocking())
    }

    /// Issues attached to the given 1-based record
    pub fn issues_for(&self, record: usize) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.record == Some(record))
    }
}

/// Runs the normalizer over a batch and removes duplicate fixtures
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    normalizer: Normalizer,
}

impl Reconciler {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    pub fn with_tables(tables: ReferenceTables) -> Self {
        Self::new(Normalizer::new(tables))
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Normalize every record, then keep only the first occurrence of each fixture
    pub fn reconcile(&self, raws: &[RawGameRecord]) -> BatchReport {
        let original_count = raws.len();
        let mut issues = Vec::new();
        let mut valid_count = 0;
        let mut rejected = Vec::new();
        let mut canonical: Vec<(usize, CanonicalGameRecord)> = Vec::with_capacity(original_count);

        for (index, raw) in raws.iter().enumerate() {
            let position = index + 1;
            let result = self.normalizer.normalize(raw);

            if result.valid {
                valid_count += 1;
            } else {
                warn!(
                    "Game {} has issues: {}",
                    position,
                    result.issues.iter().map(|i| i.message.as_str()).collect::<Vec<_>>().join("; ")
                );
            }
            issues.extend(result.issues.into_iter().map(|issue| issue.at(position)));

            match result.record {
                Some(record) => canonical.push((position, record)),
                None => rejected.push(RejectedRecord { record: position, raw: raw.clone() }),
            }
        }

        let mut seen = HashSet::new();
        let mut validated_games = Vec::with_capacity(canonical.len());
        let mut duplicate_count = 0;

        for (position, record) in canonical {
            let key = dedup_key(&record.date, &record.home_team, &record.away_team);
            if seen.insert(key) {
                validated_games.push(record);
            } else {
                warn!("Dropping duplicate game {}: {}", position, record);
                duplicate_count += 1;
                issues.push(
                    Issue::new(
                        IssueKind::Duplicate,
                        format!(
                            "duplicate game: {} vs {} on {}",
                            record.home_team, record.away_team, record.date
                        ),
                    )
                    .at(position),
                );
            }
        }

        let success_rate = if original_count == 0 {
            0.0
        } else {
            validated_games.len() as f64 / original_count as f64 * 100.0
        };

        info!(
            "Reconciled {} records: {} valid, {} kept, {} duplicates, {} rejected ({:.1}%)",
            original_count,
            valid_count,
            validated_games.len(),
            duplicate_count,
            rejected.len(),
            success_rate
        );

        BatchReport {
            original_count,
            validated_games,
            valid_count,
            duplicate_count,
            issues,
            success_rate,
            rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_key_ignores_orientation() {
        assert_eq!(dedup_key("2025-09-22", "KT", "LG"), dedup_key("2025-09-22", "LG", "KT"));
        assert_ne!(dedup_key("2025-09-22", "KT", "LG"), dedup_key("2025-09-23", "KT", "LG"));
        assert_ne!(dedup_key("2025-09-22", "KT", "LG"), dedup_key("2025-09-22", "KT", "NC"));
    }

    #[test]
    fn test_duplicates_keep_first_seen() {
        let reconciler = Reconciler::default();
        let raws = vec![
            RawGameRecord::new("2025-09-22", "KT", "LG").with_time("18:30"),
            RawGameRecord::new("2025-09-22", "NC", "SSG"),
            RawGameRecord::new("2025-09-22", "lg", "kt").with_time("17:00"),
        ];

        let report = reconciler.reconcile(&raws);
        assert_eq!(report.original_count, 3);
        assert_eq!(report.valid_count, 3);
        assert_eq!(report.duplicate_count, 1);
        assert_eq!(report.validated_games.len(), 2);
        assert_eq!(report.validated_games[0].time, "18:30");

        let duplicate = report.issues.last().unwrap();
        assert_eq!(duplicate.kind, IssueKind::Duplicate);
        assert_eq!(duplicate.record, Some(3));
        assert!(duplicate.message.contains("LG"));
        assert!(duplicate.message.contains("KT"));
    }

    #[test]
    fn test_issues_are_tagged_with_positions() {
        let reconciler = Reconciler::default();
        let raws = vec![
            RawGameRecord::new("2025-09-22", "KT", "LG"),
            RawGameRecord::new("2025-09-22", "NC", "NC"),
            RawGameRecord::new("bad-date", "두산", "한화").with_time("late"),
        ];

        let report = reconciler.reconcile(&raws);
        assert_eq!(report.valid_count, 1);
        assert_eq!(report.issues_for(1).count(), 0);
        assert_eq!(report.issues_for(2).next().unwrap().kind, IssueKind::SelfMatch);
        let third: Vec<IssueKind> = report.issues_for(3).map(|i| i.kind).collect();
        assert_eq!(third, vec![IssueKind::InvalidDate, IssueKind::InvalidTime]);
        assert_eq!(report.blocking_issues().count(), 3);
    }

    #[test]
    fn test_rejected_records_are_reported_not_kept() {
        let reconciler = Reconciler::default();
        let mut missing = RawGameRecord::new("2025-09-22", "KT", "LG");
        missing.away_team = None;
        let raws = vec![RawGameRecord::new("2025-09-22", "KT", "LG"), missing];

        let report = reconciler.reconcile(&raws);
        assert_eq!(report.validated_games.len(), 1);
        assert_eq!(report.duplicate_count, 0);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].record, 2);
        assert_eq!(report.success_rate, 50.0);
    }

    #[test]
    fn test_report_serializes_with_snake_case_counts() {
        let report = Reconciler::default().reconcile(&[RawGameRecord::new("2025-09-22", "KT", "LG")]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["original_count"], 1);
        assert_eq!(json["success_rate"], 100.0);
        assert_eq!(json["validated_games"][0]["homeTeam"], "KT");
    }
}
