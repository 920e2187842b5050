//! Reference-game override stage
//!
//! Runs after the validation pipeline has produced a record. When the record's
//! date and team pair match an authoritative reference game, its score and result
//! are replaced by the reference values. The issue it emits is
//! [`IssueKind::ReferenceOverride`], which never invalidates a record.

use crate::issue::{Issue, IssueKind};
use crate::tables::ReferenceTables;
use crate::types::{CanonicalGameRecord, GameStatus};
use tracing::debug;

/// Replace score and result with reference data when the fixture is known
///
/// A reference entry recorded with home and away the other way round is
/// mirrored: scores are swapped and the result is inverted. Returns the
/// informational issue when an override happened.
pub fn apply_reference_override(
    tables: &ReferenceTables,
    record: &mut CanonicalGameRecord,
) -> Option<Issue> {
    let date = record.calendar_date()?;
    let (game, swapped) = tables.find_reference_game(date, &record.home_team, &record.away_team)?;

    let (home_score, away_score, result) = if swapped {
        (game.away_score, game.home_score, game.result.inverted())
    } else {
        (game.home_score, game.away_score, game.result)
    };

    debug!(
        "Reference override for {} {} vs {}: {}:{} (swapped: {})",
        record.date, record.away_team, record.home_team, away_score, home_score, swapped
    );

    record.home_score = Some(home_score);
    record.away_score = Some(away_score);
    record.result = Some(result);
    record.status = GameStatus::Finished;

    let message = if swapped {
        format!(
            "replaced with reference result {home_score}:{away_score} (home/away swapped)"
        )
    } else {
        format!("replaced with reference result {home_score}:{away_score}")
    };
    Some(Issue::new(IssueKind::ReferenceOverride, message))
}
