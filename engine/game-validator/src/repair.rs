//! Repair planning for games that were already stored
//!
//! Earlier imports wrote kickoff times into score columns and inserted the
//! same fixture more than once. The planners here only decide what to change;
//! applying the plan is left to the storage layer.

use crate::reconciler::dedup_key;
use crate::types::DATE_FORMAT;
use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// A game row as read back from storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGame {
    pub id: i64,
    pub home_team: String,
    pub away_team: String,
    /// Kickoff in UTC
    pub start_time: DateTime<Utc>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub result: Option<String>,
    pub is_closed: bool,
}

impl StoredGame {
    pub fn has_scores(&self) -> bool {
        self.home_score.is_some() || self.away_score.is_some()
    }
}

/// Why a stored score is considered wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionReason {
    /// The score equals the local kickoff hour and minute
    KickoffAsScore,
    /// The game has not started yet but carries a score
    FutureGameWithScore,
}

impl fmt::Display for CorrectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectionReason::KickoffAsScore => f.write_str("kickoff time stored as score"),
            CorrectionReason::FutureGameWithScore => f.write_str("score on a game not yet played"),
        }
    }
}

/// Clear scores, result and the closed flag of one stored game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreCorrection {
    pub id: i64,
    pub reason: CorrectionReason,
}

/// Find stored games whose scores must be cleared
///
/// `offset` is the offset the schedule is published in; kickoff hour and
/// minute are compared in that local time.
pub fn plan_score_corrections(
    games: &[StoredGame],
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Vec<ScoreCorrection> {
    let corrections: Vec<ScoreCorrection> = games
        .iter()
        .filter(|game| game.has_scores())
        .filter_map(|game| {
            let local = game.start_time.with_timezone(&offset);
            let kickoff = (Some(local.hour() as i32), Some(local.minute() as i32));

            let reason = if (game.home_score, game.away_score) == kickoff {
                CorrectionReason::KickoffAsScore
            } else if game.start_time > now {
                CorrectionReason::FutureGameWithScore
            } else {
                return None;
            };

            warn!(
                "Game {} ({} vs {} at {}) needs correction: {}",
                game.id,
                game.away_team,
                game.home_team,
                local.format("%Y-%m-%d %H:%M"),
                reason
            );
            Some(ScoreCorrection { id: game.id, reason })
        })
        .collect();

    debug!("Planned {} score corrections out of {} games", corrections.len(), games.len());
    corrections
}

/// Ids of stored games to delete so each fixture is stored once
///
/// Games are grouped by local calendar date and unordered team pair; the
/// lowest id of each group survives. Returned ids are sorted.
pub fn plan_duplicate_removal(games: &[StoredGame], offset: FixedOffset) -> Vec<i64> {
    let mut groups: BTreeMap<String, Vec<i64>> = BTreeMap::new();
    for game in games {
        let date = game.start_time.with_timezone(&offset).format(DATE_FORMAT).to_string();
        groups
            .entry(dedup_key(&date, &game.home_team, &game.away_team))
            .or_default()
            .push(game.id);
    }

    let mut surplus: Vec<i64> = groups
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .flat_map(|(key, mut ids)| {
            ids.sort_unstable();
            debug!("Fixture {} stored {} times, keeping id {}", key, ids.len(), ids[0]);
            ids.into_iter().skip(1)
        })
        .collect();
    surplus.sort_unstable();
    surplus
}
