use crate::config::ImporterConfig;
use crate::error::Result;
use crate::models::GameRow;
use chrono::FixedOffset;
use game_validator::{CanonicalGameRecord, Normalizer, Reconciler};
use tracing::warn;

/// Reconciler set up with the configured tables and default kickoff
pub fn build_reconciler(config: &ImporterConfig) -> Result<Reconciler> {
    let normalizer = Normalizer::new(config.reference_tables()?).with_default_time(config.default_time()?);
    Ok(Reconciler::new(normalizer))
}

/// Turn validated games into rows; returns the rows and how many were skipped
pub fn to_rows(games: &[CanonicalGameRecord], sport_id: i32, offset: FixedOffset) -> (Vec<GameRow>, usize) {
    let mut rows = Vec::with_capacity(games.len());
    let mut skipped = 0;
    for game in games {
        match GameRow::from_canonical(game, sport_id, offset) {
            Some(row) => rows.push(row),
            None => {
                warn!("Skipping game without a usable start time: {}", game);
                skipped += 1;
            }
        }
    }
    (rows, skipped)
}
