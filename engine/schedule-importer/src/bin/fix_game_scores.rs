use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Parser;
use game_validator::plan_score_corrections;
use schedule_importer::logging::initialize_logging;
use schedule_importer::{GameStore, ImporterConfig};
use std::path::PathBuf;
use tracing::info;

/// Clear scores that were stored for games not yet played, or that are really kickoff times
#[derive(Parser)]
#[command(name = "fix-game-scores")]
struct Args {
    /// First local date to scan (YYYY-MM-DD); all games when omitted
    #[arg(long)]
    since: Option<NaiveDate>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only print the planned corrections
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ImporterConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    initialize_logging(&config.logging)?;

    let offset = config.utc_offset()?;
    let since = match args.since {
        Some(date) => Some(
            offset
                .from_local_datetime(&date.and_time(NaiveTime::MIN))
                .single()
                .context("Start date is ambiguous in the configured offset")?
                .with_timezone(&Utc),
        ),
        None => None,
    };

    let store = GameStore::connect(&config.database, &config.import.table)
        .await
        .context("Failed to connect to database")?;

    let games = store
        .fetch_games(config.import.sport_id, since)
        .await
        .context("Failed to fetch games")?;
    info!("Checking {} games", games.len());

    let corrections = plan_score_corrections(&games, Utc::now(), offset);
    if corrections.is_empty() {
        info!("No scores need fixing");
        return Ok(());
    }

    for correction in &corrections {
        info!("Game {}: {}", correction.id, correction.reason);
    }

    if args.dry_run {
        info!("[dry run] {} games would be reset", corrections.len());
        return Ok(());
    }

    let ids: Vec<i64> = corrections.iter().map(|c| c.id).collect();
    let updated = store.clear_scores(&ids).await.context("Failed to clear scores")?;
    info!("Reset scores of {} games", updated);
    Ok(())
}
