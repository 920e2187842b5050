use anyhow::{Context, Result};
use clap::Parser;
use game_validator::plan_duplicate_removal;
use schedule_importer::logging::initialize_logging;
use schedule_importer::{GameStore, ImporterConfig};
use std::path::PathBuf;
use tracing::info;

/// Remove games stored more than once, keeping the oldest row of each fixture
#[derive(Parser)]
#[command(name = "dedupe-games")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only print the ids that would be deleted
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ImporterConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    initialize_logging(&config.logging)?;

    let offset = config.utc_offset()?;
    let store = GameStore::connect(&config.database, &config.import.table)
        .await
        .context("Failed to connect to database")?;

    let games = store
        .fetch_games(config.import.sport_id, None)
        .await
        .context("Failed to fetch games")?;
    info!("Total games before cleanup: {}", games.len());

    let surplus = plan_duplicate_removal(&games, offset);
    if surplus.is_empty() {
        info!("No duplicate games found");
        return Ok(());
    }

    info!("Duplicate rows: {:?}", surplus);
    if args.dry_run {
        info!("[dry run] {} games would be deleted", surplus.len());
        return Ok(());
    }

    let deleted = store.delete_games(&surplus).await.context("Failed to delete duplicate games")?;
    info!("Deleted {} duplicate games", deleted);

    let remaining = store.count_games(config.import.sport_id).await.context("Failed to count games")?;
    info!("Total games after cleanup: {}", remaining);
    Ok(())
}
