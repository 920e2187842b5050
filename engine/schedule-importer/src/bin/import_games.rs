use anyhow::{Context, Result};
use clap::Parser;
use schedule_importer::logging::initialize_logging;
use schedule_importer::{build_reconciler, load_records, to_rows, GameStore, ImporterConfig};
use std::path::PathBuf;
use tracing::{info, warn};

/// Validate scraped games and upsert them into the games table
#[derive(Parser)]
#[command(name = "import-games")]
struct Args {
    /// Scraped games (.csv or .json)
    input: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate and map rows without touching the database
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ImporterConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    initialize_logging(&config.logging)?;

    info!("Importing games from {}", args.input.display());

    let loaded = load_records(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let reconciler = build_reconciler(&config).context("Failed to set up validator")?;
    let report = reconciler.reconcile(&loaded.records);

    for issue in report.blocking_issues() {
        warn!("{}", issue);
    }

    let offset = config.utc_offset()?;
    let (rows, skipped) = to_rows(&report.validated_games, config.import.sport_id, offset);
    info!(
        "{} of {} records mapped to rows ({} without a start time)",
        rows.len(),
        report.original_count,
        skipped
    );

    if args.dry_run {
        for row in &rows {
            info!(
                "[dry run] {} vs {} at {} score {:?}:{:?}",
                row.away_team, row.home_team, row.start_time, row.away_score, row.home_score
            );
        }
        return Ok(());
    }

    let store = GameStore::connect(&config.database, &config.import.table)
        .await
        .context("Failed to connect to database")?;
    let mut summary = store.upsert_games(&rows).await;
    summary.skipped = skipped;

    info!("Inserted: {}", summary.inserted);
    info!("Updated: {}", summary.updated);
    info!("Failed: {}", summary.failed);
    info!("Skipped: {}", summary.skipped);

    let total = store.count_games(config.import.sport_id).await.context("Failed to count games")?;
    info!("Games in {}: {}", store.table(), total);

    if summary.failed > 0 {
        anyhow::bail!("{} of {} games could not be stored", summary.failed, summary.total());
    }
    Ok(())
}
