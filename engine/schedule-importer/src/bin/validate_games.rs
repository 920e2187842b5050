use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use schedule_importer::export::{output_paths, save_games_csv, save_report};
use schedule_importer::logging::initialize_logging;
use schedule_importer::{build_reconciler, load_records, ImporterConfig};
use std::path::PathBuf;
use tracing::{info, warn};

/// Validate a scraped schedule and write the cleaned games plus a report
#[derive(Parser)]
#[command(name = "validate-games")]
struct Args {
    /// Scraped games (.csv or .json)
    input: PathBuf,

    /// Directory for the output files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = ImporterConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    initialize_logging(&config.logging)?;

    info!("Validating {}", args.input.display());

    let loaded = load_records(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    for row in &loaded.skipped {
        warn!("Unreadable row {}", row);
    }

    let reconciler = build_reconciler(&config).context("Failed to set up validator")?;
    let report = reconciler.reconcile(&loaded.records);

    let validated_at = Utc::now();
    let (csv_path, json_path) = output_paths(&args.input, args.output_dir.as_deref(), validated_at);
    save_games_csv(&csv_path, &report.validated_games)
        .with_context(|| format!("Failed to write {}", csv_path.display()))?;
    save_report(&json_path, &report, validated_at)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    info!("Original games: {}", report.original_count);
    info!("Valid games: {}", report.valid_count);
    info!("Duplicates removed: {}", report.duplicate_count);
    info!("Rejected records: {}", report.rejected.len());
    info!("Success rate: {:.1}%", report.success_rate);

    if report.issues.is_empty() {
        info!("No issues found");
    } else {
        info!("Issues found: {}", report.issues.len());
        for issue in &report.issues {
            info!("  - {}", issue);
        }
    }

    info!("Validated games: {}", csv_path.display());
    info!("Report: {}", json_path.display());
    Ok(())
}
