use crate::error::Result;
use crate::models::ValidationReport;
use chrono::{DateTime, Utc};
use game_validator::{BatchReport, CanonicalGameRecord};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// CSV and JSON output paths for an input file, stamped with the run time
///
/// Files go next to the input unless `out_dir` is given:
/// `<stem>_validated_<YYYYmmdd_HHMMSS>.csv` and `.json`.
pub fn output_paths(input: &Path, out_dir: Option<&Path>, at: DateTime<Utc>) -> (PathBuf, PathBuf) {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("games");
    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    let base = format!("{}_validated_{}", stem, at.format("%Y%m%d_%H%M%S"));
    (dir.join(format!("{base}.csv")), dir.join(format!("{base}.json")))
}

/// Write validated games as CSV with the scraper headers
pub fn write_games_csv<W: Write>(writer: W, games: &[CanonicalGameRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for game in games {
        writer.serialize(game)?;
    }
    writer.flush()?;
    Ok(())
}

/// Save validated games to a CSV file
pub fn save_games_csv<P: AsRef<Path>>(path: P, games: &[CanonicalGameRecord]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_games_csv(BufWriter::new(file), games)?;
    info!("Saved {} validated games to {}", games.len(), path.as_ref().display());
    Ok(())
}

/// Save the batch report as pretty JSON
pub fn save_report<P: AsRef<Path>>(
    path: P,
    report: &BatchReport,
    validated_at: DateTime<Utc>,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &ValidationReport::new(report, validated_at))?;
    writer.flush()?;
    info!("Saved validation report to {}", path.as_ref().display());
    Ok(())
}
