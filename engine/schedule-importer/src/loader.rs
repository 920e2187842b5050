//! Reading scraped game rows from disk
//!
//! CSV files use the scraper headers (`date`, `homeTeam`, ...; snake_case is
//! accepted too). Empty cells are treated as absent values and short rows are
//! padded with absent values. Rows the CSV reader cannot decode are skipped and
//! reported with their line number. JSON files hold an array of game objects;
//! elements that are not game objects are skipped and reported by position.

use crate::error::{ImporterError, Result};
use game_validator::RawGameRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// A row that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line in the input file, when known
    pub line: Option<u64>,
    /// 1-based position in a JSON array
    pub element: Option<usize>,
    pub reason: String,
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.element) {
            (_, Some(element)) => write!(f, "element {element}: {}", self.reason),
            (Some(line), None) => write!(f, "line {line}: {}", self.reason),
            (None, None) => write!(f, "{}", self.reason),
        }
    }
}

/// Raw records read from one input
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub records: Vec<RawGameRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Load raw records, picking the format from the file extension
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<LoadedRecords> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let loaded = match extension.as_str() {
        "csv" => read_csv(File::open(path)?)?,
        "json" => read_json(File::open(path)?)?,
        _ => {
            return Err(ImporterError::unsupported_input(format!(
                "expected a .csv or .json file: {}",
                path.display()
            )))
        }
    };

    info!(
        "Loaded {} records from {} ({} skipped)",
        loaded.records.len(),
        path.display(),
        loaded.skipped.len()
    );
    Ok(loaded)
}

/// Read raw records from CSV with a header row
pub fn read_csv<R: Read>(reader: R) -> Result<LoadedRecords> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut loaded = LoadedRecords::default();
    for result in reader.records() {
        match result {
            Ok(row) => {
                let record: RawGameRecord = headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| (header, row.get(i).filter(|cell| !cell.is_empty())))
                    .collect();
                loaded.records.push(record);
            }
            Err(e) => {
                let line = e.position().map(|p| p.line());
                warn!("Skipping unreadable CSV row at line {:?}: {}", line, e);
                loaded.skipped.push(SkippedRow { line, element: None, reason: e.to_string() });
            }
        }
    }
    Ok(loaded)
}

/// Read raw records from a JSON array of objects
///
/// Only a malformed document or a top level other than an array fails the
/// whole read.
pub fn read_json<R: Read>(reader: R) -> Result<LoadedRecords> {
    let values: Vec<serde_json::Value> = serde_json::from_reader(reader)?;

    let mut loaded = LoadedRecords::default();
    for (i, value) in values.into_iter().enumerate() {
        match RawGameRecord::deserialize(value) {
            Ok(record) => loaded.records.push(record),
            Err(e) => {
                let element = i + 1;
                warn!("Skipping unreadable JSON element {}: {}", element, e);
                loaded.skipped.push(SkippedRow { line: None, element: Some(element), reason: e.to_string() });
            }
        }
    }
    Ok(loaded)
}
