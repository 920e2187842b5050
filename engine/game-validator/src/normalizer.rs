use crate::issue::{Issue, IssueKind};
use crate::reference::apply_reference_override;
use crate::tables::ReferenceTables;
use crate::types::{CanonicalGameRecord, GameResult, GameStatus, RawGameRecord, DATE_FORMAT};
use crate::{DEFAULT_GAME_TIME, MAX_SCORE, MIN_SCORE};
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::Serialize;
use std::num::IntErrorKind;
use std::sync::LazyLock;
use tracing::debug;

static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2}):([0-9]{2})$").expect("valid time pattern"));

/// Outcome of normalizing one raw record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// `None` only when required identifying fields were missing
    pub record: Option<CanonicalGameRecord>,
    pub issues: Vec<Issue>,
    /// No issues other than informational reference overrides
    pub valid: bool,
}

impl ValidationResult {
    fn rejected(issue: Issue) -> Self {
        Self { record: None, issues: vec![issue], valid: false }
    }

    /// Whether the record was rejected outright for missing identifying fields
    pub fn is_rejected(&self) -> bool {
        self.record.is_none()
    }
}

/// Turns raw scraped rows into canonical game records
///
/// Every step of the pipeline may add an issue; only a missing date or team
/// stops processing. The reference-game override runs last.
#[derive(Debug, Clone)]
pub struct Normalizer {
    tables: ReferenceTables,
    default_time: NaiveTime,
}

impl Normalizer {
    pub fn new(tables: ReferenceTables) -> Self {
        let default_time = NaiveTime::parse_from_str(DEFAULT_GAME_TIME, "%H:%M")
            .unwrap_or(NaiveTime::MIN);
        Self { tables, default_time }
    }

    /// Use a different time of day when the scraped one is unusable
    pub fn with_default_time(mut self, default_time: NaiveTime) -> Self {
        self.default_time = default_time;
        self
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    /// Normalize a single raw record
    pub fn normalize(&self, raw: &RawGameRecord) -> ValidationResult {
        let date = present(&raw.date);
        let home_raw = present(&raw.home_team);
        let away_raw = present(&raw.away_team);

        let (Some(date), Some(home_raw), Some(away_raw)) = (date, home_raw, away_raw) else {
            let missing: Vec<&str> = [("date", date), ("homeTeam", home_raw), ("awayTeam", away_raw)]
                .into_iter()
                .filter(|(_, value)| value.is_none())
                .map(|(name, _)| name)
                .collect();
            debug!("Rejecting record with missing field(s): {:?}", missing);
            return ValidationResult::rejected(Issue::new(
                IssueKind::MissingField,
                format!("missing required field(s): {}", missing.join(", ")),
            ));
        };

        let mut issues = Vec::new();

        let (home_team, home_key) = self.check_team(home_raw, "home", &mut issues);
        let (away_team, away_key) = self.check_team(away_raw, "away", &mut issues);

        if home_key == away_key {
            issues.push(Issue::new(
                IssueKind::SelfMatch,
                format!("a team cannot play itself: {home_key}"),
            ));
        }

        if NaiveDate::parse_from_str(date, DATE_FORMAT).is_err() {
            issues.push(Issue::new(IssueKind::InvalidDate, format!("invalid date format: {date}")));
        }

        let (home_score, away_score) = self.check_scores(raw, &mut issues);
        let derived = match (home_score, away_score) {
            (Some(home), Some(away)) => Some(GameResult::from_scores(home, away)),
            _ => None,
        };

        let result = match (derived, present(&raw.result)) {
            (Some(result), _) => Some(result),
            (None, None) => None,
            (None, Some(code)) => match self.tables.parse_result(code) {
                Some(result) => Some(result),
                None => {
                    issues.push(Issue::new(IssueKind::InvalidResult, format!("invalid result: {code}")));
                    None
                }
            },
        };

        let status = match (derived, present(&raw.status)) {
            (Some(_), _) => GameStatus::Finished,
            (None, None) => GameStatus::default(),
            (None, Some(label)) => match self.tables.parse_status(label) {
                Some(status) => status,
                None => {
                    issues.push(Issue::new(IssueKind::InvalidStatus, format!("invalid status: {label}")));
                    GameStatus::default()
                }
            },
        };

        let time = match present(&raw.time) {
            None => self.default_time,
            Some(text) => match parse_time(text) {
                Some(time) => time,
                None => {
                    issues.push(Issue::new(IssueKind::InvalidTime, format!("invalid time format: {text}")));
                    self.default_time
                }
            },
        };

        let stadium = match self.tables.stadium_for(&home_key) {
            Some(stadium) => Some(stadium.to_string()),
            None => present(&raw.stadium).map(str::to_string),
        };

        let mut record = CanonicalGameRecord {
            date: date.to_string(),
            home_team,
            away_team,
            home_score,
            away_score,
            result,
            status,
            time: time.format("%H:%M").to_string(),
            stadium,
            source: present(&raw.source).map(str::to_string),
        };

        issues.extend(apply_reference_override(&self.tables, &mut record));

        let valid = !issues.iter().any(Issue::is_blocking);
        debug!("Normalized {} (valid: {}, issues: {})", record, valid, issues.len());

        ValidationResult { record: Some(record), issues, valid }
    }

    /// Returns the value to store and the canonical key used for lookups
    ///
    /// Unknown teams keep the scraped text in the stored field.
    fn check_team(&self, scraped: &str, side: &str, issues: &mut Vec<Issue>) -> (String, String) {
        let canonical = self.tables.canonical_team(scraped);
        if self.tables.is_valid_team(&canonical) {
            (canonical.clone(), canonical)
        } else {
            issues.push(Issue::new(IssueKind::UnknownTeam, format!("unknown {side} team: {scraped}")));
            (scraped.to_string(), canonical)
        }
    }

    fn check_scores(&self, raw: &RawGameRecord, issues: &mut Vec<Issue>) -> (Option<u8>, Option<u8>) {
        match (present(&raw.home_score), present(&raw.away_score)) {
            (None, None) => (None, None),
            (Some(home), None) => {
                issues.push(Issue::new(
                    IssueKind::IncompleteScore,
                    format!("home score {home} given without away score"),
                ));
                (None, None)
            }
            (None, Some(away)) => {
                issues.push(Issue::new(
                    IssueKind::IncompleteScore,
                    format!("away score {away} given without home score"),
                ));
                (None, None)
            }
            (Some(home), Some(away)) => match (parse_score(home), parse_score(away)) {
                (Some(home_score), Some(away_score)) => (
                    check_score_range(home_score, home, "home", issues),
                    check_score_range(away_score, away, "away", issues),
                ),
                _ => {
                    issues.push(Issue::new(
                        IssueKind::InvalidScore,
                        format!("invalid score format: home={home}, away={away}"),
                    ));
                    (None, None)
                }
            },
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(ReferenceTables::default())
    }
}

/// Integer value of a score; values too large for `i64` saturate so they still read as out of range
fn parse_score(text: &str) -> Option<i64> {
    match text.trim().parse::<i64>() {
        Ok(score) => Some(score),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

fn check_score_range(score: i64, text: &str, side: &str, issues: &mut Vec<Issue>) -> Option<u8> {
    if (i64::from(MIN_SCORE)..=i64::from(MAX_SCORE)).contains(&score) {
        u8::try_from(score).ok()
    } else {
        issues.push(Issue::new(
            IssueKind::ScoreOutOfRange,
            format!("implausible {side} score: {}", text.trim()),
        ));
        None
    }
}

/// Accepts `H:MM` and `HH:MM` on a 24-hour clock
fn parse_time(text: &str) -> Option<NaiveTime> {
    let caps = TIME_PATTERN.captures(text.trim())?;
    let hour = caps[1].parse().ok()?;
    let minute = caps[2].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// A field counts as present only when it has non-blank text
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}
