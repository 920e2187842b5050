use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Date format used by scraped schedules and stored records
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A game row exactly as a scraper produced it
///
/// Every field is optional and string-typed; nothing here has been checked.
/// Field names follow the scraper CSV headers (`homeTeam`, ...) and also accept
/// their snake_case spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGameRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,

    #[serde(alias = "home_team", deserialize_with = "lenient_string")]
    pub home_team: Option<String>,

    #[serde(alias = "away_team", deserialize_with = "lenient_string")]
    pub away_team: Option<String>,

    #[serde(alias = "home_score", deserialize_with = "lenient_string")]
    pub home_score: Option<String>,

    #[serde(alias = "away_score", deserialize_with = "lenient_string")]
    pub away_score: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub result: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub time: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub stadium: Option<String>,

    /// Where the row was scraped from (carried through untouched)
    #[serde(deserialize_with = "lenient_string")]
    pub source: Option<String>,
}

impl RawGameRecord {
    /// Create a raw record holding only the identifying fields
    pub fn new(date: &str, home_team: &str, away_team: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            home_team: Some(home_team.to_string()),
            away_team: Some(away_team.to_string()),
            ..Default::default()
        }
    }

    /// Set both scores
    pub fn with_scores(mut self, home: impl ToString, away: impl ToString) -> Self {
        self.home_score = Some(home.to_string());
        self.away_score = Some(away.to_string());
        self
    }

    /// Set the result code
    pub fn with_result(mut self, result: &str) -> Self {
        self.result = Some(result.to_string());
        self
    }

    /// Set the status label
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    /// Set the time of day
    pub fn with_time(mut self, time: &str) -> Self {
        self.time = Some(time.to_string());
        self
    }

    /// Set the scraped stadium
    pub fn with_stadium(mut self, stadium: &str) -> Self {
        self.stadium = Some(stadium.to_string());
        self
    }

    /// Set a field by its scraper key; unknown keys are ignored
    ///
    /// Returns `false` when the key is not a game field.
    pub fn set_field(&mut self, key: &str, value: Option<String>) -> bool {
        let slot = match key {
            "date" => &mut self.date,
            "homeTeam" | "home_team" => &mut self.home_team,
            "awayTeam" | "away_team" => &mut self.away_team,
            "homeScore" | "home_score" => &mut self.home_score,
            "awayScore" | "away_score" => &mut self.away_score,
            "result" => &mut self.result,
            "status" => &mut self.status,
            "time" => &mut self.time,
            "stadium" => &mut self.stadium,
            "source" => &mut self.source,
            _ => return false,
        };
        *slot = value;
        true
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, Option<V>)> for RawGameRecord {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut record = Self::default();
        for (key, value) in iter {
            record.set_field(key.as_ref(), value.map(Into::into));
        }
        record
    }
}

/// Accept strings, numbers and booleans for a string field; `null` maps to `None`.
///
/// Scrapers write scores as JSON numbers while CSV hands us strings.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Outcome of a finished game
///
/// Serialized with the numeric codes the stored tables use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "0")]
    Draw,
    #[serde(rename = "1")]
    HomeWin,
    #[serde(rename = "2")]
    AwayWin,
}

impl GameResult {
    /// Derive the result from a final score
    pub fn from_scores(home: u8, away: u8) -> Self {
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => GameResult::HomeWin,
            std::cmp::Ordering::Less => GameResult::AwayWin,
            std::cmp::Ordering::Equal => GameResult::Draw,
        }
    }

    /// Stored result code
    pub fn code(&self) -> &'static str {
        match self {
            GameResult::Draw => "0",
            GameResult::HomeWin => "1",
            GameResult::AwayWin => "2",
        }
    }

    /// Same game seen from the other side
    pub fn inverted(&self) -> Self {
        match self {
            GameResult::Draw => GameResult::Draw,
            GameResult::HomeWin => GameResult::AwayWin,
            GameResult::AwayWin => GameResult::HomeWin,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Lifecycle state of a fixture
///
/// Serialized with the labels the stored tables use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    #[serde(rename = "예정")]
    Scheduled,
    #[serde(rename = "진행중")]
    InProgress,
    #[serde(rename = "종료")]
    Finished,
    #[serde(rename = "취소")]
    Cancelled,
    #[serde(rename = "연기")]
    Postponed,
}

impl GameStatus {
    pub const ALL: [GameStatus; 5] = [
        GameStatus::Scheduled,
        GameStatus::InProgress,
        GameStatus::Finished,
        GameStatus::Cancelled,
        GameStatus::Postponed,
    ];

    /// Stored status label
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "예정",
            GameStatus::InProgress => "진행중",
            GameStatus::Finished => "종료",
            GameStatus::Cancelled => "취소",
            GameStatus::Postponed => "연기",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A game record after normalization
///
/// Team and date fields stay strings: when a value cannot be canonicalized the
/// scraped text is kept so callers can see what was actually on the page.
/// Scores are both present or both absent unless one of them was out of range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalGameRecord {
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u8>,
    pub away_score: Option<u8>,
    pub result: Option<GameResult>,
    pub status: GameStatus,
    /// Local kickoff time, `HH:MM`
    pub time: String,
    pub stadium: Option<String>,
    pub source: Option<String>,
}

impl CanonicalGameRecord {
    /// Parsed calendar date, if the date field is well formed
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }

    /// Parsed kickoff time, if the time field is well formed
    pub fn kickoff(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.time, "%H:%M").ok()
    }

    /// Kickoff as a UTC instant, given the offset the schedule was published in
    pub fn start_time(&self, offset: FixedOffset) -> Option<DateTime<Utc>> {
        let local = self.calendar_date()?.and_time(self.kickoff()?);
        offset
            .from_local_datetime(&local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// Render back into the raw form a scraper would have produced
    pub fn to_raw(&self) -> RawGameRecord {
        RawGameRecord {
            date: Some(self.date.clone()),
            home_team: Some(self.home_team.clone()),
            away_team: Some(self.away_team.clone()),
            home_score: self.home_score.map(|s| s.to_string()),
            away_score: self.away_score.map(|s| s.to_string()),
            result: self.result.map(|r| r.code().to_string()),
            status: Some(self.status.label().to_string()),
            time: Some(self.time.clone()),
            stadium: self.stadium.clone(),
            source: self.source.clone(),
        }
    }
}

impl fmt::Display for CanonicalGameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} vs {}", self.date, self.time, self.away_team, self.home_team)?;
        if let (Some(home), Some(away)) = (self.home_score, self.away_score) {
            write!(f, " ({away}:{home})")?;
        }
        Ok(())
    }
}
