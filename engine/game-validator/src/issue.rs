use serde::{Deserialize, Serialize};
use std::fmt;

/// What a validation issue is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Date, home team or away team is missing; the record was rejected
    MissingField,
    /// Team name is not in the valid team set
    UnknownTeam,
    /// Home and away team are the same
    SelfMatch,
    /// Date is not `YYYY-MM-DD`
    InvalidDate,
    /// Scores could not be parsed as integers
    InvalidScore,
    /// Only one of the two scores was given
    IncompleteScore,
    /// Score outside the plausible range
    ScoreOutOfRange,
    /// Result code is not recognized
    InvalidResult,
    /// Status label is not recognized
    InvalidStatus,
    /// Time of day is not `H:MM`/`HH:MM`
    InvalidTime,
    /// Scores were replaced from the reference games table
    ReferenceOverride,
    /// Same fixture already seen earlier in the batch
    Duplicate,
}

impl IssueKind {
    /// Whether an issue of this kind makes its record invalid
    pub fn is_blocking(&self) -> bool {
        !matches!(self, IssueKind::ReferenceOverride)
    }
}

/// A single diagnostic about one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// 1-based position of the record in its batch, once known
    pub record: Option<usize>,
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self { record: None, kind, message: message.into() }
    }

    /// Attach the 1-based batch position of the record
    pub fn at(mut self, record: usize) -> Self {
        self.record = Some(record);
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.kind.is_blocking()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record {
            Some(record) => write!(f, "game {record}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_reference_override_is_informational() {
        assert!(!IssueKind::ReferenceOverride.is_blocking());
        assert!(IssueKind::MissingField.is_blocking());
        assert!(IssueKind::Duplicate.is_blocking());
        assert!(IssueKind::UnknownTeam.is_blocking());
    }

    #[test]
    fn test_issue_display() {
        let issue = Issue::new(IssueKind::SelfMatch, "home and away team are both LG");
        assert_eq!(issue.to_string(), "home and away team are both LG");
        assert_eq!(issue.at(3).to_string(), "game 3: home and away team are both LG");
    }
}
