//! Task record domain model
//!
//! A record is one line of a generated breakdown: an epic or a task with its
//! owning epic, story points and named dependencies. Relationships between
//! records are expressed purely through summary names.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RecordIdError {
    #[error("Invalid record ID format: expected 'r-{{sequence}}', got '{0}'")]
    InvalidFormat(String),
}

/// Synthetic record identifier in the format `r-{sequence}`
///
/// Assigned at parse time in output order, so two records sharing a summary
/// can still be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(u32);

impl RecordId {
    pub fn new(sequence: u32) -> Self {
        Self(sequence)
    }

    pub fn sequence(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r-{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = RecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        s.strip_prefix("r-")
            .and_then(|seq| seq.parse::<u32>().ok())
            .map(Self)
            .ok_or_else(|| RecordIdError::InvalidFormat(s.to_string()))
    }
}

impl TryFrom<String> for RecordId {
    type Error = RecordIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.to_string()
    }
}

/// Kind of backlog item
///
/// Unrecognized values are kept verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IssueKind {
    Task,
    Epic,
    Other(String),
}

impl IssueKind {
    /// Recognizes `Task` and `Epic` case-insensitively, anything else passes through
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("task") {
            IssueKind::Task
        } else if trimmed.eq_ignore_ascii_case("epic") {
            IssueKind::Epic
        } else {
            IssueKind::Other(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IssueKind::Task => "Task",
            IssueKind::Epic => "Epic",
            IssueKind::Other(s) => s,
        }
    }

    pub fn is_epic(&self) -> bool {
        matches!(self, IssueKind::Epic)
    }

    pub fn is_task(&self) -> bool {
        matches!(self, IssueKind::Task)
    }
}

impl Default for IssueKind {
    fn default() -> Self {
        IssueKind::Other(String::new())
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for IssueKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IssueKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(IssueKind::parse(&s))
    }
}

/// Separator used between dependency names in the `Dependencies` field
pub const DEFAULT_DEPENDENCY_SEPARATOR: &str = "; ";

/// One epic or task taken from a breakdown line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: RecordId,
    pub summary: String,
    /// Issue type text exactly as written on the line
    #[serde(default)]
    pub issue_type: String,
    pub issue_kind: IssueKind,
    #[serde(default)]
    pub epic_name: String,
    #[serde(default)]
    pub story_points: String,
    #[serde(default)]
    pub dependencies: String,
}

impl TaskRecord {
    /// Creates a record whose issue type text is the kind's canonical name
    pub fn new(id: RecordId, summary: impl Into<String>, issue_kind: IssueKind) -> Self {
        Self {
            id,
            summary: summary.into(),
            issue_type: issue_kind.as_str().to_string(),
            issue_kind,
            epic_name: String::new(),
            story_points: String::new(),
            dependencies: String::new(),
        }
    }

    pub fn with_issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = issue_type.into();
        self
    }

    pub fn with_epic(mut self, epic_name: impl Into<String>) -> Self {
        self.epic_name = epic_name.into();
        self
    }

    pub fn with_story_points(mut self, points: impl Into<String>) -> Self {
        self.story_points = points.into();
        self
    }

    pub fn with_dependencies(mut self, dependencies: impl Into<String>) -> Self {
        self.dependencies = dependencies.into();
        self
    }

    /// Splits the dependency field into trimmed, non-empty names
    pub fn dependency_names<'a>(&'a self, separator: &'a str) -> impl Iterator<Item = &'a str> {
        split_dependencies(&self.dependencies, separator)
    }

    /// Story points as a number, if the free text holds one
    pub fn story_points_value(&self) -> Option<f64> {
        self.story_points.trim().parse::<f64>().ok()
    }
}

/// Splits a dependency field on `separator`, trimming and dropping blanks
///
/// An empty separator falls back to the default one.
pub fn split_dependencies<'a>(field: &'a str, separator: &'a str) -> impl Iterator<Item = &'a str> {
    let separator = if separator.is_empty() {
        DEFAULT_DEPENDENCY_SEPARATOR
    } else {
        separator
    };
    let trimmed_separator = separator.trim();
    field
        .split(if trimmed_separator.is_empty() { separator } else { trimmed_separator })
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Summary names carried by more than one record, in first-occurrence order
pub fn duplicate_summaries(records: &[TaskRecord]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();

    for record in records {
        let count = counts.entry(record.summary.as_str()).or_insert(0);
        if *count == 0 {
            order.push(record.summary.as_str());
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter(|name| counts.get(name).copied().unwrap_or(0) > 1)
        .map(str::to_string)
        .collect()
}
