//! Tabular projection of records
//!
//! One row per record, in input order, ready for display or CSV export.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::record::TaskRecord;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush CSV output: {0}")]
    Io(#[from] std::io::Error),
}

/// Column headers, in export order
pub const COLUMNS: [&str; 5] = ["Summary", "IssueType", "EpicName", "StoryPoints", "Dependencies"];

/// A flat table row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(rename = "Summary", default)]
    pub summary: String,
    #[serde(rename = "IssueType", default)]
    pub issue_type: String,
    #[serde(rename = "EpicName", default)]
    pub epic_name: String,
    #[serde(rename = "StoryPoints", default)]
    pub story_points: String,
    #[serde(rename = "Dependencies", default)]
    pub dependencies: String,
}

impl From<&TaskRecord> for TableRow {
    fn from(record: &TaskRecord) -> Self {
        Self {
            summary: record.summary.clone(),
            issue_type: record.issue_type.clone(),
            epic_name: record.epic_name.clone(),
            story_points: record.story_points.clone(),
            dependencies: record.dependencies.clone(),
        }
    }
}

impl TableRow {
    /// Cells in column order
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.summary,
            &self.issue_type,
            &self.epic_name,
            &self.story_points,
            &self.dependencies,
        ]
    }
}

/// Projects records into table rows
pub fn to_table(records: &[TaskRecord]) -> Vec<TableRow> {
    records.iter().map(TableRow::from).collect()
}

/// Writes rows as CSV with a header line
pub fn write_csv<W: Write>(rows: &[TableRow], writer: W) -> Result<(), TableError> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(COLUMNS)?;
    for row in rows {
        csv_writer.write_record(row.cells())?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Serializes rows to a CSV string
pub fn to_csv_string(rows: &[TableRow]) -> Result<String, TableError> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Reads rows back from CSV produced by [`write_csv`]
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<TableRow>, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut rows = Vec::new();
    for row in csv_reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
