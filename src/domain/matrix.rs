//! Square "depends on" matrix over tasks
//!
//! Rows and columns are the distinct summaries of non-epic records in order
//! of first occurrence. Cell `(t, d)` is set when `d` is one of `t`'s
//! resolved dependencies.

use serde::Serialize;
use std::collections::HashMap;

use super::record::{TaskRecord, DEFAULT_DEPENDENCY_SEPARATOR};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyMatrix {
    labels: Vec<String>,
    cells: Vec<Vec<bool>>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl DependencyMatrix {
    /// Builds the matrix using the default dependency separator
    pub fn from_records(records: &[TaskRecord]) -> Self {
        Self::from_records_with_separator(records, DEFAULT_DEPENDENCY_SEPARATOR)
    }

    pub fn from_records_with_separator(records: &[TaskRecord], separator: &str) -> Self {
        let mut matrix = Self::default();

        for record in records.iter().filter(|r| !r.issue_kind.is_epic()) {
            if !matrix.index.contains_key(&record.summary) {
                matrix.index.insert(record.summary.clone(), matrix.labels.len());
                matrix.labels.push(record.summary.clone());
            }
        }

        let size = matrix.labels.len();
        matrix.cells = vec![vec![false; size]; size];

        for record in records.iter().filter(|r| !r.issue_kind.is_epic()) {
            let Some(&row) = matrix.index.get(&record.summary) else {
                continue;
            };
            for name in record.dependency_names(separator) {
                if let Some(&col) = matrix.index.get(name) {
                    matrix.cells[row][col] = true;
                }
            }
        }

        matrix
    }

    /// Row and column labels
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the cell for `task` depending on `dependency`, if both are in the matrix
    pub fn get(&self, task: &str, dependency: &str) -> Option<bool> {
        let row = *self.index.get(task)?;
        let col = *self.index.get(dependency)?;
        Some(self.cells[row][col])
    }

    /// Returns the row for a task
    pub fn row(&self, task: &str) -> Option<&[bool]> {
        self.index.get(task).map(|&row| self.cells[row].as_slice())
    }

    /// Rows paired with their labels
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[bool])> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(Vec::as_slice))
    }

    /// Number of rows (and columns)
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of set cells
    pub fn count_set(&self) -> usize {
        self.cells.iter().flatten().filter(|&&cell| cell).count()
    }

    /// Renders the matrix as a tab-separated table of `1`/`0` cells
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push('\t');
        out.push_str(&self.labels.join("\t"));
        out.push('\n');
        for (label, row) in self.rows() {
            out.push_str(label);
            for &cell in row {
                out.push('\t');
                out.push(if cell { '1' } else { '0' });
            }
            out.push('\n');
        }
        out
    }
}

/// Builds the dependency matrix for `records`
pub fn build_matrix(records: &[TaskRecord]) -> DependencyMatrix {
    DependencyMatrix::from_records(records)
}
