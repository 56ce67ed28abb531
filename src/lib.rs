//! backlog - turns meeting breakdowns into backlog records
//!
//! A breakdown is line-oriented text, one work item per line:
//!
//! ```text
//! Summary: Design login page, Issue Type: Task, Epic Name: Auth, Story Points: 3, Dependencies: Set up database
//! ```
//!
//! The [`domain`] layer parses it into [`TaskRecord`]s and derives a
//! dependency graph, a dependency matrix and a CSV-ready table. The
//! [`pipeline`] drives a meeting recording through external collaborators
//! (transcription, summarization, breakdown generation and wiki publishing),
//! which are implemented as [`plugin`]s.

pub mod domain;
pub mod storage;
pub mod plugin;
pub mod pipeline;
pub mod cli;

pub use domain::{
    BreakdownParser, DependencyGraph, DependencyMatrix, IssueKind, LineSchema, ParseReport,
    RecordId, TableRow, TaskRecord,
};
