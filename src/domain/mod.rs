//! Domain models for backlog breakdowns
//!
//! Contains the pure parse -> graph/matrix/table pipeline without any I/O.

mod record;
mod parser;
mod graph;
mod matrix;
mod table;

pub use record::{
    duplicate_summaries, split_dependencies, IssueKind, RecordId, RecordIdError, TaskRecord,
    DEFAULT_DEPENDENCY_SEPARATOR,
};
pub use parser::{
    parse, BreakdownParser, LineSchema, LineWarning, ParseReport, SkipReason, SkippedLine,
    WarningKind, FIELD_SEPARATOR, VALUE_SEPARATOR,
};
pub use graph::{build_graph, DependencyGraph, EdgeKind, GraphEdge, GraphNode, NodeKind};
pub use matrix::{build_matrix, DependencyMatrix};
pub use table::{read_csv, to_csv_string, to_table, write_csv, TableError, TableRow, COLUMNS};
