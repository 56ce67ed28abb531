//! Breakdown commands (parse, graph, matrix, table)
//!
//! These commands work on breakdown text from a file or stdin and need no
//! project, though they pick up `[parser]` settings from one when present.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use super::output::Output;
use crate::domain::{
    duplicate_summaries, to_table, write_csv, BreakdownParser, DependencyGraph, DependencyMatrix,
    LineSchema, ParseReport, WarningKind,
};
use crate::storage::Config;

/// Where breakdown text comes from and how to read it
#[derive(Args, Debug, Clone)]
pub struct BreakdownInput {
    /// Breakdown file ("-" or omitted reads stdin)
    pub input: Option<PathBuf>,

    /// Line schema (overrides parser.schema from config)
    #[arg(long, value_enum)]
    pub schema: Option<LineSchema>,
}

/// Parsed input plus the settings it was parsed with
pub(super) struct Loaded {
    pub report: ParseReport,
    pub separator: String,
}

impl BreakdownInput {
    fn read_text(&self) -> Result<String> {
        match self.input.as_deref() {
            Some(path) if path != Path::new("-") => fs::read_to_string(path)
                .with_context(|| format!("Failed to read breakdown: {}", path.display())),
            _ => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read breakdown from stdin")?;
                Ok(text)
            }
        }
    }

    pub(super) fn load(&self, output: &Output) -> Result<Loaded> {
        let config = Config::load()?;
        let schema = self.schema.unwrap_or(config.project.parser.schema);
        output.verbose_ctx("parse", &format!("Using schema: {}", schema));

        let text = self.read_text()?;
        let report = BreakdownParser::new(schema).parse_with_sink(&text, |skipped| {
            output.verbose_ctx(
                "parse",
                &format!("Skipped line {}: {}", skipped.line_number, skipped.reason),
            );
        });

        output.verbose_ctx(
            "parse",
            &format!(
                "{} record(s) from {} non-empty line(s)",
                report.records.len(),
                report.nonempty_lines
            ),
        );
        warn_about(output, &report);

        Ok(Loaded {
            report,
            separator: config.project.parser.dependency_separator,
        })
    }
}

/// Surfaces name collisions and malformed fields
pub(super) fn warn_about(output: &Output, report: &ParseReport) {
    for name in duplicate_summaries(&report.records) {
        output.warn(&format!(
            "'{}' names more than one record; graph and matrix merge them",
            name
        ));
    }

    for warning in &report.warnings {
        match &warning.kind {
            WarningKind::MissingSeparator { field } => output.verbose_ctx(
                "parse",
                &format!("Line {}: field '{}' has no value separator", warning.line_number, field),
            ),
            WarningKind::NonConforming => output.verbose_ctx(
                "parse",
                &format!("Line {}: labels do not follow the schema", warning.line_number),
            ),
        }
    }
}

/// Prints parsed records
pub(super) fn print_records(output: &Output, report: &ParseReport) {
    if output.is_json() {
        output.data(report);
        return;
    }

    if report.records.is_empty() {
        println!("No records parsed.");
    } else {
        println!(
            "{:<6} {:<32} {:<8} {:<20} {:<6} DEPENDENCIES",
            "ID", "SUMMARY", "TYPE", "EPIC", "POINTS"
        );
        println!("{}", "-".repeat(90));
        for record in &report.records {
            println!(
                "{:<6} {:<32} {:<8} {:<20} {:<6} {}",
                record.id.to_string(),
                record.summary,
                record.issue_type,
                record.epic_name,
                record.story_points,
                record.dependencies
            );
        }
    }

    println!();
    println!(
        "Parsed {} record(s), skipped {} line(s)",
        report.records.len(),
        report.skipped_count()
    );
}

pub fn parse(output: &Output, input: &BreakdownInput) -> Result<()> {
    let loaded = input.load(output)?;
    print_records(output, &loaded.report);
    Ok(())
}

pub fn graph(output: &Output, input: &BreakdownInput, dot: bool) -> Result<()> {
    let loaded = input.load(output)?;
    let graph = DependencyGraph::from_records_with_separator(&loaded.report.records, &loaded.separator);
    output.verbose_ctx(
        "graph",
        &format!("{} node(s), {} edge(s)", graph.len(), graph.edge_count()),
    );

    if dot {
        print!("{}", graph.to_dot());
        return Ok(());
    }

    let nodes: Vec<_> = graph.nodes().collect();
    let edges = graph.edges();

    if output.is_json() {
        output.data(&serde_json::json!({
            "nodes": nodes,
            "edges": edges,
            "has_cycle": graph.has_cycle(),
        }));
    } else if graph.is_empty() {
        println!("Graph is empty.");
    } else {
        println!("Nodes ({}):", nodes.len());
        for node in &nodes {
            println!("  {} [{}]", node.name, node.kind);
        }
        println!();
        println!("Edges ({}):", edges.len());
        for edge in &edges {
            println!("  {} -> {} [{}]", edge.from, edge.to, edge.kind);
        }
        if graph.has_cycle() {
            println!();
            println!("Note: the dependencies contain a cycle");
        }
    }

    Ok(())
}

pub fn matrix(output: &Output, input: &BreakdownInput) -> Result<()> {
    let loaded = input.load(output)?;
    let matrix = DependencyMatrix::from_records_with_separator(&loaded.report.records, &loaded.separator);
    output.verbose_ctx(
        "matrix",
        &format!("{} task(s), {} dependency cell(s) set", matrix.len(), matrix.count_set()),
    );

    if output.is_json() {
        output.data(&matrix);
    } else if matrix.is_empty() {
        println!("No tasks to tabulate.");
    } else {
        print!("{}", matrix.to_text());
    }

    Ok(())
}

pub fn table(output: &Output, input: &BreakdownInput, csv: bool, out_path: Option<&Path>) -> Result<()> {
    let loaded = input.load(output)?;
    let rows = to_table(&loaded.report.records);

    if let Some(path) = out_path {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_csv(&rows, file).with_context(|| format!("Failed to write {}", path.display()))?;

        if output.is_json() {
            output.data(&serde_json::json!({
                "path": path.display().to_string(),
                "rows": rows.len(),
            }));
        } else {
            output.success(&format!("Wrote {} row(s) to {}", rows.len(), path.display()));
        }
        return Ok(());
    }

    if csv {
        write_csv(&rows, io::stdout().lock()).context("Failed to write CSV")?;
    } else if output.is_json() {
        output.data(&rows);
    } else {
        println!(
            "{:<32} {:<10} {:<20} {:<12} DEPENDENCIES",
            "SUMMARY", "ISSUETYPE", "EPICNAME", "STORYPOINTS"
        );
        println!("{}", "-".repeat(90));
        for row in &rows {
            let [summary, issue_type, epic, points, deps] = row.cells();
            println!("{:<32} {:<10} {:<20} {:<12} {}", summary, issue_type, epic, points, deps);
        }
    }

    Ok(())
}
