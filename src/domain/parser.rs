//! Breakdown text parser
//!
//! Turns the line-oriented breakdown produced by the language model into
//! [`TaskRecord`]s. Each line looks like
//!
//! ```text
//! Summary: Implement OAuth, Issue Type: Task, Epic Name: Auth, Story Points: 8, Dependencies: Design login page
//! ```
//!
//! Fields are split on `", "` and mapped by position; a field's value is the
//! text after its first `": "`. Lines with too few fields are skipped and
//! reported, never raised as errors.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::record::{IssueKind, RecordId, TaskRecord};

/// Separator between fields on a breakdown line
pub const FIELD_SEPARATOR: &str = ", ";

/// Separator between a field label and its value
pub const VALUE_SEPARATOR: &str = ": ";

const FIELD_LABELS: [&str; 5] = [
    "Summary",
    "Issue Type",
    "Epic Name",
    "Story Points",
    "Dependencies",
];

/// Accepted line shape
///
/// The schema only fixes the minimum field count. A fifth field is read as
/// the dependency list whenever it is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LineSchema {
    /// Summary, Issue Type, Epic Name, Story Points
    #[default]
    Basic,
    /// Basic fields plus Dependencies
    WithDependencies,
}

impl LineSchema {
    /// Minimum number of fields a line needs to yield a record
    pub fn min_fields(&self) -> usize {
        match self {
            LineSchema::Basic => 4,
            LineSchema::WithDependencies => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineSchema::Basic => "basic",
            LineSchema::WithDependencies => "with_dependencies",
        }
    }

    /// Example lines embedded in breakdown requests so the generator follows the grammar
    pub fn example(&self) -> &'static str {
        match self {
            LineSchema::Basic => concat!(
                "Summary: Design login page, Issue Type: Task, Epic Name: Auth, Story Points: 3\n",
                "Summary: Auth, Issue Type: Epic, Epic Name: , Story Points: ",
            ),
            LineSchema::WithDependencies => concat!(
                "Summary: Design login page, Issue Type: Task, Epic Name: Auth, Story Points: 3, Dependencies: \n",
                "Summary: Implement OAuth, Issue Type: Task, Epic Name: Auth, Story Points: 8, Dependencies: Design login page\n",
                "Summary: Auth, Issue Type: Epic, Epic Name: , Story Points: , Dependencies: ",
            ),
        }
    }
}

impl fmt::Display for LineSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "basic" => Ok(LineSchema::Basic),
            "with_dependencies" => Ok(LineSchema::WithDependencies),
            other => Err(format!(
                "Unknown line schema: {}. Use 'basic' or 'with_dependencies'",
                other
            )),
        }
    }
}

/// Expected label for each field position, matched case-insensitively
fn field_grammar() -> &'static [Regex; 5] {
    static GRAMMAR: OnceLock<[Regex; 5]> = OnceLock::new();
    GRAMMAR.get_or_init(|| {
        FIELD_LABELS.map(|label| {
            let pattern = format!("(?i)^{}:(?: |$)", regex::escape(label));
            Regex::new(&pattern).expect("grammar is built from escaped literals")
        })
    })
}

/// Why a line did not produce a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    TooFewFields { found: usize, expected: usize },
    EmptySummary,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewFields { found, expected } => {
                write!(f, "expected at least {} fields, found {}", expected, found)
            }
            SkipReason::EmptySummary => f.write_str("summary is empty"),
        }
    }
}

/// A non-empty line that yielded no record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number in the input text
    pub line_number: usize,
    pub line: String,
    pub reason: SkipReason,
}

/// Something odd about a line that still produced a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    /// A field had no `": "`; its value was taken as empty
    MissingSeparator { field: String },
    /// The line does not follow the `Label: value` grammar of the schema
    NonConforming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineWarning {
    pub line_number: usize,
    #[serde(flatten)]
    pub kind: WarningKind,
}

/// Full outcome of parsing a breakdown
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseReport {
    pub records: Vec<TaskRecord>,
    pub skipped: Vec<SkippedLine>,
    pub warnings: Vec<LineWarning>,
    /// Lines that were not blank
    pub nonempty_lines: usize,
}

impl ParseReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Line-oriented breakdown parser for a fixed schema
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakdownParser {
    schema: LineSchema,
}

impl BreakdownParser {
    pub fn new(schema: LineSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> LineSchema {
        self.schema
    }

    /// Parses text into records, silently dropping malformed lines
    pub fn parse(&self, text: &str) -> Vec<TaskRecord> {
        self.parse_with_report(text).records
    }

    /// Parses text and reports skipped lines and warnings
    pub fn parse_with_report(&self, text: &str) -> ParseReport {
        self.parse_with_sink(text, |_| {})
    }

    /// Parses text, handing every skipped line to `sink` as it is found
    pub fn parse_with_sink<F>(&self, text: &str, mut sink: F) -> ParseReport
    where
        F: FnMut(&SkippedLine),
    {
        let mut report = ParseReport::default();

        for (idx, raw) in text.split('\n').enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            if line.trim().is_empty() {
                continue;
            }
            report.nonempty_lines += 1;
            let line_number = idx + 1;

            match self.parse_line(line, line_number, &mut report.warnings) {
                Ok(mut record) => {
                    record.id = RecordId::new(report.records.len() as u32 + 1);
                    report.records.push(record);
                }
                Err(reason) => {
                    debug!(line_number, %reason, "Skipping breakdown line");
                    let skipped = SkippedLine {
                        line_number,
                        line: line.to_string(),
                        reason,
                    };
                    sink(&skipped);
                    report.skipped.push(skipped);
                }
            }
        }

        report
    }

    fn parse_line(
        &self,
        line: &str,
        line_number: usize,
        warnings: &mut Vec<LineWarning>,
    ) -> Result<TaskRecord, SkipReason> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        let expected = self.schema.min_fields();
        if fields.len() < expected {
            return Err(SkipReason::TooFewFields {
                found: fields.len(),
                expected,
            });
        }

        let grammar = field_grammar();
        let mut conforming = true;
        let mut values = [""; 5];
        for (slot, (field, label)) in fields.iter().zip(FIELD_LABELS.iter()).enumerate() {
            conforming &= grammar[slot].is_match(field);
            match field.split_once(VALUE_SEPARATOR) {
                Some((_, value)) => values[slot] = value,
                None => warnings.push(LineWarning {
                    line_number,
                    kind: WarningKind::MissingSeparator {
                        field: label.to_string(),
                    },
                }),
            }
        }

        let [summary, issue_type, epic_name, story_points, dependencies] = values;
        if summary.trim().is_empty() {
            return Err(SkipReason::EmptySummary);
        }

        if !conforming {
            warnings.push(LineWarning {
                line_number,
                kind: WarningKind::NonConforming,
            });
        }

        Ok(TaskRecord::new(RecordId::new(0), summary, IssueKind::parse(issue_type))
            .with_issue_type(issue_type)
            .with_epic(epic_name)
            .with_story_points(story_points)
            .with_dependencies(dependencies))
    }
}

/// Parses `text` with the given schema
pub fn parse(text: &str, schema: LineSchema) -> Vec<TaskRecord> {
    BreakdownParser::new(schema).parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SCENARIO: &str = "Summary: Design login page, Issue Type: Task, Epic Name: Auth, Story Points: 3, Dependencies: \nSummary: Implement OAuth, Issue Type: Task, Epic Name: Auth, Story Points: 8, Dependencies: Design login page\nSummary: Auth, Issue Type: Epic, Epic Name: , Story Points: ";

    #[test]
    fn parses_scenario() {
        let records = parse(SCENARIO, LineSchema::Basic);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].summary, "Design login page");
        assert_eq!(records[0].issue_kind, IssueKind::Task);
        assert_eq!(records[0].epic_name, "Auth");
        assert_eq!(records[0].story_points, "3");
        assert_eq!(records[0].dependencies, "");

        assert_eq!(records[1].dependencies, "Design login page");

        assert_eq!(records[2].summary, "Auth");
        assert_eq!(records[2].issue_kind, IssueKind::Epic);
        assert_eq!(records[2].epic_name, "");
        assert_eq!(records[2].story_points, "");
    }

    #[test]
    fn assigns_sequential_ids() {
        let records = parse(SCENARIO, LineSchema::Basic);
        let ids: Vec<_> = records.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["r-1", "r-2", "r-3"]);
    }

    #[test]
    fn dependency_schema_requires_five_fields() {
        let report = BreakdownParser::new(LineSchema::WithDependencies).parse_with_report(SCENARIO);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line_number, 3);
        assert_eq!(
            report.skipped[0].reason,
            SkipReason::TooFewFields { found: 4, expected: 5 }
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        let report = BreakdownParser::default().parse_with_report("");
        assert!(report.is_empty());
        assert_eq!(report.nonempty_lines, 0);

        let report = BreakdownParser::default().parse_with_report("\n\n  \n");
        assert!(report.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn prose_lines_are_skipped() {
        let text = "Here is your breakdown:\nSummary: A, Issue Type: Task, Epic Name: E, Story Points: 1\nHope this helps!";
        let report = BreakdownParser::default().parse_with_report(text);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.skipped_count(), 2);
        assert_eq!(report.nonempty_lines, 3);
    }

    #[test]
    fn sink_sees_every_skip() {
        let text = "noise\nSummary: A, Issue Type: Task, Epic Name: E, Story Points: 1\nmore noise";
        let mut seen = Vec::new();
        BreakdownParser::default().parse_with_sink(text, |s| seen.push(s.line_number));
        assert_eq!(seen, vec![1, 3]);
    }

    #[test]
    fn field_without_separator_is_empty() {
        let text = "Summary: A, Issue Type: Task, Epic Name Auth, Story Points:";
        let report = BreakdownParser::default().parse_with_report(text);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].epic_name, "");
        assert_eq!(report.records[0].story_points, "");

        let missing: Vec<_> = report
            .warnings
            .iter()
            .filter_map(|w| match &w.kind {
                WarningKind::MissingSeparator { field } => Some(field.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(missing, vec!["Epic Name", "Story Points"]);
    }

    #[test]
    fn value_is_text_after_first_separator() {
        let text = "Summary: Fix: login, Issue Type: Task, Epic Name: Auth: v2, Story Points: 2";
        let records = parse(text, LineSchema::Basic);
        assert_eq!(records[0].summary, "Fix: login");
        assert_eq!(records[0].epic_name, "Auth: v2");
    }

    #[test]
    fn empty_summary_is_skipped() {
        let text = "Summary: , Issue Type: Task, Epic Name: Auth, Story Points: 2";
        let report = BreakdownParser::default().parse_with_report(text);
        assert!(report.records.is_empty());
        assert_eq!(report.skipped[0].reason, SkipReason::EmptySummary);
    }

    #[test]
    fn unknown_issue_type_passes_through() {
        let text = "Summary: A, Issue Type: Spike, Epic Name: E, Story Points: 1";
        let records = parse(text, LineSchema::Basic);
        assert_eq!(records[0].issue_kind, IssueKind::Other("Spike".to_string()));
    }

    #[test]
    fn duplicates_are_kept() {
        let text = "Summary: Auth, Issue Type: Epic, Epic Name: , Story Points: \nSummary: Auth, Issue Type: Task, Epic Name: Auth, Story Points: 2";
        let records = parse(text, LineSchema::Basic);
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].id, records[1].id);
    }

    #[test]
    fn crlf_input() {
        let text = "Summary: A, Issue Type: Task, Epic Name: E, Story Points: 1\r\nSummary: B, Issue Type: Task, Epic Name: E, Story Points: 2\r\n";
        let records = parse(text, LineSchema::Basic);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].story_points, "1");
    }

    #[test]
    fn mislabelled_line_is_flagged() {
        let text = "Title: A, Kind: Task, Epic: E, Points: 1";
        let report = BreakdownParser::default().parse_with_report(text);
        assert_eq!(report.records.len(), 1);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::NonConforming));
    }

    #[test]
    fn shifted_fields_are_flagged() {
        let text = "Summary: A, Issue Type: Task, Bogus: x, Epic Name: E, Story Points: 1";
        let report = BreakdownParser::default().parse_with_report(text);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].epic_name, "x");
        assert_eq!(report.records[0].story_points, "E");
        assert_eq!(
            report.warnings,
            vec![LineWarning {
                line_number: 1,
                kind: WarningKind::NonConforming,
            }]
        );
    }

    #[test]
    fn labels_match_case_insensitively() {
        let text = "summary: A, ISSUE TYPE: Task, epic name: E, Story points:";
        let report = BreakdownParser::default().parse_with_report(text);
        assert_eq!(report.records.len(), 1);
        assert!(!report
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::NonConforming));
    }

    #[test]
    fn issue_type_keeps_original_text() {
        let text = "Summary: A, Issue Type: task, Epic Name: E, Story Points: 1\nSummary: E, Issue Type:  EPIC , Epic Name: , Story Points: ";
        let records = parse(text, LineSchema::Basic);
        assert_eq!(records[0].issue_kind, IssueKind::Task);
        assert_eq!(records[0].issue_type, "task");
        assert_eq!(records[1].issue_kind, IssueKind::Epic);
        assert_eq!(records[1].issue_type, " EPIC ");
    }

    #[test]
    fn conforming_line_has_no_warnings() {
        let report = BreakdownParser::new(LineSchema::WithDependencies)
            .parse_with_report(LineSchema::WithDependencies.example());
        assert_eq!(report.records.len(), 3);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn schema_from_str() {
        assert_eq!("basic".parse::<LineSchema>().unwrap(), LineSchema::Basic);
        assert_eq!(
            "with-dependencies".parse::<LineSchema>().unwrap(),
            LineSchema::WithDependencies
        );
        assert!("strict".parse::<LineSchema>().is_err());
    }

    fn value_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ]{0,12}".prop_map(|s| s.trim_end().to_string())
    }

    fn line_strategy() -> impl Strategy<Value = [String; 5]> {
        (
            value_strategy(),
            prop_oneof![
                Just("Task".to_string()),
                Just("Epic".to_string()),
                Just("task".to_string()),
                Just("EPIC".to_string()),
                Just(" task".to_string()),
                Just("Epic ".to_string()),
                Just("Story".to_string()),
            ],
            value_strategy(),
            "[0-9]{0,2}",
            value_strategy(),
        )
            .prop_map(|(a, b, c, d, e)| [a, b, c, d, e])
    }

    proptest! {
        #[test]
        fn well_formed_lines_parse_one_to_one(lines in prop::collection::vec(line_strategy(), 0..20)) {
            let text = lines
                .iter()
                .map(|f| format!(
                    "Summary: {}, Issue Type: {}, Epic Name: {}, Story Points: {}, Dependencies: {}",
                    f[0], f[1], f[2], f[3], f[4]
                ))
                .collect::<Vec<_>>()
                .join("\n");

            let records = parse(&text, LineSchema::WithDependencies);
            prop_assert_eq!(records.len(), lines.len());
            for (record, fields) in records.iter().zip(lines.iter()) {
                prop_assert_eq!(&record.summary, &fields[0]);
                prop_assert_eq!(&record.issue_type, &fields[1]);
                prop_assert_eq!(record.issue_kind.clone(), IssueKind::parse(&fields[1]));
                prop_assert_eq!(&record.epic_name, &fields[2]);
                prop_assert_eq!(&record.story_points, &fields[3]);
                prop_assert_eq!(&record.dependencies, &fields[4]);
            }
        }

        #[test]
        fn arbitrary_text_never_yields_more_records_than_lines(text in "[a-zA-Z:, \n]{0,200}") {
            let report = BreakdownParser::default().parse_with_report(&text);
            let nonempty = text.split('\n').filter(|l| !l.trim().is_empty()).count();
            prop_assert!(report.records.len() <= nonempty);
            prop_assert_eq!(report.records.len() + report.skipped.len(), nonempty);
        }
    }
}
