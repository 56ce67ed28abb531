//! Pipeline state passed between stages
//!
//! The state is an immutable value: every stage consumes it and hands back
//! a new one with its own output filled in.

use serde::Serialize;

use crate::domain::{ParseReport, SkippedLine};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineState {
    transcript: Option<String>,
    summary: Option<String>,
    breakdown: Option<String>,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing transcript, skipping transcription
    pub fn from_transcript(transcript: impl Into<String>) -> Self {
        Self::new().with_transcript(transcript)
    }

    pub fn with_transcript(self, transcript: impl Into<String>) -> Self {
        Self {
            transcript: Some(transcript.into()),
            ..self
        }
    }

    pub fn with_summary(self, summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..self
        }
    }

    pub fn with_breakdown(self, breakdown: impl Into<String>) -> Self {
        Self {
            breakdown: Some(breakdown.into()),
            ..self
        }
    }

    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn breakdown(&self) -> Option<&str> {
        self.breakdown.as_deref()
    }
}

/// What came of parsing the generator's response
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BreakdownOutcome {
    /// At least one record was parsed
    Parsed { report: ParseReport },
    /// The response held no usable line
    Unusable {
        nonempty_lines: usize,
        skipped: Vec<SkippedLine>,
    },
}

impl BreakdownOutcome {
    pub fn from_report(report: ParseReport) -> Self {
        if report.records.is_empty() {
            BreakdownOutcome::Unusable {
                nonempty_lines: report.nonempty_lines,
                skipped: report.skipped,
            }
        } else {
            BreakdownOutcome::Parsed { report }
        }
    }

    pub fn report(&self) -> Option<&ParseReport> {
        match self {
            BreakdownOutcome::Parsed { report } => Some(report),
            BreakdownOutcome::Unusable { .. } => None,
        }
    }
}
