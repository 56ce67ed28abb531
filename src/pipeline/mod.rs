//! # Meeting Pipeline
//!
//! Drives a recording through the external collaborators and into the
//! breakdown parser:
//!
//! ```text
//! audio ──transcribe──▶ transcript ──summarize──▶ summary ──breakdown──▶ raw text ──parse──▶ records
//!                                                    │
//!                                                    └──publish (optional)──▶ wiki page
//! ```
//!
//! Each stage takes a [`PipelineState`] and returns a new one. Collaborator
//! failures surface as [`ServiceError`]; a response that parses to nothing
//! surfaces as [`PipelineError::NoUsableBreakdown`]. Nothing is retried.

mod services;
mod state;

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{BreakdownParser, ParseReport, SkippedLine};

pub use services::{
    BreakdownGenerator, PagePublisher, PageUpdate, PublishStatus, ServiceError, Stage,
    Summarizer, Transcriber,
};
pub use state::{BreakdownOutcome, PipelineState};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("No usable breakdown could be parsed from the service response ({} non-empty line(s), none matched)", .nonempty_lines)]
    NoUsableBreakdown {
        nonempty_lines: usize,
        skipped: Vec<SkippedLine>,
    },

    #[error("The {0} stage needs {1} from an earlier stage")]
    MissingInput(Stage, &'static str),
}

/// Free-text context handed to the language-model stages
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub summary: String,
    pub breakdown: String,
}

/// Result of a full run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub state: PipelineState,
    pub report: ParseReport,
}

/// The collaborators a run needs, plus the parser for the generator's output
pub struct Pipeline<'a> {
    transcriber: &'a dyn Transcriber,
    summarizer: &'a dyn Summarizer,
    generator: &'a dyn BreakdownGenerator,
    parser: BreakdownParser,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        transcriber: &'a dyn Transcriber,
        summarizer: &'a dyn Summarizer,
        generator: &'a dyn BreakdownGenerator,
        parser: BreakdownParser,
    ) -> Self {
        Self {
            transcriber,
            summarizer,
            generator,
            parser,
        }
    }

    pub fn transcribe(&self, state: PipelineState, audio: &Path) -> Result<PipelineState, PipelineError> {
        info!(audio = %audio.display(), "Transcribing recording");
        let transcript = self.transcriber.transcribe(audio)?;
        debug!(chars = transcript.len(), "Transcription complete");
        Ok(state.with_transcript(transcript))
    }

    pub fn summarize(&self, state: PipelineState, context: &str) -> Result<PipelineState, PipelineError> {
        let transcript = state
            .transcript()
            .ok_or(PipelineError::MissingInput(Stage::Summarization, "a transcript"))?;

        info!("Summarizing transcript");
        let summary = self.summarizer.summarize(transcript, context)?;
        Ok(state.with_summary(summary))
    }

    /// Generates and parses the breakdown
    ///
    /// A response with no usable line is a successful call with an
    /// [`BreakdownOutcome::Unusable`] outcome, not an error.
    pub fn breakdown(
        &self,
        state: PipelineState,
        context: &str,
    ) -> Result<(PipelineState, BreakdownOutcome), PipelineError> {
        let summary = state
            .summary()
            .ok_or(PipelineError::MissingInput(Stage::Breakdown, "a summary"))?;

        info!(schema = %self.parser.schema(), "Generating breakdown");
        let raw = self.generator.generate(summary, context, self.parser.schema())?;
        let report = self.parser.parse_with_report(&raw);
        debug!(
            records = report.records.len(),
            skipped = report.skipped.len(),
            "Parsed breakdown"
        );

        Ok((state.with_breakdown(raw), BreakdownOutcome::from_report(report)))
    }

    /// Runs every stage after transcription, starting from `state`
    pub fn run_from(&self, state: PipelineState, context: &RunContext) -> Result<PipelineRun, PipelineError> {
        let state = self.summarize(state, &context.summary)?;
        let (state, outcome) = self.breakdown(state, &context.breakdown)?;

        match outcome {
            BreakdownOutcome::Parsed { report } => Ok(PipelineRun { state, report }),
            BreakdownOutcome::Unusable {
                nonempty_lines,
                skipped,
            } => Err(PipelineError::NoUsableBreakdown {
                nonempty_lines,
                skipped,
            }),
        }
    }

    /// Runs the whole pipeline on a recording
    pub fn run(&self, audio: &Path, context: &RunContext) -> Result<PipelineRun, PipelineError> {
        let state = self.transcribe(PipelineState::new(), audio)?;
        self.run_from(state, context)
    }
}

/// Publishes the run's summary to a wiki page
pub fn publish_summary(
    publisher: &dyn PagePublisher,
    state: &PipelineState,
    page_id: &str,
    title: &str,
) -> Result<PublishStatus, PipelineError> {
    let content = state
        .summary()
        .ok_or(PipelineError::MissingInput(Stage::Publishing, "a summary"))?;

    info!(page_id, "Publishing summary");
    let update = PageUpdate {
        page_id: page_id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
    };
    Ok(publisher.update_page(&update)?)
}
