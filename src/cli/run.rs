//! `backlog run`: recording to backlog records
//!
//! Each stage's text is saved under `.backlog/transcripts/` as soon as it is
//! produced, so a failed run still leaves the earlier texts behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use super::breakdown::{print_records, warn_about};
use super::output::Output;
use crate::domain::{BreakdownParser, LineSchema};
use crate::pipeline::{
    publish_summary, BreakdownGenerator, BreakdownOutcome, PipelineError, PipelineState,
    ServiceError, Stage, Summarizer, Transcriber, Pipeline,
};
use crate::plugin::{PluginLoader, PluginRole, PluginService};
use crate::storage::{Project, ResponseCache};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Meeting recording to transcribe
    #[arg(required_unless_present = "transcript")]
    pub audio: Option<PathBuf>,

    /// Start from an existing transcript instead of a recording
    #[arg(long, conflicts_with = "audio")]
    pub transcript: Option<PathBuf>,

    /// Extra context for the summary
    #[arg(long, default_value = "")]
    pub context: String,

    /// Extra context for the breakdown
    #[arg(long, default_value = "")]
    pub breakdown_context: String,

    /// Line schema (overrides parser.schema from config)
    #[arg(long, value_enum)]
    pub schema: Option<LineSchema>,

    /// Publish the summary to the configured wiki page
    #[arg(long)]
    pub publish: bool,

    /// Wiki page to publish to (overrides publish.page_id)
    #[arg(long)]
    pub page_id: Option<String>,

    /// Page title (overrides publish.title)
    #[arg(long)]
    pub title: Option<String>,

    /// Bypass the response cache
    #[arg(long)]
    pub no_cache: bool,
}

/// Stand-in for a stage with no plugin configured
struct Unbound {
    stage: Stage,
    setting: &'static str,
}

impl Unbound {
    fn fail(&self) -> ServiceError {
        ServiceError::new(
            self.stage,
            format!("no plugin configured; set {} in .backlog/config.toml", self.setting),
        )
    }
}

impl Transcriber for Unbound {
    fn transcribe(&self, _audio: &Path) -> Result<String, ServiceError> {
        Err(self.fail())
    }
}

impl Summarizer for Unbound {
    fn summarize(&self, _text: &str, _context: &str) -> Result<String, ServiceError> {
        Err(self.fail())
    }
}

impl BreakdownGenerator for Unbound {
    fn generate(&self, _summary: &str, _context: &str, _schema: LineSchema) -> Result<String, ServiceError> {
        Err(self.fail())
    }
}

/// Binds a stage to its configured plugin, or to [`Unbound`]
fn bind<'a>(
    loader: &'a PluginLoader,
    plugin: Option<&str>,
    role: PluginRole,
    cache: &Option<ResponseCache>,
    language: &str,
    setting: &'static str,
    stage: Stage,
) -> Binding<'a> {
    match plugin {
        Some(name) => Binding::Plugin(
            PluginService::new(loader, name, role)
                .with_cache(cache.clone())
                .with_language(language),
        ),
        None => Binding::Unbound(Unbound { stage, setting }),
    }
}

enum Binding<'a> {
    Plugin(PluginService<'a>),
    Unbound(Unbound),
}

impl Binding<'_> {
    fn transcriber(&self) -> &dyn Transcriber {
        match self {
            Binding::Plugin(p) => p,
            Binding::Unbound(u) => u,
        }
    }

    fn summarizer(&self) -> &dyn Summarizer {
        match self {
            Binding::Plugin(p) => p,
            Binding::Unbound(u) => u,
        }
    }

    fn generator(&self) -> &dyn BreakdownGenerator {
        match self {
            Binding::Plugin(p) => p,
            Binding::Unbound(u) => u,
        }
    }
}

pub fn run(output: &Output, args: RunArgs) -> Result<()> {
    let project = Project::open_current()?;
    let config = &project.config().project;
    output.verbose_ctx("run", &format!("Opened project at: {}", project.root().display()));

    let publish_target = if args.publish {
        let page_id = args
            .page_id
            .clone()
            .or_else(|| config.publish.page_id.clone())
            .ok_or_else(|| anyhow::anyhow!("No wiki page to publish to; pass --page-id or set publish.page_id"))?;
        let publisher = config
            .services
            .publisher
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No publisher plugin configured; set services.publisher in .backlog/config.toml"))?;
        let title = args.title.clone().unwrap_or_else(|| config.publish.title.clone());
        Some((publisher, page_id, title))
    } else {
        None
    };

    let mut loader = PluginLoader::new();
    loader.add_plugin_dir(project.plugins_dir());
    loader.discover()?;

    let cache = if args.no_cache || !config.cache.enabled {
        output.verbose_ctx("run", "Response cache disabled");
        None
    } else {
        Some(project.response_cache())
    };

    let services = &config.services;
    let language = services.language.as_str();
    let transcriber = bind(
        &loader,
        services.transcriber.as_deref(),
        PluginRole::Transcriber,
        &cache,
        language,
        "services.transcriber",
        Stage::Transcription,
    );
    let summarizer = bind(
        &loader,
        services.summarizer.as_deref(),
        PluginRole::Summarizer,
        &cache,
        language,
        "services.summarizer",
        Stage::Summarization,
    );
    let generator = bind(
        &loader,
        services.breakdown.as_deref(),
        PluginRole::Breakdown,
        &cache,
        language,
        "services.breakdown",
        Stage::Breakdown,
    );

    let schema = args.schema.unwrap_or(config.parser.schema);
    let pipeline = Pipeline::new(
        transcriber.transcriber(),
        summarizer.summarizer(),
        generator.generator(),
        BreakdownParser::new(schema),
    );

    let source = args
        .transcript
        .as_deref()
        .or(args.audio.as_deref())
        .ok_or_else(|| anyhow::anyhow!("Pass a recording or --transcript"))?;
    let stem = artifact_stem(source);
    let mut artifacts = Vec::new();

    let state = match &args.transcript {
        Some(path) => {
            output.verbose_ctx("run", &format!("Using transcript: {}", path.display()));
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read transcript: {}", path.display()))?;
            PipelineState::from_transcript(text)
        }
        None => {
            let state = pipeline.transcribe(PipelineState::new(), source)?;
            if let Some(text) = state.transcript() {
                artifacts.push(project.write_artifact(&stem, "transcript", text)?);
            }
            state
        }
    };

    let state = pipeline.summarize(state, &args.context)?;
    if let Some(text) = state.summary() {
        artifacts.push(project.write_artifact(&stem, "summary", text)?);
    }

    let (state, outcome) = pipeline.breakdown(state, &args.breakdown_context)?;
    if let Some(text) = state.breakdown() {
        artifacts.push(project.write_artifact(&stem, "breakdown", text)?);
    }
    for path in &artifacts {
        output.verbose_ctx("run", &format!("Wrote {}", path.display()));
    }

    let report = match outcome {
        BreakdownOutcome::Parsed { report } => report,
        BreakdownOutcome::Unusable {
            nonempty_lines,
            skipped,
        } => {
            for line in &skipped {
                output.verbose_ctx(
                    "run",
                    &format!("Skipped line {}: {}", line.line_number, line.reason),
                );
            }
            return Err(PipelineError::NoUsableBreakdown {
                nonempty_lines,
                skipped,
            }
            .into());
        }
    };

    warn_about(output, &report);

    let Some((publisher_name, page_id, title)) = publish_target else {
        print_records(output, &report);
        return Ok(());
    };

    // JSON mode prints the report together with the publish result
    if !output.is_json() {
        print_records(output, &report);
    }

    let publisher = PluginService::new(&loader, publisher_name, PluginRole::Publisher);
    let published = publish_summary(&publisher, &state, &page_id, &title);
    if output.is_json() {
        match &published {
            Ok(status) => output.data(&serde_json::json!({ "report": &report, "published": status })),
            Err(_) => print_records(output, &report),
        }
    }

    let status = published.context("Parsed records were kept, but publishing failed")?;
    if !output.is_json() {
        let target = status.url.as_deref().unwrap_or(page_id.as_str());
        output.success(&format!("Published summary to {} ({})", target, status.status));
    }

    Ok(())
}

/// File stem used to name a run's artifacts
fn artifact_stem(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "meeting".to_string());
    stem.strip_suffix(".transcript").map(str::to_string).unwrap_or(stem)
}
