//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::breakdown::{self, BreakdownInput};
use super::output::{Output, OutputFormat};
use super::run::{self as run_cmd, RunArgs};
use super::{cache_cmd, plugin_cmd};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "backlog")]
#[command(author, version, about = "Turn meeting breakdowns into backlog records, dependency graphs and tables")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to default_format from the global config)
    #[arg(long, short = 'f', global = true, env = "BACKLOG_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new backlog project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Parse breakdown text into records
    Parse {
        #[command(flatten)]
        input: BreakdownInput,
    },

    /// Show the epic and dependency graph
    Graph {
        #[command(flatten)]
        input: BreakdownInput,

        /// Print Graphviz DOT instead
        #[arg(long)]
        dot: bool,
    },

    /// Show the task dependency matrix
    Matrix {
        #[command(flatten)]
        input: BreakdownInput,
    },

    /// Show records as a table
    Table {
        #[command(flatten)]
        input: BreakdownInput,

        /// Print CSV
        #[arg(long)]
        csv: bool,

        /// Write CSV to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Transcribe, summarize and break down a meeting recording
    Run(RunArgs),

    /// Manage plugins
    #[command(subcommand)]
    Plugin(plugin_cmd::PluginCommands),

    /// Manage the response cache
    #[command(subcommand)]
    Cache(cache_cmd::CacheCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    execute(cli)
}

/// Library events go to stderr; `RUST_LOG` overrides the level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignore a subscriber that is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Executes already-parsed arguments
pub fn execute(cli: Cli) -> Result<()> {
    let format = match cli.format {
        Some(format) => format,
        None => Config::load()?.global.default_format,
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("backlog starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx("init", &format!("Created .backlog directory at: {}", project.project_dir().display()));
            output.success(&format!("Initialized backlog project at {}", project.root().display()));
        }

        Commands::Parse { input } => breakdown::parse(&output, &input)?,
        Commands::Graph { input, dot } => breakdown::graph(&output, &input, dot)?,
        Commands::Matrix { input } => breakdown::matrix(&output, &input)?,
        Commands::Table { input, csv, output: path } => {
            breakdown::table(&output, &input, csv, path.as_deref())?
        }

        Commands::Run(args) => run_cmd::run(&output, args)?,

        Commands::Plugin(cmd) => plugin_cmd::run(cmd, &output)?,
        Commands::Cache(cmd) => cache_cmd::run(cmd, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
