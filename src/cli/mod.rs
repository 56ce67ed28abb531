//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init` |
//! | Breakdown | Records from breakdown text | `parse`, `graph`, `matrix`, `table` |
//! | Pipeline | Recording to records | `run` |
//! | Advanced | Plugins and cached responses | `plugin list`, `cache clear` |
//!
//! Breakdown commands read a file, or stdin when the path is `-` or omitted.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! backlog --verbose parse breakdown.txt
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod breakdown;
mod run;
mod plugin_cmd;
mod cache_cmd;

pub use app::{execute, run, Cli, Commands};
pub use breakdown::BreakdownInput;
pub use output::{Output, OutputFormat};
pub use run::RunArgs;
