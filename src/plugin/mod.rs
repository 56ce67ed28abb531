//! # Plugin System
//!
//! The external collaborators of the meeting pipeline are plugins:
//! separate binaries speaking JSON over stdin/stdout, so any language can
//! implement one.
//!
//! ## Roles
//!
//! | Role | Operation | Returns |
//! |------|-----------|---------|
//! | Transcriber | `transcribe` | `{"text": ...}` |
//! | Summarizer | `summarize` | `{"text": ...}` |
//! | Breakdown | `breakdown` | `{"text": ...}` |
//! | Publisher | `publish` | `{"status": ..., "url": ...}` |
//!
//! One binary may serve several roles. Which plugin serves which stage is
//! set in the `[services]` section of `.backlog/config.toml`.
//!
//! ## Plugin Discovery
//!
//! Plugins are binaries named `backlog-{name}`, found in:
//! 1. `.backlog/plugins/` - Project-local plugins
//! 2. `$PATH` - System-wide plugins
//!
//! ## Protocol
//!
//! ```text
//! CLI                          Plugin Binary
//!  │                               │
//!  ├── Spawn: backlog-whisper      │
//!  │                               │
//!  ├── Stdin: {"operation": "transcribe", "params": {...}}
//!  │                               │
//!  └── Stdout: {"success": true, "data": {"text": "..."}}
//! ```
//!
//! Every plugin should support `--manifest` to declare its roles, and the
//! `test` operation for connectivity checks.

mod loader;
mod protocol;
mod services;

pub use loader::{PluginInfo, PluginLoader, PLUGIN_PREFIX};
pub use protocol::{PluginManifest, PluginRequest, PluginResponse, PluginRole};
pub use services::PluginService;
