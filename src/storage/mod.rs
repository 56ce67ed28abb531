//! # Storage Layer
//!
//! Project directory, configuration and the response cache.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Config | TOML | `.backlog/config.toml` |
//! | Response cache | JSONL (one entry per line) | `.backlog/cache/responses.jsonl` |
//! | Pipeline texts | Plain text | `.backlog/transcripts/{stem}.{kind}.txt` |
//!
//! ## Project Structure
//!
//! ```text
//! .backlog/
//! ├── config.toml           # Project configuration
//! ├── plugins/              # Local plugins (backlog-*)
//! ├── cache/                # Memoized service responses
//! ├── transcripts/          # Transcript, summary and breakdown texts
//! └── .gitignore            # Ignores cache and transcripts
//! ```

mod config;
mod project;
mod cache;

pub use config::{
    CacheConfig, Config, ConfigError, GlobalConfig, ParserConfig, ProjectConfig, PublishConfig,
    ServicesConfig, PROJECT_DIR,
};
pub use project::{Project, ProjectError};
pub use cache::{cache_key, file_digest, CacheEntry, CacheStats, ResponseCache};
