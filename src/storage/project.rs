//! Project management
//!
//! Handles project initialization and provides access to the project's
//! directories, configuration and response cache.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::PROJECT_DIR;
use super::{Config, ResponseCache};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a backlog project. Run 'backlog init' first.")]
    NotInProject,
}

const DEFAULT_CONFIG: &str = r#"# backlog configuration

[parser]
# "basic" needs Summary, Issue Type, Epic Name and Story Points on every line;
# "with_dependencies" also requires the Dependencies field
schema = "basic"
dependency_separator = "; "

[services]
# Plugins (executables named backlog-*) serving each pipeline stage
# transcriber = "backlog-whisper"
# summarizer = "backlog-openai"
# breakdown = "backlog-openai"
# publisher = "backlog-confluence"
language = "en"

[publish]
# page_id = "123456"
title = "Meeting Summary"

[cache]
enabled = true
"#;

const DEFAULT_GITIGNORE: &str = r#"# Memoized service responses
cache/

# Intermediate transcripts, summaries and breakdowns
transcripts/
"#;

/// A backlog project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(PROJECT_DIR).is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path; existing files are kept
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let project_dir = root.join(PROJECT_DIR);

        for dir in [
            project_dir.clone(),
            project_dir.join("plugins"),
            project_dir.join("cache"),
            project_dir.join("transcripts"),
        ] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        let config_path = project_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = project_dir.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(&gitignore_path, DEFAULT_GITIGNORE).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .backlog directory path
    pub fn project_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the plugins directory
    pub fn plugins_dir(&self) -> PathBuf {
        self.project_dir().join("plugins")
    }

    /// Returns the directory for intermediate pipeline texts
    pub fn transcripts_dir(&self) -> PathBuf {
        self.project_dir().join("transcripts")
    }

    /// Returns the response cache
    pub fn response_cache(&self) -> ResponseCache {
        ResponseCache::for_project(&self.root)
    }

    /// Writes a pipeline artifact as `<stem>.<kind>.txt`, returning its path
    pub fn write_artifact(&self, stem: &str, kind: &str, content: &str) -> Result<PathBuf> {
        let dir = self.transcripts_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        let path = dir.join(format!("{}.{}.txt", stem, kind));
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LineSchema;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.project_dir().is_dir());
        assert!(project.plugins_dir().is_dir());
        assert!(project.transcripts_dir().is_dir());
        assert!(project.project_dir().join("cache").is_dir());
        assert!(project.project_dir().join("config.toml").is_file());
        assert!(project.project_dir().join(".gitignore").is_file());
    }

    #[test]
    fn default_config_file_parses() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert_eq!(project.config().project.parser.schema, LineSchema::Basic);
        assert!(project.config().project.cache.enabled);
    }

    #[test]
    fn init_keeps_existing_config() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();
        fs::write(
            dir.path().join(PROJECT_DIR).join("config.toml"),
            "[parser]\nschema = \"with_dependencies\"\n",
        )
        .unwrap();

        let project = Project::init(dir.path()).unwrap();
        assert_eq!(
            project.config().project.parser.schema,
            LineSchema::WithDependencies
        );
    }

    #[test]
    fn open_outside_project_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Project::open(dir.path()).is_err());
    }

    #[test]
    fn write_artifact_names_by_stem() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let path = project.write_artifact("standup", "summary", "text").unwrap();
        assert!(path.ends_with("standup.summary.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "text");
    }
}
