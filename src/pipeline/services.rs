//! Collaborator interfaces
//!
//! Speech-to-text, summarization, breakdown generation and wiki publishing
//! live outside this crate. Each is a trait here; plugins are the shipped
//! implementation.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::LineSchema;

/// Pipeline stage served by a collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Transcription,
    Summarization,
    Breakdown,
    Publishing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Transcription => f.write_str("transcription"),
            Stage::Summarization => f.write_str("summarization"),
            Stage::Breakdown => f.write_str("breakdown"),
            Stage::Publishing => f.write_str("publishing"),
        }
    }
}

/// A collaborator call failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{stage} service failed: {reason}")]
pub struct ServiceError {
    pub stage: Stage,
    pub reason: String,
}

impl ServiceError {
    pub fn new(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

/// Converts recorded audio to text
pub trait Transcriber {
    fn transcribe(&self, audio: &Path) -> Result<String, ServiceError>;
}

/// Condenses a transcript into a meeting summary
pub trait Summarizer {
    fn summarize(&self, text: &str, context: &str) -> Result<String, ServiceError>;
}

/// Produces breakdown lines from a summary, following `schema`
pub trait BreakdownGenerator {
    fn generate(
        &self,
        summary: &str,
        context: &str,
        schema: LineSchema,
    ) -> Result<String, ServiceError>;
}

/// A wiki page write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageUpdate {
    pub page_id: String,
    pub title: String,
    pub content: String,
}

/// What the wiki reported after a page write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Writes content to a shared wiki page
pub trait PagePublisher {
    fn update_page(&self, update: &PageUpdate) -> Result<PublishStatus, ServiceError>;
}
