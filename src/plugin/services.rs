//! Plugin-backed collaborators
//!
//! Binds each pipeline stage to a `backlog-*` plugin. Calls for the
//! transcription, summary and breakdown stages are memoized in the
//! project's response cache; publishing never is.

use std::path::Path;

use serde_json::{json, Value};
use tracing::warn;

use super::loader::PluginLoader;
use super::protocol::{PluginRequest, PluginResponse, PluginRole};
use crate::domain::LineSchema;
use crate::pipeline::{
    BreakdownGenerator, PagePublisher, PageUpdate, PublishStatus, ServiceError, Stage,
    Summarizer, Transcriber,
};
use crate::storage::{cache_key, file_digest, ResponseCache};

impl PluginRole {
    fn stage(&self) -> Stage {
        match self {
            PluginRole::Transcriber => Stage::Transcription,
            PluginRole::Summarizer => Stage::Summarization,
            PluginRole::Breakdown => Stage::Breakdown,
            PluginRole::Publisher => Stage::Publishing,
        }
    }
}

/// A plugin serving one pipeline stage
pub struct PluginService<'a> {
    loader: &'a PluginLoader,
    plugin_name: String,
    role: PluginRole,
    cache: Option<ResponseCache>,
    language: String,
}

impl<'a> PluginService<'a> {
    pub fn new(loader: &'a PluginLoader, plugin_name: impl Into<String>, role: PluginRole) -> Self {
        Self {
            loader,
            plugin_name: plugin_name.into(),
            role,
            cache: None,
            language: "en".to_string(),
        }
    }

    /// Memoizes responses in `cache`
    pub fn with_cache(mut self, cache: Option<ResponseCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Spoken language sent with transcription requests
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    fn fail(&self, reason: impl std::fmt::Display) -> ServiceError {
        ServiceError::new(self.role.stage(), format!("{}: {}", self.plugin_name, reason))
    }

    /// Sends `params` to the plugin and returns a successful response carrying data
    ///
    /// `key_material` identifies the input for caching; `None` disables it.
    fn call(&self, params: Value, key_material: Option<Value>) -> Result<PluginResponse, ServiceError> {
        let operation = self.role.operation();
        let key = match (&self.cache, &key_material) {
            (Some(_), Some(material)) => Some(cache_key(&self.plugin_name, operation, material)),
            _ => None,
        };

        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            match cache.get(key) {
                Ok(Some(value)) => return Ok(PluginResponse::success(value)),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Response cache unavailable"),
            }
        }

        let request = PluginRequest::new(operation, params);
        let response = self
            .loader
            .execute(&self.plugin_name, &request)
            .map_err(|e| self.fail(format!("{:#}", e)))?;

        if !response.success {
            return Err(self.fail(
                response
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        let data = response
            .data
            .as_ref()
            .ok_or_else(|| self.fail("No data returned"))?;

        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Err(e) = cache.put(key, &self.plugin_name, operation, data.clone()) {
                warn!(error = %e, "Failed to store response in cache");
            }
        }

        Ok(response)
    }

    fn call_for_text(&self, params: Value, key_material: Option<Value>) -> Result<String, ServiceError> {
        let response = self.call(params, key_material)?;
        response
            .data_str("text")
            .map(str::to_string)
            .ok_or_else(|| self.fail("Response has no text field"))
    }
}

impl Transcriber for PluginService<'_> {
    fn transcribe(&self, audio: &Path) -> Result<String, ServiceError> {
        let key_material = match &self.cache {
            Some(_) => {
                let digest = file_digest(audio).map_err(|e| self.fail(format!("{:#}", e)))?;
                Some(json!({ "audio": digest, "language": self.language }))
            }
            None => None,
        };

        self.call_for_text(
            json!({
                "audio_path": audio.display().to_string(),
                "language": self.language,
            }),
            key_material,
        )
    }
}

impl Summarizer for PluginService<'_> {
    fn summarize(&self, text: &str, context: &str) -> Result<String, ServiceError> {
        let params = json!({ "text": text, "context": context });
        self.call_for_text(params.clone(), Some(params))
    }
}

impl BreakdownGenerator for PluginService<'_> {
    fn generate(&self, summary: &str, context: &str, schema: LineSchema) -> Result<String, ServiceError> {
        let params = json!({
            "summary": summary,
            "context": context,
            "schema": schema.as_str(),
            "example": schema.example(),
        });
        self.call_for_text(params.clone(), Some(params))
    }
}

impl PagePublisher for PluginService<'_> {
    fn update_page(&self, update: &PageUpdate) -> Result<PublishStatus, ServiceError> {
        let params = serde_json::to_value(update).map_err(|e| self.fail(e))?;
        let data = self.call(params, None)?.data.unwrap_or_default();
        serde_json::from_value(data).map_err(|e| self.fail(format!("Invalid publish status: {}", e)))
    }
}
