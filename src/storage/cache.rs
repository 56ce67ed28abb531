//! Response cache for collaborator calls
//!
//! Transcription, summarization and breakdown calls are expensive and
//! deterministic enough to memoize. Responses are stored in
//! `.backlog/cache/responses.jsonl`, one entry per line, keyed by a blake3
//! hash of the plugin name, operation and key material.
//! Uses file locking for concurrent access safety.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::PROJECT_DIR;

/// A memoized response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub plugin: String,
    pub operation: String,
    pub value: serde_json::Value,
    pub cached_at: DateTime<Utc>,
}

/// Summary of cache contents
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub by_operation: BTreeMap<String, usize>,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

/// Computes the cache key for a call
pub fn cache_key(plugin: &str, operation: &str, material: &serde_json::Value) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(plugin.as_bytes());
    hasher.update(&[0]);
    hasher.update(operation.as_bytes());
    hasher.update(&[0]);
    hasher.update(material.to_string().as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Hashes file contents, for keys that depend on input files
pub fn file_digest(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// JSONL-backed response cache
#[derive(Debug, Clone)]
pub struct ResponseCache {
    path: PathBuf,
}

impl ResponseCache {
    /// Creates a cache at the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default cache for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(
            project_root
                .join(PROJECT_DIR)
                .join("cache")
                .join("responses.jsonl"),
        )
    }

    /// Returns the path to the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all entries; later lines win over earlier ones with the same key
    pub fn read_all(&self) -> Result<HashMap<String, CacheEntry>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open cache: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on cache")?;

        let reader = BufReader::new(&file);
        let mut entries = HashMap::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            // A corrupt entry only costs a cache miss
            match serde_json::from_str::<CacheEntry>(&line) {
                Ok(entry) => {
                    entries.insert(entry.key.clone(), entry);
                }
                Err(e) => warn!(line = line_num + 1, error = %e, "Ignoring corrupt cache entry"),
            }
        }

        Ok(entries)
    }

    /// Looks up a cached value
    pub fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let hit = self.read_all()?.remove(key).map(|entry| entry.value);
        debug!(key, hit = hit.is_some(), "Cache lookup");
        Ok(hit)
    }

    /// Appends a value to the cache
    pub fn put(
        &self,
        key: &str,
        plugin: &str,
        operation: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let entry = CacheEntry {
            key: key.to_string(),
            plugin: plugin.to_string(),
            operation: operation.to_string(),
            value,
            cached_at: Utc::now(),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open cache: {}", self.path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on cache")?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(&entry).context("Failed to serialize cache entry")?;
        writeln!(writer, "{}", line).context("Failed to write cache entry")?;
        writer.flush().context("Failed to flush cache")?;

        Ok(())
    }

    /// Removes every entry, returning how many there were
    pub fn clear(&self) -> Result<usize> {
        let count = self.read_all()?.len();
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove cache: {}", self.path.display()))?;
        }
        Ok(count)
    }

    /// Summarizes the cache contents
    pub fn stats(&self) -> Result<CacheStats> {
        let entries = self.read_all()?;
        let mut stats = CacheStats {
            entries: entries.len(),
            ..CacheStats::default()
        };

        for entry in entries.values() {
            *stats.by_operation.entry(entry.operation.clone()).or_insert(0) += 1;
            stats.oldest = Some(stats.oldest.map_or(entry.cached_at, |t| t.min(entry.cached_at)));
            stats.newest = Some(stats.newest.map_or(entry.cached_at, |t| t.max(entry.cached_at)));
        }

        Ok(stats)
    }
}
