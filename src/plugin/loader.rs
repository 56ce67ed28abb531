//! Plugin discovery and execution
//!
//! Plugins are discovered from:
//! 1. `.backlog/plugins/` directory
//! 2. PATH (executables starting with "backlog-")
//!
//! When both hold a plugin of the same name, the project copy wins.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

use super::protocol::{PluginManifest, PluginRequest, PluginResponse, PluginRole};

/// Executable name prefix shared by all plugins
pub const PLUGIN_PREFIX: &str = "backlog-";

/// Information about a discovered plugin
#[derive(Debug, Clone)]
pub struct PluginInfo {
    /// Plugin name
    pub name: String,

    /// Path to the plugin executable
    pub path: PathBuf,

    /// Plugin manifest (loaded on demand)
    pub manifest: Option<PluginManifest>,
}

/// Plugin loader and executor
pub struct PluginLoader {
    /// Discovered plugins
    plugins: HashMap<String, PluginInfo>,

    /// Additional plugin directories, searched before PATH
    plugin_dirs: Vec<PathBuf>,

    /// Whether to search PATH at all
    search_path: bool,
}

impl PluginLoader {
    /// Creates a new plugin loader
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
            plugin_dirs: Vec::new(),
            search_path: true,
        }
    }

    /// Creates a loader that only looks in explicitly added directories
    pub fn without_path() -> Self {
        Self {
            search_path: false,
            ..Self::new()
        }
    }

    /// Adds a plugin directory to search
    pub fn add_plugin_dir(&mut self, dir: impl Into<PathBuf>) {
        self.plugin_dirs.push(dir.into());
    }

    /// Discovers all available plugins
    pub fn discover(&mut self) -> Result<()> {
        self.plugins.clear();

        // Project directories first so they shadow PATH
        for dir in &self.plugin_dirs.clone() {
            self.scan_directory(dir)?;
        }

        if self.search_path {
            if let Ok(path_var) = std::env::var("PATH") {
                for dir in std::env::split_paths(&path_var) {
                    self.scan_directory(&dir)?;
                }
            }
        }

        debug!(count = self.plugins.len(), "Discovered plugins");
        Ok(())
    }

    /// Scans a directory for plugins
    fn scan_directory(&mut self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Ok(());
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(_) => return Ok(()), // Ignore unreadable directories
        };

        for entry in entries.flatten() {
            let path = entry.path();

            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with(PLUGIN_PREFIX) && is_executable(&path) {
                    let plugin_name = name.to_string();

                    // First found wins
                    self.plugins
                        .entry(plugin_name.clone())
                        .or_insert_with(|| PluginInfo {
                            name: plugin_name,
                            path,
                            manifest: None,
                        });
                }
            }
        }

        Ok(())
    }

    /// Lists all discovered plugins, sorted by name
    pub fn list(&self) -> Vec<&PluginInfo> {
        let mut plugins: Vec<_> = self.plugins.values().collect();
        plugins.sort_by(|a, b| a.name.cmp(&b.name));
        plugins
    }

    /// Gets a plugin by name
    pub fn get(&self, name: &str) -> Option<&PluginInfo> {
        self.plugins.get(name)
    }

    /// Gets the manifest for a plugin (loads if needed)
    pub fn get_manifest(&mut self, name: &str) -> Result<Option<PluginManifest>> {
        if let Some(info) = self.plugins.get_mut(name) {
            if info.manifest.is_none() {
                info.manifest = Some(Self::load_manifest(&info.path)?);
            }
            Ok(info.manifest.clone())
        } else {
            Ok(None)
        }
    }

    /// Loads the manifest from a plugin
    fn load_manifest(path: &Path) -> Result<PluginManifest> {
        let output = Command::new(path)
            .arg("--manifest")
            .output()
            .with_context(|| format!("Failed to execute plugin: {}", path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Plugin returned error: {}", stderr.trim());
        }

        serde_json::from_slice(&output.stdout).context("Failed to parse plugin manifest")
    }

    /// Executes a plugin request
    pub fn execute(&self, name: &str, request: &PluginRequest) -> Result<PluginResponse> {
        let info = self
            .plugins
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Plugin not found: {}", name))?;

        debug!(plugin = name, operation = %request.operation, "Executing plugin");

        let mut child = Command::new(&info.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn plugin: {}", info.path.display()))?;

        // Send request, then close stdin so the plugin sees EOF
        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| anyhow::anyhow!("Failed to open plugin stdin"))?;
            let request_json =
                serde_json::to_string(request).context("Failed to serialize request")?;
            if let Err(e) = writeln!(stdin, "{}", request_json) {
                // A plugin may exit without reading its input
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e).context("Failed to write to plugin");
                }
            }
        }

        let output = child
            .wait_with_output()
            .context("Failed to read plugin response")?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let response_line = stdout.lines().find(|line| !line.trim().is_empty());

        match response_line {
            Some(line) => serde_json::from_str(line).context("Failed to parse plugin response"),
            None => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                anyhow::bail!(
                    "No response from plugin {} ({}): {}",
                    name,
                    output.status,
                    stderr.trim()
                )
            }
        }
    }

    /// Tests plugin connectivity
    pub fn test(&self, name: &str) -> Result<bool> {
        let request = PluginRequest::new("test", serde_json::json!({}));
        let response = self.execute(name, &request)?;
        Ok(response.success)
    }

    /// Lists plugins whose manifest declares `role`
    pub fn list_by_role(&mut self, role: PluginRole) -> Vec<&PluginInfo> {
        for info in self.plugins.values_mut() {
            if info.manifest.is_none() {
                info.manifest = Self::load_manifest(&info.path).ok();
            }
        }

        let mut result: Vec<_> = self
            .plugins
            .values()
            .filter(|info| {
                info.manifest
                    .as_ref()
                    .map(|m| m.roles.contains(&role))
                    .unwrap_or(false)
            })
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        result
    }
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks if a file is executable
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = path.metadata() {
            return meta.is_file() && meta.permissions().mode() & 0o111 != 0;
        }
    }

    #[cfg(windows)]
    {
        if let Some(ext) = path.extension() {
            return ext == "exe" || ext == "bat" || ext == "cmd";
        }
    }

    false
}
