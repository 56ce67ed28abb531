//! Plugin management commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::plugin::{PluginLoader, PluginRole, PLUGIN_PREFIX};
use crate::storage::{Config, Project};

#[derive(Subcommand)]
pub enum PluginCommands {
    /// List available plugins
    List {
        /// Only plugins whose manifest declares this role
        #[arg(long, value_enum)]
        role: Option<PluginRole>,
    },

    /// Test plugin connectivity
    Test {
        /// Plugin name
        name: String,
    },
}

pub fn run(cmd: PluginCommands, output: &Output) -> Result<()> {
    match cmd {
        PluginCommands::List { role } => list_plugins(output, role),
        PluginCommands::Test { name } => test_plugin(output, &name),
    }
}

fn discover(output: &Output) -> Result<PluginLoader> {
    let mut loader = PluginLoader::new();

    // Project plugins take precedence over PATH
    if let Ok(project) = Project::open_current() {
        output.verbose_ctx("plugin", &format!("Searching {}", project.plugins_dir().display()));
        loader.add_plugin_dir(project.plugins_dir());
    }

    loader.discover()?;
    Ok(loader)
}

/// Stages the project config binds to `name`
fn bound_stages(config: &Config, name: &str) -> Vec<&'static str> {
    let services = &config.project.services;
    [
        (&services.transcriber, PluginRole::Transcriber),
        (&services.summarizer, PluginRole::Summarizer),
        (&services.breakdown, PluginRole::Breakdown),
        (&services.publisher, PluginRole::Publisher),
    ]
    .into_iter()
    .filter(|(bound, _)| bound.as_deref() == Some(name))
    .map(|(_, role)| role.operation())
    .collect()
}

fn list_plugins(output: &Output, role: Option<PluginRole>) -> Result<()> {
    let mut loader = discover(output)?;
    let config = Config::load()?;

    let plugins = match role {
        Some(role) => loader.list_by_role(role),
        None => loader.list(),
    };
    let found: Vec<(String, String)> = plugins
        .iter()
        .map(|p| (p.name.clone(), p.path.display().to_string()))
        .collect();

    let mut items = Vec::with_capacity(found.len());
    for (name, path) in found {
        let roles = match loader.get_manifest(&name) {
            Ok(Some(manifest)) => manifest.roles,
            Ok(None) => Vec::new(),
            Err(e) => {
                output.verbose_ctx("plugin", &format!("No manifest from {}: {:#}", name, e));
                Vec::new()
            }
        };
        let bound = bound_stages(&config, &name);
        items.push((name, path, roles, bound));
    }

    if output.is_json() {
        let items: Vec<_> = items
            .iter()
            .map(|(name, path, roles, bound)| {
                serde_json::json!({
                    "name": name,
                    "path": path,
                    "roles": roles,
                    "bound_to": bound,
                })
            })
            .collect();
        output.data(&items);
    } else if items.is_empty() {
        println!("No plugins found.");
        println!();
        println!("Plugins are discovered from:");
        println!("  - .backlog/plugins/ directory");
        println!("  - PATH (executables starting with '{}')", PLUGIN_PREFIX);
    } else {
        println!("Available plugins:");
        println!("{:<28} {:<24} PATH", "NAME", "BOUND TO");
        println!("{}", "-".repeat(80));
        for (name, path, _, bound) in &items {
            let bound = if bound.is_empty() { "-".to_string() } else { bound.join(",") };
            println!("{:<28} {:<24} {}", name, bound, path);
        }
    }

    Ok(())
}

fn test_plugin(output: &Output, name: &str) -> Result<()> {
    let mut loader = discover(output)?;

    if loader.get(name).is_none() {
        anyhow::bail!("Plugin not found: {}", name);
    }

    let manifest = loader.get_manifest(name).unwrap_or_else(|e| {
        output.verbose_ctx("plugin", &format!("No manifest: {:#}", e));
        None
    });

    let test_result = loader.test(name);

    if output.is_json() {
        output.data(&serde_json::json!({
            "name": name,
            "manifest": manifest,
            "test_success": test_result.as_ref().ok().copied().unwrap_or(false),
            "test_error": test_result.as_ref().err().map(|e| format!("{:#}", e)),
        }));
    } else {
        if let Some(manifest) = manifest {
            let roles: Vec<_> = manifest.roles.iter().map(|r| r.operation()).collect();
            println!("Plugin: {}", manifest.name);
            println!("Version: {}", manifest.version);
            println!("Description: {}", manifest.description);
            println!("Roles: {}", roles.join(", "));
            println!("Operations: {}", manifest.operations.join(", "));
            println!();
        }

        match test_result {
            Ok(true) => output.success(&format!("Plugin '{}' is working correctly", name)),
            Ok(false) => anyhow::bail!("Plugin '{}' test returned false", name),
            Err(e) => return Err(e.context(format!("Plugin '{}' test failed", name))),
        }
    }

    Ok(())
}
