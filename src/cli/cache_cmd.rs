//! Response cache commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::storage::Project;

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Remove every cached service response
    Clear,

    /// Show what the cache holds
    Stats,
}

pub fn run(cmd: CacheCommands, output: &Output) -> Result<()> {
    match cmd {
        CacheCommands::Clear => clear(output),
        CacheCommands::Stats => stats(output),
    }
}

fn clear(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let cache = project.response_cache();
    output.verbose_ctx("cache", &format!("Clearing {}", cache.path().display()));

    let removed = cache.clear()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "cleared": true,
            "removed": removed,
        }));
    } else {
        output.success(&format!("Cleared {} cached response(s)", removed));
    }

    Ok(())
}

fn stats(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let cache = project.response_cache();
    let stats = cache.stats()?;
    let enabled = project.config().project.cache.enabled;

    if output.is_json() {
        output.data(&serde_json::json!({
            "path": cache.path().display().to_string(),
            "enabled": enabled,
            "stats": stats,
        }));
        return Ok(());
    }

    println!("Response Cache");
    println!("{}", "=".repeat(40));
    println!("Path: {}", cache.path().display());
    println!("Enabled: {}", if enabled { "yes" } else { "no" });
    println!("Entries: {}", stats.entries);

    if !stats.by_operation.is_empty() {
        println!();
        println!("By operation:");
        for (operation, count) in &stats.by_operation {
            println!("  {:<12} {}", operation, count);
        }
    }

    if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
        println!();
        println!("Oldest: {}", oldest.format("%Y-%m-%d %H:%M:%S UTC"));
        println!("Newest: {}", newest.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    Ok(())
}
