//! CLI command implementations outside the console views.
//!
//! Provides subcommand handlers for:
//! - `callboard health`: backend reachability and resource checks
//! - `callboard config show|init|set|reset`: configuration management

use anyhow::Result;
use colored::Colorize;

use crate::api::{ApiClient, Backend};
use crate::config::{self, CallboardConfig};

// ---------------------------------------------------------------------------
// callboard health
// ---------------------------------------------------------------------------

/// Check the config files, the backend health probe and both list endpoints.
pub fn run_health(cfg: &CallboardConfig) -> Result<()> {
    println!("{}", "Callboard Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    for item in check_config_files() {
        print_health_item(&item.name, item.ok, &item.detail);
    }
    for item in check_backend(&ApiClient::from_config(&cfg.api)) {
        print_health_item(&item.name, item.ok, &item.detail);
    }
    Ok(())
}

/// One line of the health report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthItem {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

impl HealthItem {
    fn new(name: &str, ok: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            ok,
            detail: detail.into(),
        }
    }
}

fn check_config_files() -> Vec<HealthItem> {
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    vec![
        HealthItem::new(
            "Global config",
            global_exists,
            if global_exists {
                "~/.callboard/config.toml found"
            } else {
                "not found (run `callboard config init` to create)"
            },
        ),
        HealthItem::new(
            "Project config",
            project_exists,
            if project_exists {
                ".callboard.toml found"
            } else {
                "none (optional)"
            },
        ),
    ]
}

/// Probe `/health` at the origin, then both list endpoints under the prefix.
pub fn check_backend(client: &ApiClient) -> Vec<HealthItem> {
    let mut items = Vec::with_capacity(3);

    items.push(match client.health() {
        Ok(health) => {
            let status = health.status.as_deref().unwrap_or("ok");
            let detail = match health.version.as_deref() {
                Some(version) => format!("{status} at {} (v{version})", client.origin()),
                None => format!("{status} at {}", client.origin()),
            };
            HealthItem::new("Backend", true, detail)
        }
        Err(err) => HealthItem::new(
            "Backend",
            false,
            format!("not reachable at {}: {err}", client.origin()),
        ),
    });

    items.push(match client.list_agents() {
        Ok(list) => HealthItem::new("Agents", true, format!("{} configured", list.agents.len())),
        Err(err) => HealthItem::new("Agents", false, err.to_string()),
    });

    items.push(match client.list_calls() {
        Ok(list) => HealthItem::new("Calls", true, format!("{} recorded", list.calls.len())),
        Err(err) => HealthItem::new("Calls", false, err.to_string()),
    });

    items
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// callboard config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show(cfg: &CallboardConfig) -> Result<()> {
    let toml_str = config::show_effective_config(cfg)?;
    println!("{}", "Effective Callboard Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(global_exists, "~/.callboard/config.toml");
    print_source(project_exists, ".callboard.toml");
    println!(
        "  {} {}",
        "·".dimmed(),
        "CALLBOARD_* environment variables".dimmed()
    );
    println!("  {} {}", "·".dimmed(), "--api-url flag".dimmed());

    Ok(())
}

fn print_source(found: bool, label: &str) {
    if found {
        println!("  {} {}", "✓".green(), label.dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            format!("{label} (not found)").dimmed()
        );
    }
}

/// Initialize a default config file at `~/.callboard/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to point callboard at your backend.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}
