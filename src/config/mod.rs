/// Configuration system for callboard.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::CallboardConfig::default()`]
/// 2. **User global config**: `~/.callboard/config.toml`
/// 3. **Project local config**: `.callboard.toml` in the current working directory
/// 4. **Environment variables**: `CALLBOARD_*` and `NO_COLOR`
///
/// Later layers override earlier ones at the key level: a project file that
/// only sets `api.base_url` keeps every other value from the layers below.
/// The `--api-url` command-line flag is applied on top by `main`.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::CallboardConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved callboard configuration.
pub fn load() -> CallboardConfig {
    load_layers(
        global_config_path().as_deref(),
        project_config_path().as_deref(),
        |key| std::env::var(key).ok(),
    )
}

/// Resolve defaults → global file → project file → environment.
///
/// Missing or malformed files are skipped so a broken config never keeps
/// the console from starting.
pub fn load_layers(
    global: Option<&Path>,
    project: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> CallboardConfig {
    let mut merged = match toml::Value::try_from(CallboardConfig::default()) {
        Ok(value) => value,
        Err(_) => return CallboardConfig::default(),
    };

    for path in [global, project].into_iter().flatten() {
        if let Some(layer) = load_toml_file(path) {
            merge_toml(&mut merged, layer);
        }
    }

    let mut config: CallboardConfig = merged.try_into().unwrap_or_default();
    apply_env_overrides(&mut config, env);
    config
}

/// Parse a TOML file into a raw value tree, rejecting files that do not
/// match the schema.
fn load_toml_file(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    let value: toml::Value = toml::from_str(&content).ok()?;
    // Validate against the schema before merging.
    value.clone().try_into::<CallboardConfig>().ok()?;
    Some(value)
}

/// Overlay `overlay` onto `base`, recursing into tables so that only the keys
/// present in the overlay are replaced.
fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.callboard/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".callboard").join("config.toml"))
}

/// Path to the project local config: `.callboard.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".callboard.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides.
///
/// Supported variables:
/// - `CALLBOARD_API_URL`: backend origin
/// - `CALLBOARD_API_PREFIX`: resource path prefix
/// - `CALLBOARD_LOG`: log level (`error`, `warn`, `info`, `debug`, `trace`)
/// - `CALLBOARD_COLOR`: colorized output (`1`/`true`/`yes`/`on`)
/// - `NO_COLOR`: any non-empty value disables color
fn apply_env_overrides(config: &mut CallboardConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(val) = env("CALLBOARD_API_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Some(val) = env("CALLBOARD_API_PREFIX") {
        config.api.prefix = val;
    }
    if let Some(val) = env("CALLBOARD_LOG")
        && let Some(level) = parse_log_level(&val)
    {
        config.logging.level = level;
    }
    if let Some(val) = env("CALLBOARD_COLOR") {
        config.display.color = is_truthy(&val);
    }
    if env("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        config.display.color = false;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse a log level string.
fn parse_log_level(val: &str) -> Option<schema::LogLevel> {
    match val.to_ascii_lowercase().as_str() {
        "error" => Some(schema::LogLevel::Error),
        "warn" | "warning" => Some(schema::LogLevel::Warn),
        "info" => Some(schema::LogLevel::Info),
        "debug" => Some(schema::LogLevel::Debug),
        "trace" => Some(schema::LogLevel::Trace),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.callboard/config.toml`.
///
/// Returns an error if the file already exists and `force` is false.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    init_config_at(&path, force)?;
    Ok(path)
}

/// Write the default annotated config to `path`.
pub fn init_config_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, CallboardConfig::default_toml()).context("failed to write config file")?;
    Ok(())
}

/// Set a single config key in the global config file.
///
/// Supports dotted keys like `api.base_url`.
pub fn set_config_value(key: &str, value: &str) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)?;
    Ok(path)
}

/// Set a single config key in the config file at `path`, creating the file
/// from defaults if needed.
pub fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let content = if path.exists() {
        fs::read_to_string(path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&CallboardConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;

    // Unset sections fall back to defaults so every known key is settable.
    let defaults = toml::Value::try_from(CallboardConfig::default())
        .context("failed to serialize default config")?;
    let mut with_defaults = defaults;
    merge_toml(&mut with_defaults, root.clone());
    if lookup(&root, key).is_none() && lookup(&with_defaults, key).is_some() {
        root = with_defaults;
    }

    set_toml_value(&mut root, key, value)?;

    // Refuse edits that would make the file unloadable.
    root.clone()
        .try_into::<CallboardConfig>()
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")?;

    Ok(())
}

fn lookup<'a>(root: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.').try_fold(root, |current, part| current.get(part))
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("invalid config key: '{key}'");
    }

    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config(config: &CallboardConfig) -> Result<String> {
    toml::to_string_pretty(config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn load_returns_defaults_when_no_files_exist() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_layers(
            Some(&dir.path().join("missing.toml")),
            None,
            no_env,
        );
        assert_eq!(config, CallboardConfig::default());
    }

    #[test]
    fn project_layer_overrides_only_its_keys() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(
            &global,
            "[api]\nbase_url = \"http://global:8000\"\nprefix = \"/v1\"\n",
        )
        .unwrap();
        fs::write(&project, "[api]\nbase_url = \"http://project:8000\"\n").unwrap();

        let config = load_layers(Some(&global), Some(&project), no_env);
        assert_eq!(config.api.base_url, "http://project:8000");
        assert_eq!(config.api.prefix, "/v1");
    }

    #[test]
    fn malformed_layer_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(&global, "[display]\nprompt_preview_chars = 60\n").unwrap();
        fs::write(&project, "[display]\nprompt_preview_chars = \"lots\"\n").unwrap();

        let config = load_layers(Some(&global), Some(&project), no_env);
        assert_eq!(config.display.prompt_preview_chars, 60);
    }

    #[test]
    fn env_overrides_files() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        fs::write(&global, "[api]\nbase_url = \"http://global:8000\"\n").unwrap();

        let env = env_from(&[
            ("CALLBOARD_API_URL", "http://env:9000"),
            ("CALLBOARD_LOG", "DEBUG"),
            ("NO_COLOR", "1"),
        ]);
        let config = load_layers(Some(&global), None, env);
        assert_eq!(config.api.base_url, "http://env:9000");
        assert_eq!(config.logging.level, schema::LogLevel::Debug);
        assert!(!config.display.color);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let env = env_from(&[("CALLBOARD_API_URL", ""), ("NO_COLOR", ""), ("CALLBOARD_LOG", "loud")]);
        let config = load_layers(None, None, env);
        assert_eq!(config, CallboardConfig::default());
    }

    #[test]
    fn is_truthy_accepts_variants() {
        for yes in ["1", "true", "TRUE", "yes", "on", "ON"] {
            assert!(is_truthy(yes), "{yes}");
        }
        for no in ["0", "false", "no", "off", ""] {
            assert!(!is_truthy(no), "{no}");
        }
    }

    #[test]
    fn set_toml_value_updates_typed_values() {
        let mut root: toml::Value = toml::from_str(
            "[api]\nbase_url = \"http://a\"\n[display]\ncolor = true\nprompt_preview_chars = 10\n",
        )
        .unwrap();
        set_toml_value(&mut root, "api.base_url", "http://b").unwrap();
        set_toml_value(&mut root, "display.color", "off").unwrap();
        set_toml_value(&mut root, "display.prompt_preview_chars", "80").unwrap();

        assert_eq!(root["api"]["base_url"].as_str(), Some("http://b"));
        assert_eq!(root["display"]["color"].as_bool(), Some(false));
        assert_eq!(root["display"]["prompt_preview_chars"].as_integer(), Some(80));
    }

    #[test]
    fn set_toml_value_rejects_unknown_keys() {
        let mut root: toml::Value = toml::from_str("[api]\nbase_url = \"http://a\"\n").unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "v").is_err());
        assert!(set_toml_value(&mut root, "api.nope", "v").is_err());
        assert!(set_toml_value(&mut root, "api..base_url", "v").is_err());
    }

    #[test]
    fn set_config_value_at_creates_and_updates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        set_config_value_at(&path, "api.base_url", "http://staging:8000").unwrap();
        let config = load_layers(Some(&path), None, no_env);
        assert_eq!(config.api.base_url, "http://staging:8000");

        set_config_value_at(&path, "logging.level", "info").unwrap();
        let config = load_layers(Some(&path), None, no_env);
        assert_eq!(config.api.base_url, "http://staging:8000");
        assert_eq!(config.logging.level, schema::LogLevel::Info);
    }

    #[test]
    fn set_config_value_at_fills_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nbase_url = \"http://a\"\n").unwrap();

        set_config_value_at(&path, "display.color", "false").unwrap();
        let config = load_layers(Some(&path), None, no_env);
        assert_eq!(config.api.base_url, "http://a");
        assert!(!config.display.color);
    }

    #[test]
    fn set_config_value_at_rejects_invalid_enum_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let err = set_config_value_at(&path, "logging.level", "chatty").unwrap_err();
        assert!(err.to_string().contains("logging.level"));
        assert!(!path.exists());
    }

    #[test]
    fn init_config_at_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        init_config_at(&path, false).unwrap();
        assert!(init_config_at(&path, false).is_err());
        init_config_at(&path, true).unwrap();

        let config = load_layers(Some(&path), None, no_env);
        assert_eq!(config, CallboardConfig::default());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config(&CallboardConfig::default()).unwrap();
        let parsed: CallboardConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, CallboardConfig::default());
    }
}
