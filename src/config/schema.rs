/// Configuration schema and defaults for callboard.
///
/// Defines the TOML-serializable configuration structure with its three
/// sections: `[api]`, `[logging]` and `[display]`.
///
/// Every field has a built-in default. Users only need to set the values
/// they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level callboard configuration.
///
/// Maps directly to the `~/.callboard/config.toml` and `.callboard.toml`
/// file schemas. All sections and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallboardConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend origin (scheme, host, port). `/health` is served here.
    pub base_url: String,
    /// Path prefix under which every resource endpoint lives.
    pub prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            prefix: "/api".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Diagnostic verbosity written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level for callboard's own diagnostics. `RUST_LOG` wins if set.
    pub level: LogLevel,
}

// ---------------------------------------------------------------------------
// [display]
// ---------------------------------------------------------------------------

/// Terminal rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Colorize output. `NO_COLOR` in the environment turns this off.
    pub color: bool,
    /// `chrono` format string for timestamps.
    pub timestamp_format: String,
    /// How many characters of an agent's system prompt the list shows.
    pub prompt_preview_chars: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            prompt_preview_chars: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl CallboardConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `callboard config init`.
    pub fn default_toml() -> String {
        r#"# callboard configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. --api-url on the command line
#   2. Environment variables (CALLBOARD_*, NO_COLOR)
#   3. Project config (.callboard.toml in current directory)
#   4. User global config (~/.callboard/config.toml)
#   5. Built-in defaults

[api]
base_url = "http://localhost:8000"   # backend origin; /health is served here
prefix = "/api"                      # resource endpoints live under this path

[logging]
level = "warn"    # error | warn | info | debug | trace (RUST_LOG overrides)

[display]
color = true
timestamp_format = "%Y-%m-%d %H:%M:%S"
prompt_preview_chars = 120
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
