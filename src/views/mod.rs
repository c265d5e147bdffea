//! View controllers for the three console tabs.
//!
//! Each view owns an isolated state record and exposes explicit transitions.
//! Actions take a [`Backend`](crate::api::Backend), issue their request, and
//! fold the outcome into view-local state: nothing is retried and no error
//! escapes a view. After any successful mutation the affected list is
//! re-fetched in full; local copies are never patched.
//!
//! Rendering produces plain text (colored via `colored`) that the shell
//! prints as-is.

pub mod agents;
pub mod history;
pub mod trigger;

use chrono::{DateTime, Local, NaiveDateTime};
use colored::Colorize;

pub use agents::AgentManagementView;
pub use history::CallHistoryView;
pub use trigger::CallTriggerView;

/// Lifecycle of a view's primary list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Not mounted yet; nothing requested.
    #[default]
    Idle,
    /// A list request is in flight.
    Loading,
    /// The list reflects the last successful fetch.
    Ready,
    /// The last fetch failed; the previous list (possibly empty) is kept.
    Failed,
}

// ---------------------------------------------------------------------------
// Shared rendering helpers
// ---------------------------------------------------------------------------

/// Inline banner for hard errors.
pub(crate) fn error_banner(message: &str) -> String {
    format!("{} {}", "✗".red().bold(), message.red())
}

/// Inline banner for confirmations.
pub(crate) fn success_banner(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message.green())
}

/// Placeholder text for empty or partial data.
pub(crate) fn placeholder(message: &str) -> String {
    message.yellow().to_string()
}

/// Section heading, underlined like the CLI reports.
pub(crate) fn heading(title: &str, width: usize) -> String {
    format!("{}\n{}", title.bold().cyan(), "=".repeat(width))
}

/// `label: value`, with `N/A` for absent values.
pub(crate) fn field(label: &str, value: Option<&str>) -> String {
    let value = value.filter(|v| !v.is_empty()).unwrap_or("N/A");
    format!("  {} {}", format!("{label}:").bold(), value)
}

/// Format a backend timestamp for display.
///
/// RFC 3339 values are shown in local time; naive ISO-8601 values are shown
/// as-is; anything unparseable is echoed raw; absent values become `N/A`.
pub fn format_timestamp(raw: Option<&str>, format: &str) -> String {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return "N/A".to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(format).to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(format).to_string();
    }

    raw.to_string()
}

/// Truncate to `max_chars` characters, appending "…" if truncated.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
