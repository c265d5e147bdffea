//! Call history view: list calls and inspect one call's transcript and summary.
//!
//! The detail panel shows the call's own fields immediately; its summary is
//! fetched by a separate request with its own state, so a missing summary
//! only affects the summary section.
//!
//! Summary responses are applied to whatever call is currently selected.
//! There is no check that the response belongs to that call, so a late
//! response for a previously selected call would overwrite the panel.

use colored::{Color, Colorize};
use tracing::warn;

use crate::api::{ApiError, Backend};
use crate::config::schema::DisplayConfig;
use crate::models::{Call, CallStatus, CallSummary};

use super::{LoadState, error_banner, field, format_timestamp, heading, placeholder};

const FETCH_FAILED: &str = "Failed to fetch calls";
const CALL_FETCH_FAILED: &str = "Failed to fetch call";
const SUMMARY_UNAVAILABLE: &str = "Summary not available";

/// State of the summary section in the detail panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SummaryState {
    #[default]
    Hidden,
    Loading,
    Loaded(CallSummary),
    Unavailable(String),
}

/// Display label and color for a call status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    pub color: Color,
}

/// Neutral style for cancelled and unrecognized statuses.
pub const NEUTRAL: Color = Color::BrightBlack;

/// Fixed status → badge lookup; anything unrecognized is neutral.
pub fn status_badge(status: &CallStatus) -> StatusBadge {
    let color = match status {
        CallStatus::Pending => Color::Yellow,
        CallStatus::InProgress => Color::Blue,
        CallStatus::Completed => Color::Green,
        CallStatus::Failed => Color::Red,
        CallStatus::Cancelled | CallStatus::Unknown(_) => NEUTRAL,
    };
    StatusBadge {
        label: status.as_str().replace('_', " ").to_uppercase(),
        color,
    }
}

/// State of the call history tab.
#[derive(Debug, Default)]
pub struct CallHistoryView {
    calls: Vec<Call>,
    state: LoadState,
    error: Option<String>,
    selected: Option<Call>,
    summary: SummaryState,
}

impl CallHistoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, backend: &dyn Backend) {
        self.fetch(backend);
    }

    /// Replace the list with a fresh `GET /calls`.
    pub fn fetch(&mut self, backend: &dyn Backend) -> bool {
        self.state = LoadState::Loading;
        match backend.list_calls() {
            Ok(list) => {
                self.calls = list.calls;
                self.state = LoadState::Ready;
                true
            }
            Err(err) => {
                warn!(error = %err, "call list fetch failed");
                self.state = LoadState::Failed;
                self.error = Some(FETCH_FAILED.to_string());
                false
            }
        }
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> Option<&Call> {
        self.selected.as_ref()
    }

    pub fn summary(&self) -> &SummaryState {
        &self.summary
    }

    /// Open the detail panel for `call` and mark its summary as loading.
    pub fn open_details(&mut self, call: Call) {
        self.selected = Some(call);
        self.summary = SummaryState::Loading;
    }

    /// Fold a summary response into the open panel.
    pub fn apply_summary(&mut self, result: Result<CallSummary, ApiError>) {
        self.summary = match result {
            Ok(summary) => SummaryState::Loaded(summary),
            Err(err) => {
                warn!(error = %err, "call summary fetch failed");
                SummaryState::Unavailable(SUMMARY_UNAVAILABLE.to_string())
            }
        };
    }

    /// Open a call's details and fetch its summary.
    ///
    /// The call's base fields come from the loaded list when present,
    /// otherwise from `GET /calls/{id}`. Returns `false` if the call could
    /// not be found at all.
    pub fn view_details(&mut self, backend: &dyn Backend, call_id: &str) -> bool {
        let call = match self.calls.iter().find(|c| c.id == call_id) {
            Some(call) => call.clone(),
            None => match backend.get_call(call_id) {
                Ok(call) => call,
                Err(err) => {
                    warn!(call_id, error = %err, "call fetch failed");
                    self.error = Some(err.message_or(CALL_FETCH_FAILED).to_string());
                    return false;
                }
            },
        };

        let id = call.id.clone();
        self.open_details(call);
        self.apply_summary(backend.get_call_summary(&id));
        true
    }

    pub fn close_details(&mut self) {
        self.selected = None;
        self.summary = SummaryState::Hidden;
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// The list, followed by the detail panel when one is open.
    pub fn render(&self, display: &DisplayConfig) -> String {
        let mut out = self.render_list(display);
        if self.selected.is_some() {
            out.push_str("\n\n");
            out.push_str(&self.render_details(display));
        }
        out
    }

    pub fn render_list(&self, display: &DisplayConfig) -> String {
        if self.state == LoadState::Loading {
            return "Loading call history...".to_string();
        }

        let mut out = vec![heading("Call History", 50)];

        if let Some(error) = &self.error {
            out.push(error_banner(error));
        }

        for call in &self.calls {
            out.push(String::new());
            out.push(format!(
                "{}  {}  {}",
                call.driver_name.bold(),
                call.driver_phone,
                render_badge(&call.status)
            ));
            out.push(field("Load Number", Some(&call.load_number)));
            out.push(field("Agent", call.agent_name()));
            out.push(field("Type", call.agent_scenario()));
            out.push(format!(
                "  {} {}",
                "Created:".bold(),
                format_timestamp(call.created_at.as_deref(), &display.timestamp_format)
            ));
            out.push(format!("  {}", call.id.dimmed()));
        }

        if self.calls.is_empty() && self.state == LoadState::Ready {
            out.push(placeholder(
                "No calls found. Trigger your first call to see it here!",
            ));
        }

        out.join("\n")
    }

    /// The detail panel for the selected call, or an empty string.
    pub fn render_details(&self, display: &DisplayConfig) -> String {
        let Some(call) = &self.selected else {
            return String::new();
        };

        let mut out = vec![
            heading("Call Details", 50),
            "Call Information".bold().to_string(),
            field("Driver", Some(&call.driver_name)),
            field("Phone", Some(&call.driver_phone)),
            field("Load Number", Some(&call.load_number)),
            format!("  {} {}", "Status:".bold(), render_badge(&call.status)),
            format!(
                "  {} {}",
                "Started:".bold(),
                format_timestamp(call.created_at.as_deref(), &display.timestamp_format)
            ),
            String::new(),
            "Agent Information".bold().to_string(),
            field("Agent", call.agent_name()),
            field("Type", call.agent_scenario()),
            field("Call ID", Some(&short_id(&call.id))),
        ];

        if let Some(transcript) = call.transcript_text() {
            out.push(String::new());
            out.push("Transcript".bold().to_string());
            out.extend(transcript.lines().map(|line| format!("  {line}")));
        }

        out.push(String::new());
        out.push("Call Summary".bold().to_string());
        match &self.summary {
            SummaryState::Hidden => {}
            SummaryState::Loading => out.push("  Loading summary...".dimmed().to_string()),
            SummaryState::Unavailable(message) => {
                out.push(format!("  {}", placeholder(message)));
            }
            SummaryState::Loaded(summary) => {
                for (label, value) in summary.present_fields() {
                    out.push(field(label, Some(value)));
                }
                out.push(format!("  {}", "Structured Data:".bold()));
                let pretty = serde_json::to_string_pretty(&summary.structured_data)
                    .unwrap_or_else(|_| summary.structured_data.to_string());
                out.extend(pretty.lines().map(|line| format!("    {line}")));
            }
        }

        out.join("\n")
    }
}

fn render_badge(status: &CallStatus) -> String {
    let badge = status_badge(status);
    badge.label.color(badge.color).bold().to_string()
}

/// First 8 characters of an id, followed by `...`.
fn short_id(id: &str) -> String {
    let head: String = id.chars().take(8).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_for_known_statuses() {
        let badge = status_badge(&CallStatus::InProgress);
        assert_eq!(badge.label, "IN PROGRESS");
        assert_eq!(badge.color, Color::Blue);

        assert_eq!(status_badge(&CallStatus::Completed).color, Color::Green);
        assert_eq!(status_badge(&CallStatus::Failed).color, Color::Red);
        assert_eq!(status_badge(&CallStatus::Pending).color, Color::Yellow);
        assert_eq!(status_badge(&CallStatus::Cancelled).color, NEUTRAL);
    }

    #[test]
    fn unknown_status_gets_neutral_badge() {
        let badge = status_badge(&CallStatus::Unknown("on_hold".to_string()));
        assert_eq!(badge.label, "ON HOLD");
        assert_eq!(badge.color, NEUTRAL);
    }

    #[test]
    fn short_id_truncates_to_eight_chars() {
        assert_eq!(short_id("0f8fad5b-d9cb-469f-a165-70867728950e"), "0f8fad5b...");
        assert_eq!(short_id("abc"), "abc...");
    }

    #[test]
    fn apply_summary_error_marks_unavailable() {
        let mut view = CallHistoryView::new();
        view.apply_summary(Err(ApiError::Status {
            status: 404,
            detail: Some("Call summary not found".to_string()),
        }));
        assert_eq!(
            view.summary(),
            &SummaryState::Unavailable("Summary not available".to_string())
        );
    }

    #[test]
    fn close_details_hides_panel() {
        let mut view = CallHistoryView::new();
        let call: Call =
            serde_json::from_str(r#"{"id": "c1", "status": "completed"}"#).unwrap();
        view.open_details(call);
        assert_eq!(view.summary(), &SummaryState::Loading);

        view.close_details();
        assert!(view.selected().is_none());
        assert_eq!(view.summary(), &SummaryState::Hidden);
        assert_eq!(view.render_details(&DisplayConfig::default()), "");
    }
}
