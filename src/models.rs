//! Typed mirrors of the backend's entities and request bodies.
//!
//! The backend owns every entity; these types only describe the JSON that
//! crosses the wire. Fields the backend may omit are `Option`s or carry a
//! serde default so that a sparse payload still decodes, and the views decide
//! how an absent field is displayed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tokens an agent's system prompt is expected to contain.
pub const PROMPT_PLACEHOLDERS: [&str; 2] = ["{driver_name}", "{load_number}"];

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Purpose of the calls an agent places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioType {
    #[default]
    Dispatch,
    Emergency,
}

impl ScenarioType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dispatch => "dispatch",
            Self::Emergency => "emergency",
        }
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dispatch" => Ok(Self::Dispatch),
            "emergency" => Ok(Self::Emergency),
            other => Err(format!(
                "unknown scenario type '{other}' (expected dispatch or emergency)"
            )),
        }
    }
}

/// Synthesized voice used by an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Female,
    Male,
}

impl Voice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Voice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "female" => Ok(Self::Female),
            "male" => Ok(Self::Male),
            other => Err(format!("unknown voice '{other}' (expected female or male)")),
        }
    }
}

/// Lifecycle status of a call.
///
/// Values the client does not know about are preserved in [`CallStatus::Unknown`]
/// instead of failing the whole list decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
    Unknown(String),
}

impl CallStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Unknown(raw) => raw,
        }
    }

    /// Whether the call has finished and a summary may exist.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl From<String> for CallStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => Self::Pending,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "cancelled" => Self::Cancelled,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<CallStatus> for String {
    fn from(status: CallStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// Voice parameters nested inside an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub voice: Voice,
    /// Speaking rate, 0.5–2.0.
    pub speed: f64,
    /// How readily the agent yields when interrupted, 0–1.
    pub interruption_sensitivity: f64,
    pub backchanneling: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice: Voice::Female,
            speed: 1.0,
            interruption_sensitivity: 0.5,
            backchanneling: true,
        }
    }
}

/// An agent record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub scenario_type: ScenarioType,
    #[serde(default)]
    pub voice_settings: VoiceSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Body of `POST /agents` and `PUT /agents/{id}`; also the agent form state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentForm {
    pub name: String,
    pub system_prompt: String,
    pub scenario_type: ScenarioType,
    pub voice_settings: VoiceSettings,
}

impl AgentForm {
    /// Form pre-populated with an existing agent's values.
    pub fn from_agent(agent: &Agent) -> Self {
        Self {
            name: agent.name.clone(),
            system_prompt: agent.system_prompt.clone(),
            scenario_type: agent.scenario_type,
            voice_settings: agent.voice_settings.clone(),
        }
    }

    /// Required inputs that are still blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.system_prompt.trim().is_empty() {
            missing.push("system_prompt");
        }
        missing
    }

    /// Prompt placeholders absent from the current prompt text.
    pub fn missing_placeholders(&self) -> Vec<&'static str> {
        PROMPT_PLACEHOLDERS
            .iter()
            .copied()
            .filter(|p| !self.system_prompt.contains(p))
            .collect()
    }
}

/// `{agents: [...]}` envelope of `GET /agents`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentList {
    pub agents: Vec<Agent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

// ---------------------------------------------------------------------------
// Calls
// ---------------------------------------------------------------------------

/// Agent fields joined onto a call record by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallAgent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub scenario_type: Option<String>,
}

/// A call record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retell_call_id: Option<String>,
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub driver_phone: String,
    #[serde(default)]
    pub load_number: String,
    pub status: CallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<CallAgent>,
}

impl Call {
    /// Joined agent name, if the backend included it.
    pub fn agent_name(&self) -> Option<&str> {
        self.agents.as_ref()?.name.as_deref()
    }

    /// Joined agent scenario type, if the backend included it.
    pub fn agent_scenario(&self) -> Option<&str> {
        self.agents.as_ref()?.scenario_type.as_deref()
    }

    /// Transcript text when present and non-blank.
    pub fn transcript_text(&self) -> Option<&str> {
        self.transcript.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Body of `POST /calls/trigger`; also the trigger form state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerCallRequest {
    pub agent_id: String,
    pub driver_name: String,
    pub driver_phone: String,
    pub load_number: String,
}

impl TriggerCallRequest {
    /// Required inputs that are still blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("agent_id", &self.agent_id),
            ("driver_name", &self.driver_name),
            ("driver_phone", &self.driver_phone),
            ("load_number", &self.load_number),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// `{calls: [...]}` envelope of `GET /calls`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallList {
    pub calls: Vec<Call>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

/// Backend-derived extraction from a call's transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallSummary {
    pub id: Option<String>,
    pub call_id: Option<String>,
    pub call_outcome: Option<String>,
    pub driver_status: Option<String>,
    pub current_location: Option<String>,
    pub eta: Option<String>,
    pub emergency_type: Option<String>,
    pub emergency_location: Option<String>,
    pub escalation_status: Option<String>,
    pub structured_data: serde_json::Value,
    pub full_transcript: Option<String>,
    pub created_at: Option<String>,
}

impl CallSummary {
    /// Labelled summary fields that are present, in display order.
    pub fn present_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Outcome", &self.call_outcome),
            ("Driver Status", &self.driver_status),
            ("Location", &self.current_location),
            ("ETA", &self.eta),
            ("Emergency Type", &self.emergency_type),
            ("Emergency Location", &self.emergency_location),
            ("Escalation", &self.escalation_status),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (label, v))
        })
        .collect()
    }
}

// ---------------------------------------------------------------------------
// Misc responses
// ---------------------------------------------------------------------------

/// `{message}` body returned by `DELETE /agents/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Body of `GET /health` (served outside the API prefix).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: Option<String>,
    pub timestamp: Option<String>,
    pub version: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_preserved() {
        let call: Call = serde_json::from_str(
            r#"{"id": "c1", "driver_name": "Ann", "driver_phone": "+15550001111",
                "load_number": "L-1", "status": "ringing"}"#,
        )
        .unwrap();
        assert_eq!(call.status, CallStatus::Unknown("ringing".to_string()));
        assert_eq!(call.status.as_str(), "ringing");
        assert!(!call.status.is_terminal());
    }

    #[test]
    fn known_statuses_round_trip_through_strings() {
        for raw in ["pending", "in_progress", "completed", "failed", "cancelled"] {
            let status = CallStatus::from(raw.to_string());
            assert!(!matches!(status, CallStatus::Unknown(_)), "{raw}");
            assert_eq!(String::from(status), raw);
        }
    }

    #[test]
    fn agent_with_sparse_voice_settings_uses_defaults() {
        let agent: Agent = serde_json::from_str(
            r#"{"id": "a1", "name": "Bot", "system_prompt": "Hi {driver_name}",
                "scenario_type": "emergency", "voice_settings": {"voice": "male"}}"#,
        )
        .unwrap();
        assert_eq!(agent.scenario_type, ScenarioType::Emergency);
        assert_eq!(agent.voice_settings.voice, Voice::Male);
        assert_eq!(agent.voice_settings.speed, 1.0);
        assert!(agent.voice_settings.backchanneling);
        assert!(agent.created_at.is_none());
    }

    #[test]
    fn agent_form_serializes_nested_voice_settings() {
        let form = AgentForm {
            name: "Dispatch Bot".to_string(),
            system_prompt: "Call {driver_name} about {load_number}".to_string(),
            ..AgentForm::default()
        };
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["scenario_type"], "dispatch");
        assert_eq!(json["voice_settings"]["voice"], "female");
        assert_eq!(json["voice_settings"]["interruption_sensitivity"], 0.5);
        assert_eq!(json["voice_settings"]["backchanneling"], true);
    }

    #[test]
    fn agent_form_reports_missing_fields_and_placeholders() {
        let mut form = AgentForm::default();
        assert_eq!(form.missing_fields(), vec!["name", "system_prompt"]);

        form.name = "Bot".to_string();
        form.system_prompt = "Hello {driver_name}".to_string();
        assert!(form.missing_fields().is_empty());
        assert_eq!(form.missing_placeholders(), vec!["{load_number}"]);
    }

    #[test]
    fn trigger_request_reports_blank_fields() {
        let req = TriggerCallRequest {
            agent_id: "a1".to_string(),
            driver_name: "  ".to_string(),
            driver_phone: "+15550001111".to_string(),
            load_number: String::new(),
        };
        assert_eq!(req.missing_fields(), vec!["driver_name", "load_number"]);
    }

    #[test]
    fn summary_lists_only_present_fields() {
        let summary: CallSummary = serde_json::from_str(
            r#"{"call_outcome": "In-Transit Update", "eta": "", "current_location": "I-10"}"#,
        )
        .unwrap();
        assert_eq!(
            summary.present_fields(),
            vec![("Outcome", "In-Transit Update"), ("Location", "I-10")]
        );
        assert!(summary.structured_data.is_null());
    }

    #[test]
    fn call_joined_agent_accessors() {
        let call: Call = serde_json::from_str(
            r#"{"id": "c1", "status": "pending",
                "agents": {"name": "Dispatch Bot", "scenario_type": "dispatch"}}"#,
        )
        .unwrap();
        assert_eq!(call.agent_name(), Some("Dispatch Bot"));
        assert_eq!(call.agent_scenario(), Some("dispatch"));
        assert_eq!(call.transcript_text(), None);
    }

    #[test]
    fn parse_enums_from_cli_text() {
        assert_eq!("Emergency".parse::<ScenarioType>(), Ok(ScenarioType::Emergency));
        assert_eq!("male".parse::<Voice>(), Ok(Voice::Male));
        assert!("robot".parse::<Voice>().is_err());
    }
}
