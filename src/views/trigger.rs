//! Call trigger view: pick an agent and start a test call.

use colored::Colorize;
use tracing::{info, warn};

use crate::api::Backend;
use crate::models::{Agent, Call, TriggerCallRequest};

use super::{error_banner, heading, placeholder, success_banner};

const FETCH_FAILED: &str = "Failed to fetch agents";
const TRIGGER_FAILED: &str = "Failed to trigger call";

/// Result of submitting the trigger form.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    Triggered(Call),
    /// Required fields are blank; nothing was sent.
    Incomplete(Vec<&'static str>),
    Failed,
}

/// State of the call trigger tab.
#[derive(Debug, Default)]
pub struct CallTriggerView {
    agents: Vec<Agent>,
    form: TriggerCallRequest,
    error: Option<String>,
    success: Option<String>,
}

impl CallTriggerView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the agent choices and pre-select the first one.
    pub fn mount(&mut self, backend: &dyn Backend) {
        match backend.list_agents() {
            Ok(list) => {
                self.agents = list.agents;
                if let Some(first) = self.agents.first() {
                    self.form.agent_id = first.id.clone();
                }
            }
            Err(err) => {
                warn!(error = %err, "agent list fetch failed");
                self.error = Some(FETCH_FAILED.to_string());
            }
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn form(&self) -> &TriggerCallRequest {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TriggerCallRequest {
        &mut self.form
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Choose an agent from the loaded list. Returns `false` if it is not
    /// one of the choices.
    pub fn select_agent(&mut self, agent_id: &str) -> bool {
        if self.agents.iter().any(|a| a.id == agent_id) {
            self.form.agent_id = agent_id.to_string();
            true
        } else {
            false
        }
    }

    /// Send the form as `POST /calls/trigger`.
    pub fn submit(&mut self, backend: &dyn Backend) -> TriggerOutcome {
        self.error = None;
        self.success = None;

        let missing = self.form.missing_fields();
        if !missing.is_empty() {
            self.error = Some(format!("Missing required fields: {}", missing.join(", ")));
            return TriggerOutcome::Incomplete(missing);
        }

        match backend.trigger_call(&self.form) {
            Ok(call) => {
                info!(call_id = %call.id, "call triggered");
                self.success = Some(format!("Call triggered successfully! Call ID: {}", call.id));
                self.reset_form();
                TriggerOutcome::Triggered(call)
            }
            Err(err) => {
                self.error = Some(err.message_or(TRIGGER_FAILED).to_string());
                TriggerOutcome::Failed
            }
        }
    }

    fn reset_form(&mut self) {
        self.form = TriggerCallRequest {
            agent_id: self
                .agents
                .first()
                .map(|a| a.id.clone())
                .unwrap_or_default(),
            ..TriggerCallRequest::default()
        };
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn render(&self) -> String {
        let mut out = vec![heading("Trigger Test Call", 50)];

        if let Some(error) = &self.error {
            out.push(error_banner(error));
        }
        if let Some(success) = &self.success {
            out.push(success_banner(success));
        }

        out.push("Agents:".bold().to_string());
        if self.agents.is_empty() {
            out.push(format!(
                "  {}",
                placeholder("No agents available. Create one in the agents tab first.")
            ));
        }
        for agent in &self.agents {
            let marker = if agent.id == self.form.agent_id {
                "▸".green().bold().to_string()
            } else {
                " ".to_string()
            };
            out.push(format!(
                "  {marker} {} ({}) {}",
                agent.name,
                agent.scenario_type,
                agent.id.dimmed()
            ));
        }

        let f = &self.form;
        out.push(String::new());
        out.push(format!("  {:<14} {}", "Driver Name:", f.driver_name));
        out.push(format!("  {:<14} {}", "Driver Phone:", f.driver_phone));
        out.push(format!("  {:<14} {}", "Load Number:", f.load_number));

        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str) -> Agent {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Agent {id}"),
            "system_prompt": "Hi {driver_name}, load {load_number}",
            "scenario_type": "dispatch",
        }))
        .unwrap()
    }

    #[test]
    fn select_agent_only_accepts_listed_agents() {
        let mut view = CallTriggerView::new();
        view.agents = vec![agent("a1"), agent("a2")];

        assert!(view.select_agent("a2"));
        assert_eq!(view.form().agent_id, "a2");
        assert!(!view.select_agent("zzz"));
        assert_eq!(view.form().agent_id, "a2");
    }

    #[test]
    fn reset_form_reselects_first_agent() {
        let mut view = CallTriggerView::new();
        view.agents = vec![agent("a1"), agent("a2")];
        view.form = TriggerCallRequest {
            agent_id: "a2".to_string(),
            driver_name: "Ann".to_string(),
            driver_phone: "+15550001111".to_string(),
            load_number: "L-9".to_string(),
        };

        view.reset_form();
        assert_eq!(view.form().agent_id, "a1");
        assert!(view.form().driver_name.is_empty());
        assert!(view.form().load_number.is_empty());
    }

    #[test]
    fn render_marks_selected_agent() {
        colored::control::set_override(false);
        let mut view = CallTriggerView::new();
        view.agents = vec![agent("a1"), agent("a2")];
        view.form.agent_id = "a2".to_string();

        let text = view.render();
        assert!(text.contains("▸ Agent a2 (dispatch)"));
        assert!(text.contains("  Agent a1 (dispatch)"));
    }

    #[test]
    fn render_without_agents_shows_placeholder() {
        colored::control::set_override(false);
        let view = CallTriggerView::new();
        assert!(view.render().contains("No agents available"));
    }
}
