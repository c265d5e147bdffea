//! Agent management view: list, create, edit and delete agents.

use colored::Colorize;
use tracing::{info, warn};

use crate::api::Backend;
use crate::config::schema::DisplayConfig;
use crate::models::{Agent, AgentForm};

use super::{LoadState, error_banner, field, format_timestamp, heading, placeholder, truncate};

const FETCH_FAILED: &str = "Failed to fetch agents";
const SAVE_FAILED: &str = "Operation failed";
const DELETE_FAILED: &str = "Failed to delete agent";
const GET_FAILED: &str = "Failed to fetch agent";

/// Whether the agent form is showing, and for what.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Hidden,
    Create,
    Edit { agent_id: String },
}

/// Result of submitting the agent form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Saved and the list re-fetched; the form is closed.
    Saved,
    /// Required fields are blank; nothing was sent.
    Incomplete(Vec<&'static str>),
    /// The backend refused or was unreachable; the form stays open.
    Rejected,
    /// No form is open.
    NotOpen,
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user did not confirm; nothing was sent.
    Declined,
    Failed,
}

/// State of the agent management tab.
#[derive(Debug, Default)]
pub struct AgentManagementView {
    agents: Vec<Agent>,
    state: LoadState,
    error: Option<String>,
    form: FormMode,
    draft: AgentForm,
}

impl AgentManagementView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial fetch when the tab is shown.
    pub fn mount(&mut self, backend: &dyn Backend) {
        self.fetch(backend);
    }

    /// Replace the list with a fresh `GET /agents`. Returns whether it
    /// succeeded; on failure the previous list is kept and the error shown.
    pub fn fetch(&mut self, backend: &dyn Backend) -> bool {
        self.state = LoadState::Loading;
        match backend.list_agents() {
            Ok(list) => {
                self.agents = list.agents;
                self.state = LoadState::Ready;
                true
            }
            Err(err) => {
                warn!(error = %err, "agent list fetch failed");
                self.state = LoadState::Failed;
                self.error = Some(FETCH_FAILED.to_string());
                false
            }
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn form_mode(&self) -> &FormMode {
        &self.form
    }

    pub fn draft(&self) -> &AgentForm {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut AgentForm {
        &mut self.draft
    }

    pub fn find(&self, agent_id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == agent_id)
    }

    /// Show an empty create form.
    pub fn open_create(&mut self) {
        self.draft = AgentForm::default();
        self.form = FormMode::Create;
    }

    /// Show the edit form pre-populated from a listed agent. Returns `false`
    /// if the agent is not in the current list.
    pub fn open_edit(&mut self, agent_id: &str) -> bool {
        let Some(agent) = self.find(agent_id) else {
            return false;
        };
        let (draft, agent_id) = (AgentForm::from_agent(agent), agent.id.clone());
        self.draft = draft;
        self.form = FormMode::Edit { agent_id };
        true
    }

    /// Close the form and discard the draft.
    pub fn cancel_form(&mut self) {
        self.draft = AgentForm::default();
        self.form = FormMode::Hidden;
    }

    /// Send the draft as a create or update, then reload the list.
    pub fn submit(&mut self, backend: &dyn Backend) -> SubmitOutcome {
        if self.form == FormMode::Hidden {
            return SubmitOutcome::NotOpen;
        }

        let missing = self.draft.missing_fields();
        if !missing.is_empty() {
            self.error = Some(format!("Missing required fields: {}", missing.join(", ")));
            return SubmitOutcome::Incomplete(missing);
        }

        self.error = None;
        let result = match &self.form {
            FormMode::Edit { agent_id } => backend.update_agent(agent_id, &self.draft),
            _ => backend.create_agent(&self.draft),
        };

        match result {
            Ok(saved) => {
                info!(agent_id = %saved.id, name = %saved.name, "agent saved");
                self.fetch(backend);
                self.cancel_form();
                SubmitOutcome::Saved
            }
            Err(err) => {
                self.error = Some(err.message_or(SAVE_FAILED).to_string());
                SubmitOutcome::Rejected
            }
        }
    }

    /// Delete an agent once `confirm` agrees, then reload the list.
    ///
    /// `confirm` receives the agent's name (or the id if it is not listed).
    pub fn delete(
        &mut self,
        backend: &dyn Backend,
        agent_id: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> DeleteOutcome {
        let label = self
            .find(agent_id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| agent_id.to_string());
        if !confirm(&label) {
            return DeleteOutcome::Declined;
        }

        match backend.delete_agent(agent_id) {
            Ok(response) => {
                info!(agent_id, message = %response.message, "agent deleted");
                self.fetch(backend);
                DeleteOutcome::Deleted
            }
            Err(err) => {
                warn!(agent_id, error = %err, "agent delete failed");
                self.error = Some(DELETE_FAILED.to_string());
                DeleteOutcome::Failed
            }
        }
    }

    /// Fetch a single agent with `GET /agents/{id}`.
    pub fn inspect(&mut self, backend: &dyn Backend, agent_id: &str) -> Option<Agent> {
        match backend.get_agent(agent_id) {
            Ok(agent) => Some(agent),
            Err(err) => {
                warn!(agent_id, error = %err, "agent fetch failed");
                self.error = Some(err.message_or(GET_FAILED).to_string());
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn render(&self, display: &DisplayConfig) -> String {
        if self.state == LoadState::Loading {
            return "Loading agents...".to_string();
        }

        let mut out = vec![heading("Agent Configuration", 50)];

        if let Some(error) = &self.error {
            out.push(error_banner(error));
        }

        if self.agents.is_empty() {
            if self.state == LoadState::Ready {
                out.push(placeholder(
                    "No agents configured yet. Create one with `agents create`.",
                ));
            }
        } else {
            for agent in &self.agents {
                out.push(render_agent(agent, display));
            }
        }

        if self.form != FormMode::Hidden {
            out.push(self.render_form());
        }

        out.join("\n")
    }

    fn render_form(&self) -> String {
        let title = match &self.form {
            FormMode::Edit { .. } => "Edit Agent",
            _ => "Create New Agent",
        };
        let d = &self.draft;
        let mut lines = vec![
            String::new(),
            title.bold().to_string(),
            format!("  {:<26} {}", "Agent Name:", d.name),
            format!("  {:<26} {}", "System Prompt:", d.system_prompt),
            format!("  {:<26} {}", "Scenario Type:", d.scenario_type),
            format!("  {:<26} {}", "Voice:", d.voice_settings.voice),
            format!("  {:<26} {}", "Speed:", d.voice_settings.speed),
            format!(
                "  {:<26} {}",
                "Interruption Sensitivity:", d.voice_settings.interruption_sensitivity
            ),
            format!(
                "  {:<26} {}",
                "Backchanneling:",
                on_off(d.voice_settings.backchanneling)
            ),
        ];

        let missing = d.missing_placeholders();
        if !d.system_prompt.is_empty() && !missing.is_empty() {
            lines.push(
                format!("  prompt should include {}", missing.join(" and "))
                    .dimmed()
                    .to_string(),
            );
        }
        lines.join("\n")
    }
}

fn render_agent(agent: &Agent, display: &DisplayConfig) -> String {
    let v = &agent.voice_settings;
    [
        String::new(),
        format!("{} {}", agent.name.bold(), agent.id.dimmed()),
        format!("  Type: {}", agent.scenario_type.to_string().bold()),
        format!(
            "  {}",
            truncate(&agent.system_prompt, display.prompt_preview_chars)
        ),
        format!(
            "  {}",
            format!(
                "Voice: {} | Speed: {} | Interruption: {} | Backchanneling: {}",
                v.voice,
                v.speed,
                v.interruption_sensitivity,
                on_off(v.backchanneling)
            )
            .dimmed()
        ),
    ]
    .join("\n")
}

/// Full record for a single agent, prompt included.
pub fn render_agent_detail(agent: &Agent, display: &DisplayConfig) -> String {
    let v = &agent.voice_settings;
    let mut out = vec![
        heading(&agent.name, 50),
        field("ID", Some(&agent.id)),
        field("Type", Some(agent.scenario_type.as_str())),
        field("Voice", Some(v.voice.as_str())),
        field("Speed", Some(&v.speed.to_string())),
        field(
            "Interruption Sensitivity",
            Some(&v.interruption_sensitivity.to_string()),
        ),
        field("Backchanneling", Some(on_off(v.backchanneling))),
        field(
            "Active",
            agent.is_active.map(|a| if a { "yes" } else { "no" }),
        ),
        format!(
            "  {} {}",
            "Created:".bold(),
            format_timestamp(agent.created_at.as_deref(), &display.timestamp_format)
        ),
        format!(
            "  {} {}",
            "Updated:".bold(),
            format_timestamp(agent.updated_at.as_deref(), &display.timestamp_format)
        ),
        String::new(),
        "System Prompt".bold().to_string(),
    ];
    out.extend(agent.system_prompt.lines().map(|line| format!("  {line}")));
    out.join("\n")
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
