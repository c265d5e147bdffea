//! Command grammar shared by the one-shot CLI and the interactive console.

use clap::{ArgAction, Args, Subcommand};

use crate::models::{AgentForm, ScenarioType, TriggerCallRequest, Voice};

use super::Tab;

/// An action against one of the three views.
#[derive(Debug, Clone, Subcommand)]
pub enum ViewCommand {
    /// List, create, edit or delete agents
    Agents {
        #[command(subcommand)]
        action: AgentAction,
    },
    /// Trigger a test call with an agent
    Trigger(TriggerArgs),
    /// Browse call history, transcripts and summaries
    Calls {
        #[command(subcommand)]
        action: CallAction,
    },
}

impl ViewCommand {
    /// The tab this command runs against.
    pub fn tab(&self) -> Tab {
        match self {
            Self::Agents { .. } => Tab::Agents,
            Self::Trigger(_) => Tab::Trigger,
            Self::Calls { .. } => Tab::History,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum AgentAction {
    /// Show all configured agents
    List {
        /// Print the raw agent list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch a single agent by id
    Show { id: String },
    /// Create a new agent (name and prompt are required)
    Create(AgentFields),
    /// Edit an existing agent; omitted fields keep their current value
    Edit {
        id: String,
        #[command(flatten)]
        fields: AgentFields,
    },
    /// Delete an agent
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Discard the open create/edit form
    Cancel,
}

/// Agent form fields. Each one that is given overwrites the draft.
#[derive(Debug, Clone, Default, Args)]
pub struct AgentFields {
    /// Agent name
    #[arg(long)]
    pub name: Option<String>,
    /// System prompt; should mention {driver_name} and {load_number}
    #[arg(long = "prompt")]
    pub system_prompt: Option<String>,
    /// Scenario type: dispatch or emergency
    #[arg(long)]
    pub scenario: Option<ScenarioType>,
    /// Voice: female or male
    #[arg(long)]
    pub voice: Option<Voice>,
    /// Speaking speed (0.5 - 2.0)
    #[arg(long)]
    pub speed: Option<f64>,
    /// Interruption sensitivity (0.0 - 1.0)
    #[arg(long)]
    pub interruption_sensitivity: Option<f64>,
    /// Backchanneling: true or false
    #[arg(long, action = ArgAction::Set)]
    pub backchanneling: Option<bool>,
}

impl AgentFields {
    pub fn apply_to(&self, form: &mut AgentForm) {
        if let Some(name) = &self.name {
            form.name = name.clone();
        }
        if let Some(prompt) = &self.system_prompt {
            form.system_prompt = prompt.clone();
        }
        if let Some(scenario) = self.scenario {
            form.scenario_type = scenario;
        }
        let voice = &mut form.voice_settings;
        if let Some(v) = self.voice {
            voice.voice = v;
        }
        if let Some(speed) = self.speed {
            voice.speed = speed;
        }
        if let Some(sensitivity) = self.interruption_sensitivity {
            voice.interruption_sensitivity = sensitivity;
        }
        if let Some(flag) = self.backchanneling {
            voice.backchanneling = flag;
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct TriggerArgs {
    /// Agent id; defaults to the first listed agent
    #[arg(long)]
    pub agent: Option<String>,
    #[arg(long)]
    pub driver_name: Option<String>,
    #[arg(long)]
    pub driver_phone: Option<String>,
    #[arg(long)]
    pub load_number: Option<String>,
}

impl TriggerArgs {
    /// Copy the given driver fields into the form. The agent is selected
    /// separately so it can be checked against the loaded list.
    pub fn apply_to(&self, form: &mut TriggerCallRequest) {
        if let Some(name) = &self.driver_name {
            form.driver_name = name.clone();
        }
        if let Some(phone) = &self.driver_phone {
            form.driver_phone = phone.clone();
        }
        if let Some(load) = &self.load_number {
            form.load_number = load.clone();
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum CallAction {
    /// Show all calls, newest first
    List {
        /// Print the raw call list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a call's details, transcript and summary
    Show {
        id: String,
        /// Re-fetch the call instead of using the loaded list
        #[arg(long)]
        refresh: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_fields_only_overwrite_given_values() {
        let mut form = AgentForm {
            name: "Old".to_string(),
            system_prompt: "Keep me".to_string(),
            ..AgentForm::default()
        };
        let fields = AgentFields {
            name: Some("New".to_string()),
            speed: Some(1.5),
            backchanneling: Some(false),
            ..AgentFields::default()
        };

        fields.apply_to(&mut form);
        assert_eq!(form.name, "New");
        assert_eq!(form.system_prompt, "Keep me");
        assert_eq!(form.voice_settings.speed, 1.5);
        assert!(!form.voice_settings.backchanneling);
        assert_eq!(form.voice_settings.voice, Voice::Female);
    }

    #[test]
    fn trigger_args_leave_agent_alone() {
        let mut form = TriggerCallRequest {
            agent_id: "a1".to_string(),
            ..TriggerCallRequest::default()
        };
        TriggerArgs {
            agent: Some("a2".to_string()),
            driver_name: Some("Ann".to_string()),
            ..TriggerArgs::default()
        }
        .apply_to(&mut form);
        assert_eq!(form.agent_id, "a1");
        assert_eq!(form.driver_name, "Ann");
    }

    #[test]
    fn command_tabs() {
        let cmd = ViewCommand::Calls {
            action: CallAction::List { json: false },
        };
        assert_eq!(cmd.tab(), Tab::History);
        assert_eq!(ViewCommand::Trigger(TriggerArgs::default()).tab(), Tab::Trigger);
    }
}
