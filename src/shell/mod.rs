//! Tab router for the console.
//!
//! Exactly one view is mounted at a time. Switching tabs drops the previous
//! view and its state; the new view performs its initial fetch on mount.
pub mod commands;
pub mod repl;

use std::fmt;

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;

use crate::api::Backend;
use crate::config::schema::DisplayConfig;
use crate::views::agents::{DeleteOutcome, FormMode, render_agent_detail};
use crate::views::{AgentManagementView, CallHistoryView, CallTriggerView, LoadState};

pub use commands::{AgentAction, AgentFields, CallAction, TriggerArgs, ViewCommand};

/// The three console tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Tab {
    #[default]
    Trigger,
    Agents,
    History,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Trigger, Tab::Agents, Tab::History];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Trigger => "Trigger Call",
            Tab::Agents => "Agent Configuration",
            Tab::History => "Call History",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Trigger => "trigger",
            Tab::Agents => "agents",
            Tab::History => "history",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The view currently mounted by the shell.
#[derive(Debug)]
pub enum MountedView {
    Trigger(CallTriggerView),
    Agents(AgentManagementView),
    History(CallHistoryView),
}

impl MountedView {
    pub fn tab(&self) -> Tab {
        match self {
            MountedView::Trigger(_) => Tab::Trigger,
            MountedView::Agents(_) => Tab::Agents,
            MountedView::History(_) => Tab::History,
        }
    }
}

/// Console state: a backend, display settings and the one mounted view.
pub struct Shell<B: Backend> {
    backend: B,
    display: DisplayConfig,
    view: MountedView,
    /// Set on mount, cleared by the first command, so a list command right
    /// after mounting does not fetch the same list twice.
    fresh: bool,
}

impl<B: Backend> Shell<B> {
    /// Create a shell with `tab` mounted.
    pub fn new(backend: B, display: DisplayConfig, tab: Tab) -> Self {
        let view = mount(&backend, tab);
        Self {
            backend,
            display,
            view,
            fresh: true,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn active_tab(&self) -> Tab {
        self.view.tab()
    }

    pub fn view(&self) -> &MountedView {
        &self.view
    }

    /// Mount `tab`, discarding the current view. Re-selecting the active tab
    /// keeps it mounted. Returns whether a new view was mounted.
    pub fn switch(&mut self, tab: Tab) -> bool {
        if tab == self.active_tab() {
            return false;
        }
        tracing::debug!(from = %self.active_tab(), to = %tab, "switching tab");
        self.view = mount(&self.backend, tab);
        self.fresh = true;
        true
    }

    /// Render the tab bar followed by the mounted view.
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.render_tabs(), self.render_view())
    }

    pub fn render_tabs(&self) -> String {
        let active = self.active_tab();
        Tab::ALL
            .iter()
            .map(|&tab| {
                let label = format!("[{}] {}", tab.as_str(), tab.label());
                if tab == active {
                    label.bold().cyan().to_string()
                } else {
                    label.dimmed().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    pub fn render_view(&self) -> String {
        match &self.view {
            MountedView::Trigger(v) => v.render(),
            MountedView::Agents(v) => v.render(&self.display),
            MountedView::History(v) => v.render(&self.display),
        }
    }

    /// Close the call detail panel if one is open.
    pub fn close(&mut self) -> bool {
        match &mut self.view {
            MountedView::History(v) if v.selected().is_some() => {
                v.close_details();
                true
            }
            _ => false,
        }
    }

    /// Run a view command, switching to its tab first, and return the text
    /// to show. `confirm` is asked before a delete unless `--yes` was given.
    pub fn execute(
        &mut self,
        command: ViewCommand,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<String> {
        self.switch(command.tab());
        let fresh = std::mem::take(&mut self.fresh);
        let backend = &self.backend;
        let display = &self.display;

        match (command, &mut self.view) {
            (ViewCommand::Agents { action }, MountedView::Agents(view)) => {
                run_agent_action(view, backend, display, action, fresh, confirm)
            }
            (ViewCommand::Trigger(args), MountedView::Trigger(view)) => {
                if let Some(agent_id) = &args.agent
                    && !view.select_agent(agent_id)
                {
                    return Ok(format!("Unknown agent: {agent_id}").red().to_string());
                }
                args.apply_to(view.form_mut());
                view.submit(backend);
                Ok(view.render())
            }
            (ViewCommand::Calls { action }, MountedView::History(view)) => match action {
                CallAction::List { json } => {
                    if !fresh {
                        view.fetch(backend);
                    }
                    if json && view.state() == LoadState::Ready {
                        return Ok(serde_json::to_string_pretty(view.calls())?);
                    }
                    Ok(view.render_list(display))
                }
                CallAction::Show { id, refresh } => {
                    if refresh {
                        view.close_details();
                        match backend.get_call(&id) {
                            Ok(call) => {
                                view.open_details(call);
                                view.apply_summary(backend.get_call_summary(&id));
                            }
                            Err(err) => {
                                return Ok(format!("✗ {}", err.message_or("Failed to fetch call"))
                                    .red()
                                    .to_string());
                            }
                        }
                    } else if !view.view_details(backend, &id) {
                        return Ok(view.render_list(display));
                    }
                    Ok(view.render_details(display))
                }
            },
            (_, view) => anyhow::bail!("command routed to the wrong tab: {}", view.tab()),
        }
    }
}

fn mount(backend: &dyn Backend, tab: Tab) -> MountedView {
    match tab {
        Tab::Trigger => {
            let mut view = CallTriggerView::new();
            view.mount(backend);
            MountedView::Trigger(view)
        }
        Tab::Agents => {
            let mut view = AgentManagementView::new();
            view.mount(backend);
            MountedView::Agents(view)
        }
        Tab::History => {
            let mut view = CallHistoryView::new();
            view.mount(backend);
            MountedView::History(view)
        }
    }
}

fn run_agent_action(
    view: &mut AgentManagementView,
    backend: &dyn Backend,
    display: &DisplayConfig,
    action: AgentAction,
    fresh: bool,
    confirm: impl FnOnce(&str) -> bool,
) -> Result<String> {
    match action {
        AgentAction::List { json } => {
            if !fresh {
                view.fetch(backend);
            }
            if json && view.state() == LoadState::Ready {
                return Ok(serde_json::to_string_pretty(view.agents())?);
            }
        }
        AgentAction::Show { id } => {
            if let Some(agent) = view.inspect(backend, &id) {
                return Ok(render_agent_detail(&agent, display));
            }
        }
        AgentAction::Create(fields) => {
            // Keep a draft left open by a failed create so it can be fixed.
            if view.form_mode() != &FormMode::Create {
                view.open_create();
            }
            fields.apply_to(view.draft_mut());
            view.submit(backend);
        }
        AgentAction::Edit { id, fields } => {
            let editing_same = matches!(
                view.form_mode(),
                FormMode::Edit { agent_id } if *agent_id == id
            );
            if !editing_same && !view.open_edit(&id) {
                return Ok(format!("Unknown agent: {id}").red().to_string());
            }
            fields.apply_to(view.draft_mut());
            view.submit(backend);
        }
        AgentAction::Delete { id, yes } => {
            let outcome = view.delete(backend, &id, |name| yes || confirm(name));
            if outcome == DeleteOutcome::Declined {
                return Ok("Delete cancelled.".dimmed().to_string());
            }
        }
        AgentAction::Cancel => view.cancel_form(),
    }
    Ok(view.render(display))
}
