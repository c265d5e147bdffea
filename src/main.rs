use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};

use callboard::api::ApiClient;
use callboard::shell::{Shell, Tab, ViewCommand, repl};
use callboard::{cli, config, logging};

#[derive(Debug, Parser)]
#[command(name = "callboard")]
#[command(about = "Manage voice agents, trigger test calls and review call history")]
#[command(version)]
struct App {
    /// Backend origin, overriding config and CALLBOARD_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Enable debug diagnostics on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(flatten)]
    View(ViewCommand),
    /// Open the interactive console (the default with no subcommand)
    Shell {
        /// Tab to open first
        #[arg(long, value_enum, default_value_t = Tab::Trigger)]
        tab: Tab,
    },
    /// Check backend reachability and config files
    Health,
    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective merged configuration
    Show,
    /// Write a default ~/.callboard/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `api.base_url`
    Set { key: String, value: String },
    /// Restore the global config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    let mut cfg = config::load();
    if let Some(url) = app.api_url {
        cfg.api.base_url = url;
    }
    logging::init(cfg.logging.level, app.verbose);
    colored::control::set_override(cfg.display.color);
    tracing::debug!(base_url = %cfg.api.base_url, prefix = %cfg.api.prefix, "config loaded");

    let client = ApiClient::from_config(&cfg.api);

    match app.command.unwrap_or(Commands::Shell { tab: Tab::Trigger }) {
        Commands::View(command) => {
            let mut shell = Shell::new(client, cfg.display, command.tab());
            let text = shell.execute(command, |name| {
                repl::confirm_delete(&mut io::stdin().lock(), &mut io::stdout(), name)
                    .unwrap_or(false)
            })?;
            println!("{text}");
            Ok(())
        }
        Commands::Shell { tab } => {
            let mut shell = Shell::new(client, cfg.display, tab);
            repl::run(&mut shell, io::stdin().lock(), &mut io::stdout())
        }
        Commands::Health => cli::run_health(&cfg),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(&cfg),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
