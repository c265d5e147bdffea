//! Interactive console loop.
//!
//! Each input line is split with shell quoting rules and parsed with the same
//! clap grammar as the one-shot CLI, plus a few console-only commands.

use std::io::{BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::api::Backend;

use super::{Shell, Tab, ViewCommand};

#[derive(Debug, Parser)]
#[command(name = "callboard", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    #[command(flatten)]
    View(ViewCommand),
    /// Switch to another tab
    Tab {
        #[arg(value_enum)]
        tab: Tab,
    },
    /// Re-render the current tab
    Show,
    /// Close the call detail panel
    Close,
    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

/// Run the console until `quit` or end of input.
pub fn run<B: Backend>(
    shell: &mut Shell<B>,
    mut input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "{}", shell.render())?;

    let mut line = String::new();
    loop {
        write!(out, "\n{} ", format!("callboard[{}]>", shell.active_tab()).bold())?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let words = match shell_words::split(trimmed) {
            Ok(words) => words,
            Err(err) => {
                writeln!(out, "{} {err}", "✗".red().bold())?;
                continue;
            }
        };
        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(err) => {
                // Also covers `help` and `--help`, which clap reports as errors.
                write!(out, "{}", err.render())?;
                continue;
            }
        };

        match parsed.command {
            ShellCommand::Quit => return Ok(()),
            ShellCommand::Tab { tab } => {
                shell.switch(tab);
                writeln!(out, "{}", shell.render())?;
            }
            ShellCommand::Show => writeln!(out, "{}", shell.render())?,
            ShellCommand::Close => {
                shell.close();
                writeln!(out, "{}", shell.render_view())?;
            }
            ShellCommand::View(command) => {
                let text = shell.execute(command, |name| {
                    confirm_delete(&mut input, &mut *out, name).unwrap_or(false)
                })?;
                writeln!(out, "{text}")?;
            }
        }
    }
}

/// Ask whether to delete `name`; only `y`/`yes` agrees.
pub fn confirm_delete(
    input: &mut impl BufRead,
    out: &mut impl Write,
    name: &str,
) -> Result<bool> {
    write!(
        out,
        "Are you sure you want to delete this agent ({name})? [y/N] "
    )?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::AgentAction;

    #[test]
    fn parses_view_commands_with_quotes() {
        let words =
            shell_words::split(r#"agents create --name "Night Dispatch" --prompt 'Hi {driver_name}'"#)
                .unwrap();
        let parsed = ShellLine::try_parse_from(words).unwrap();
        let ShellCommand::View(ViewCommand::Agents {
            action: AgentAction::Create(fields),
        }) = parsed.command
        else {
            panic!("expected agents create");
        };
        assert_eq!(fields.name.as_deref(), Some("Night Dispatch"));
        assert_eq!(fields.system_prompt.as_deref(), Some("Hi {driver_name}"));
    }

    #[test]
    fn parses_console_commands() {
        let parsed = ShellLine::try_parse_from(["tab", "history"]).unwrap();
        assert!(matches!(parsed.command, ShellCommand::Tab { tab: Tab::History }));

        let parsed = ShellLine::try_parse_from(["exit"]).unwrap();
        assert!(matches!(parsed.command, ShellCommand::Quit));
    }

    #[test]
    fn rejects_unknown_tab() {
        assert!(ShellLine::try_parse_from(["tab", "settings"]).is_err());
    }

    #[test]
    fn confirm_delete_accepts_only_yes() {
        let mut out = Vec::new();
        assert!(confirm_delete(&mut "y\n".as_bytes(), &mut out, "Bot").unwrap());
        assert!(confirm_delete(&mut "YES\n".as_bytes(), &mut out, "Bot").unwrap());
        assert!(!confirm_delete(&mut "\n".as_bytes(), &mut out, "Bot").unwrap());
        assert!(!confirm_delete(&mut "nope\n".as_bytes(), &mut out, "Bot").unwrap());
        assert!(String::from_utf8(out).unwrap().contains("[y/N]"));
    }
}
