use clap::{Parser, Subcommand, ValueEnum};
use snafu::prelude::*;

use crate::caller::Caller;
use crate::error::{CommandSnafu, NotACommandSnafu, Result};
use crate::logger::Logger;
use crate::palette::{Color, ColorTable};
use crate::severity::Severity;

const PREFIX: &str = "/log";

#[derive(Parser, Debug)]
#[command(name = "/log")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show or set the severity filter
    Level {
        /// all, information, warning, error, exception or none
        level: Option<Severity>,
    },
    /// Show or switch the editor channel
    Editor { state: Option<Toggle> },
    /// Color the prefix of an identity
    Color { identity: String, color: Color },
    /// Remove the color of an identity
    Uncolor { identity: String },
    /// Print filter, editor channel and colors
    Status,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

/// Chat-style admin commands for a running logger, e.g. `/log level warning`.
pub struct Console<'a> {
    logger: &'a Logger,
    palette: &'a ColorTable,
}

impl<'a> Console<'a> {
    pub fn new(logger: &'a Logger, palette: &'a ColorTable) -> Self {
        Self { logger, palette }
    }

    pub fn is_command(input: &str) -> bool {
        input.split_whitespace().next() == Some(PREFIX)
    }

    /// Parses and applies one input line, returning the reply.
    pub fn run(&self, input: &str) -> Result<String> {
        ensure!(Self::is_command(input), NotACommandSnafu { input });
        let cli = Cli::try_parse_from(input.split_whitespace()).context(CommandSnafu)?;
        Ok(self.execute(cli.command))
    }

    pub fn execute(&self, command: Command) -> String {
        match command {
            Command::Level { level: None } => format!("level: {}", self.logger.filter()),
            Command::Level { level: Some(level) } => {
                self.logger.set_filter(level);
                self.applied(format!("level set to {}", self.logger.filter()))
            }
            Command::Editor { state: None } => {
                format!("editor: {}", on_off(self.logger.config().editor_enabled()))
            }
            Command::Editor { state: Some(state) } => {
                let enabled = state == Toggle::On;
                self.logger.config().set_editor_enabled(enabled);
                self.applied(format!("editor {}", on_off(enabled)))
            }
            Command::Color { identity, color } => {
                let reply = format!("{identity} colored {color}");
                self.palette.set(identity, color);
                self.applied(reply)
            }
            Command::Uncolor { identity } if self.palette.remove(&identity) => {
                self.applied(format!("{identity} uncolored"))
            }
            Command::Uncolor { identity } => format!("{identity} has no color"),
            Command::Status => self.status(),
        }
    }

    /// Reports a change through the logger itself.
    fn applied(&self, reply: String) -> String {
        self.logger.log_as(
            &Caller::named("Console"),
            Severity::Information,
            reply.as_str(),
            None,
        );
        reply
    }

    fn status(&self) -> String {
        let mut lines = vec![
            format!("level: {}", self.logger.filter()),
            format!("editor: {}", on_off(self.logger.config().editor_enabled())),
        ];
        let colors = self.palette.snapshot();
        if colors.is_empty() {
            lines.push("colors: none".to_string());
        }
        for (identity, color) in colors {
            lines.push(format!("{identity}: {color}"));
        }
        lines.join("\n")
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
