//! Ordered command registry.
//!
//! Commands are tried in registration order and the first match wins. The
//! synthesized `help` command, once prepended, sits at position 0. The
//! registry is filled during setup and then frozen inside the running bot,
//! so lookups need no locking.

use super::command::{BoxedHandler, Command, CommandHandler};
use super::context::{MatchSource, Request, ResponseWriter};
use async_trait::async_trait;
use slirc_pattern::{ParameterSet, duplicate_parameters, render_help_line};
use std::sync::Arc;
use tracing::{debug, warn};

/// Keyword of the synthesized help command.
pub const HELP_COMMAND: &str = "help";

/// The command chosen for a message and what it captured.
#[derive(Debug)]
pub struct CommandMatch<'a> {
    pub command: &'a Command,
    pub parameters: ParameterSet,
    pub source: MatchSource,
}

/// Registry of commands in match order.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    help_prepended: bool,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command. Duplicate patterns are kept; the earlier one wins.
    pub fn register(&mut self, usage: &str, description: &str, handler: BoxedHandler) {
        let command = Command::new(usage, description, handler);
        let dupes = duplicate_parameters(command.tokens());
        if !dupes.is_empty() {
            warn!(usage = %usage, params = ?dupes, "Pattern repeats parameter names; last value wins");
        }
        debug!(usage = %usage, position = self.commands.len(), "Registered command");
        self.commands.push(command);
    }

    /// Insert the `help` command at position 0.
    ///
    /// Without a custom handler, the default one replies with one rendered
    /// line per command registered so far. Only the first call has effect.
    pub fn prepend_help(&mut self, handler: Option<BoxedHandler>) {
        if self.help_prepended {
            warn!("Help command already installed");
            return;
        }
        let handler: BoxedHandler = match handler {
            Some(handler) => handler,
            None => Arc::new(DefaultHelp {
                text: self.help_text(),
            }),
        };
        self.commands
            .insert(0, Command::new(HELP_COMMAND, HELP_COMMAND, handler));
        self.help_prepended = true;
    }

    /// Render the help listing for all user commands.
    ///
    /// The synthesized help command never lists itself.
    pub fn help_text(&self) -> String {
        let lines: Vec<String> = self
            .user_commands()
            .iter()
            .map(|c| render_help_line(c.tokens(), c.description()))
            .collect();
        if lines.is_empty() {
            return String::new();
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Find the first command matching the text or, failing that, the
    /// attachment pretext.
    pub fn find_match(&self, text: &str, pretext: Option<&str>) -> Option<CommandMatch<'_>> {
        self.commands.iter().find_map(|command| {
            if let Some(parameters) = command.matches(text) {
                return Some(CommandMatch {
                    command,
                    parameters,
                    source: MatchSource::Text,
                });
            }
            pretext
                .and_then(|p| command.matches(p))
                .map(|parameters| CommandMatch {
                    command,
                    parameters,
                    source: MatchSource::Attachment,
                })
        })
    }

    /// All commands in match order, help first when installed.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn has_help(&self) -> bool {
        self.help_prepended
    }

    fn user_commands(&self) -> &[Command] {
        if self.help_prepended {
            &self.commands[1..]
        } else {
            &self.commands
        }
    }
}

/// Replies with the listing rendered when help was installed.
struct DefaultHelp {
    text: String,
}

#[async_trait]
impl CommandHandler for DefaultHelp {
    async fn handle(&self, _request: Request, response: ResponseWriter) {
        response.reply(&self.text).await;
    }
}
