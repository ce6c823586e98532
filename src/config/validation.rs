//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("bot.direct_channel_prefix must not be empty")]
    EmptyDirectChannelPrefix,
    #[error("dispatch.max_in_flight must be at least 1")]
    ZeroMaxInFlight,
    #[error("dispatch.handler_timeout_ms must be at least 1")]
    ZeroHandlerTimeout,
    #[error("console.{0} must not be empty")]
    EmptyConsoleField(&'static str),
    #[error("console.user must differ from console.bot_user, got '{0}'")]
    ConsoleUserIsBot(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.bot.direct_channel_prefix.is_empty() {
        errors.push(ValidationError::EmptyDirectChannelPrefix);
    }

    if config.dispatch.max_in_flight == Some(0) {
        errors.push(ValidationError::ZeroMaxInFlight);
    }
    if config.dispatch.handler_timeout_ms == Some(0) {
        errors.push(ValidationError::ZeroHandlerTimeout);
    }

    let console = &config.console;
    for (field, value) in [
        ("channel", &console.channel),
        ("user", &console.user),
        ("bot_user", &console.bot_user),
    ] {
        if value.is_empty() {
            errors.push(ValidationError::EmptyConsoleField(field));
        }
    }
    // Console input from the bot's own id would be dropped as self-origin.
    if !console.user.is_empty() && console.user == console.bot_user {
        errors.push(ValidationError::ConsoleUserIsBot(console.user.clone()));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
