//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`defaults`]: serde default value functions
//! - [`validation`]: startup checks collecting every problem at once
//!
//! All sections are optional; an empty file yields a working console bot.

mod defaults;
pub mod validation;

pub use validation::{ValidationError, validate};

use defaults::*;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Bot identity and addressing.
    #[serde(default)]
    pub bot: BotConfig,
    /// Dispatch loop tuning.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Logging output.
    #[serde(default)]
    pub log: LogConfig,
    /// Prometheus endpoint.
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Console transport used by the bundled binary.
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Bot identity and addressing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Name used in logs.
    #[serde(default = "default_bot_name")]
    pub name: String,
    /// Channel id prefix marking one-to-one conversations (default: "D").
    #[serde(default = "default_direct_channel_prefix")]
    pub direct_channel_prefix: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            direct_channel_prefix: default_direct_channel_prefix(),
        }
    }
}

/// Dispatch loop configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DispatchConfig {
    /// Cap on concurrently running handlers. Unset means unbounded.
    /// When the cap is reached, intake waits for a slot.
    #[serde(default)]
    pub max_in_flight: Option<usize>,
    /// Per-handler time budget in milliseconds. Unset means no limit.
    #[serde(default)]
    pub handler_timeout_ms: Option<u64>,
    /// Drop messages posted by other bots and the platform's system user.
    #[serde(default)]
    pub ignore_bot_messages: bool,
    /// Remove the bot's mention token from text before matching.
    #[serde(default)]
    pub strip_mention: bool,
}

impl DispatchConfig {
    pub fn handler_timeout(&self) -> Option<Duration> {
        self.handler_timeout_ms.map(Duration::from_millis)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration. `RUST_LOG` overrides `filter`.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

/// Prometheus endpoint configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    /// Port for `GET /metrics`. Unset disables the endpoint.
    #[serde(default)]
    pub port: Option<u16>,
}

/// Console transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Channel plain input lines are posted to.
    #[serde(default = "default_console_channel")]
    pub channel: String,
    /// User plain input lines are posted as.
    #[serde(default = "default_console_user")]
    pub user: String,
    /// The bot's own user id.
    #[serde(default = "default_console_bot_user")]
    pub bot_user: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            channel: default_console_channel(),
            user: default_console_user(),
            bot_user: default_console_bot_user(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").expect("empty config parses");
        assert_eq!(config.bot.direct_channel_prefix, "D");
        assert_eq!(config.log.filter, "info");
        assert_eq!(config.log.format, LogFormat::Text);
        assert!(config.dispatch.max_in_flight.is_none());
        assert!(config.dispatch.handler_timeout().is_none());
        assert!(!config.dispatch.ignore_bot_messages);
        assert!(config.metrics.port.is_none());
        assert_eq!(config.console.channel, "DCONSOLE");
    }

    #[test]
    fn parses_all_sections() {
        let config = Config::parse(
            r#"
            [bot]
            name = "deploybot"
            direct_channel_prefix = "DM"

            [dispatch]
            max_in_flight = 16
            handler_timeout_ms = 2500
            ignore_bot_messages = true
            strip_mention = true

            [log]
            filter = "slirc_bot=debug"
            format = "json"

            [metrics]
            port = 9100

            [console]
            channel = "DTEST"
            user = "UME"
            bot_user = "UDEPLOY"
            "#,
        )
        .expect("config parses");
        assert_eq!(config.bot.name, "deploybot");
        assert_eq!(config.bot.direct_channel_prefix, "DM");
        assert_eq!(config.dispatch.max_in_flight, Some(16));
        assert_eq!(config.dispatch.handler_timeout(), Some(Duration::from_millis(2500)));
        assert!(config.dispatch.ignore_bot_messages);
        assert!(config.dispatch.strip_mention);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.metrics.port, Some(9100));
        assert_eq!(config.console.bot_user, "UDEPLOY");
    }

    #[test]
    fn rejects_unknown_log_format() {
        let err = Config::parse("[log]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[bot]\nname = \"filebot\"").expect("write");
        let config = Config::load(file.path()).expect("load");
        assert_eq!(config.bot.name, "filebot");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Config::load("/nonexistent/slircbot.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
