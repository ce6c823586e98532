//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Bot Defaults
// =============================================================================

pub fn default_bot_name() -> String {
    "slircbot".to_string()
}

/// Slack-style direct message channels start with `D`.
pub fn default_direct_channel_prefix() -> String {
    "D".to_string()
}

// =============================================================================
// Log Defaults
// =============================================================================

pub fn default_log_filter() -> String {
    "info".to_string()
}

// =============================================================================
// Console Defaults
// =============================================================================

pub fn default_console_channel() -> String {
    "DCONSOLE".to_string()
}

pub fn default_console_user() -> String {
    "UCONSOLE".to_string()
}

pub fn default_console_bot_user() -> String {
    "UBOT".to_string()
}
