//! Unified error handling for slirc-bot.
//!
//! The dispatch loop itself has exactly one failure mode, an invalid
//! authentication token reported by the transport. Everything else is either
//! forwarded to the optional error callback or logged and dropped.

use thiserror::Error;

// ============================================================================
// Bot Errors (dispatch loop)
// ============================================================================

/// Errors that end [`Bot::run`](crate::Bot::run).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BotError {
    /// The transport rejected the bot's credentials.
    #[error("invalid token")]
    InvalidToken,
}

impl BotError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "invalid_token",
        }
    }
}

// ============================================================================
// Transport Errors (outbound delivery)
// ============================================================================

/// Errors raised by a [`Transport`](crate::Transport) when sending.
///
/// These never reach command handlers; the response writer logs them.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,

    #[error("send failed: {0}")]
    Send(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Send(_) => "send",
            Self::Io(_) => "io",
        }
    }
}

/// Result type for transport operations.
pub type TransportResult = Result<(), TransportError>;
