//! Telemetry utilities for handler timing and dispatch spans.

use std::time::Instant;

/// Guard for timing handler execution and recording metrics.
///
/// Records latency when dropped, so a panicking handler is still measured.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_command(&self.command, duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};
    use uuid::Uuid;

    /// Span for one dispatched message.
    pub fn dispatch(request_id: Uuid, channel: &str, user: &str) -> Span {
        info_span!("dispatch", request_id = %request_id, channel = %channel, user = %user)
    }

    /// Span for one handler invocation.
    pub fn command(usage: &str, source: &str) -> Span {
        info_span!("command", usage = %usage, source = %source)
    }

    /// Span for a lifecycle callback (init, error, default event).
    pub fn callback(kind: &str) -> Span {
        info_span!("callback", kind = %kind)
    }
}
