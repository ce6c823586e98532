//! Prometheus metrics collection for slirc-bot.
//!
//! Collectors live in `OnceLock`s and are registered by [`init`]. Recording
//! helpers are no-ops until then, so library users who never call `init`
//! pay nothing.
//!
//! - `bot_events_total{kind}` - inbound events by kind
//! - `bot_messages_dropped_total{reason}` - messages filtered before matching
//! - `bot_command_total{command}` - handler invocations by usage pattern
//! - `bot_command_duration_seconds{command}` - handler latency histogram

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::{Once, OnceLock};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// Inbound events by kind.
pub static EVENTS: OnceLock<IntCounterVec> = OnceLock::new();

/// Messages dropped before matching, by reason.
pub static MESSAGES_DROPPED: OnceLock<IntCounterVec> = OnceLock::new();

/// Command handler invocations by usage pattern.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Messages handed to the default message handler.
pub static DEFAULT_HANDLED: OnceLock<IntCounter> = OnceLock::new();

/// Handler tasks that panicked or ran out of time.
pub static HANDLER_FAILURES: OnceLock<IntCounterVec> = OnceLock::new();

/// Replies the transport failed to deliver.
pub static REPLIES_FAILED: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Histograms
// ========================================================================

/// Handler latency by usage pattern.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Call at startup before any metrics are recorded. Later calls are no-ops.
pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(register_all);
}

fn register_all() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(EVENTS, IntCounterVec::new(Opts::new("bot_events_total", "Inbound events by kind"), &["kind"]));
    register!(MESSAGES_DROPPED, IntCounterVec::new(Opts::new("bot_messages_dropped_total", "Messages dropped before matching"), &["reason"]));
    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("bot_command_total", "Command handler invocations"), &["command"]));
    register!(DEFAULT_HANDLED, IntCounter::new("bot_default_handler_total", "Messages handled by the default handler"));
    register!(HANDLER_FAILURES, IntCounterVec::new(Opts::new("bot_handler_failures_total", "Handler panics and timeouts"), &["kind"]));
    register!(REPLIES_FAILED, IntCounterVec::new(Opts::new("bot_replies_failed_total", "Replies the transport failed to deliver"), &["error"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("bot_command_duration_seconds", "Command handler latency")
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
        &["command"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Recording helpers
// ============================================================================

fn inc_labeled(metric: &OnceLock<IntCounterVec>, label: &str) {
    if let Some(c) = metric.get() {
        c.with_label_values(&[label]).inc();
    }
}

#[inline]
pub fn record_event(kind: &str) {
    inc_labeled(&EVENTS, kind);
}

#[inline]
pub fn record_dropped(reason: &str) {
    inc_labeled(&MESSAGES_DROPPED, reason);
}

/// Record a command execution with latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    inc_labeled(&COMMAND_COUNTER, command);
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

#[inline]
pub fn record_default_handled() {
    if let Some(c) = DEFAULT_HANDLED.get() {
        c.inc();
    }
}

/// Record a handler panic or timeout.
#[inline]
pub fn record_handler_failure(kind: &str) {
    inc_labeled(&HANDLER_FAILURES, kind);
}

#[inline]
pub fn record_reply_failed(error: &str) {
    inc_labeled(&REPLIES_FAILED, error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_lifecycle() {
        init();

        record_command("ping", 0.001);
        record_event("message");
        record_dropped("unaddressed");

        let output = gather_metrics();
        assert!(output.contains("bot_command_total"));
        assert!(output.contains("bot_events_total"));
        assert!(output.contains("bot_messages_dropped_total"));
    }

    #[test]
    fn init_twice_keeps_registered_collectors() {
        init();
        init();
        record_default_handled();
        assert!(gather_metrics().contains("bot_default_handler_total"));
    }
}
