//! Per-message request and reply capability handed to handlers.

use crate::event::MessageEvent;
use crate::transport::Transport;
use slirc_pattern::ParameterSet;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use uuid::Uuid;

/// Which part of the message produced the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    /// The message text.
    Text,
    /// The first attachment's pretext.
    Attachment,
    /// Nothing matched; the default message handler is running.
    Default,
}

/// Immutable bundle describing one dispatched message.
///
/// The context token is never cancelled by the dispatcher unless a handler
/// timeout is configured; handlers pass it on to their own downstream work.
#[derive(Debug, Clone)]
pub struct Request {
    id: Uuid,
    context: CancellationToken,
    event: Arc<MessageEvent>,
    parameters: ParameterSet,
    source: MatchSource,
}

impl Request {
    pub fn new(
        id: Uuid,
        context: CancellationToken,
        event: Arc<MessageEvent>,
        parameters: ParameterSet,
        source: MatchSource,
    ) -> Self {
        Self {
            id,
            context,
            event,
            parameters,
            source,
        }
    }

    /// Correlation id, also recorded on the dispatch span.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn context(&self) -> &CancellationToken {
        &self.context
    }

    /// The raw message event.
    pub fn event(&self) -> &MessageEvent {
        &self.event
    }

    pub fn channel(&self) -> &str {
        &self.event.channel
    }

    pub fn user(&self) -> &str {
        &self.event.user
    }

    pub fn text(&self) -> &str {
        &self.event.text
    }

    pub fn source(&self) -> MatchSource {
        self.source
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.parameters.get(name)
    }

    pub fn string_param(&self, name: &str, default: &str) -> String {
        self.parameters.string_param(name, default)
    }

    pub fn bool_param(&self, name: &str, default: bool) -> bool {
        self.parameters.bool_param(name, default)
    }

    pub fn integer_param(&self, name: &str, default: i64) -> i64 {
        self.parameters.integer_param(name, default)
    }

    pub fn float_param(&self, name: &str, default: f64) -> f64 {
        self.parameters.float_param(name, default)
    }
}

/// Reply capability bound to the channel a message came from.
///
/// Delivery failures are logged and counted, never returned.
#[derive(Clone)]
pub struct ResponseWriter {
    channel: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ResponseWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseWriter")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

impl ResponseWriter {
    pub fn new(channel: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            channel: channel.into(),
            transport,
        }
    }

    /// Channel this writer replies to.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Send `text` to the bound channel.
    pub async fn reply(&self, text: impl AsRef<str>) {
        if let Err(e) = self.transport.send(&self.channel, text.as_ref()).await {
            warn!(channel = %self.channel, error = %e, "Failed to deliver reply");
            crate::metrics::record_reply_failed(e.error_code());
        }
    }

    /// Send a formatted error notice to the bound channel.
    pub async fn report_error(&self, err: impl fmt::Display) {
        self.reply(format!("*Error:* _{err}_")).await;
    }

    /// Show a typing indicator on the bound channel.
    pub async fn typing(&self) {
        if let Err(e) = self.transport.typing(&self.channel).await {
            warn!(channel = %self.channel, error = %e, "Failed to send typing indicator");
            crate::metrics::record_reply_failed(e.error_code());
        }
    }
}
