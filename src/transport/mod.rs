//! Transport boundary.
//!
//! A transport owns the platform connection. The bot only needs three things
//! from it: who it is, how to send text to a channel, and the inbound
//! [`Event`](crate::Event) stream passed to [`Bot::run`](crate::Bot::run).

pub mod console;

pub use console::ConsoleTransport;

use crate::error::TransportResult;
use crate::event::Event;
use async_trait::async_trait;
use futures_util::Stream;
use std::pin::Pin;

/// Boxed inbound event stream.
pub type EventStream = Pin<Box<dyn Stream<Item = Event> + Send>>;

/// The bot's own platform identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Platform user id (e.g. `U024BE7LH`).
    pub user_id: String,
    /// Display name, when the platform reports one.
    pub name: Option<String>,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The token other users type to mention this bot.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }
}

/// Outbound side of a chat platform connection.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// The bot's identity, used for mention detection and self filtering.
    fn identity(&self) -> Identity;

    /// Deliver `text` to `channel`.
    async fn send(&self, channel: &str, text: &str) -> TransportResult;

    /// Show a typing indicator on `channel`.
    async fn typing(&self, _channel: &str) -> TransportResult {
        Ok(())
    }
}
