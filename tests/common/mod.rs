//! Integration test common infrastructure.
//!
//! Provides a recording transport and helpers for building event streams
//! and asserting on what the bot sent back.

#![allow(dead_code)]

use async_trait::async_trait;
use futures_util::stream::{self, Stream};
use slirc_bot::{Event, Identity, MessageEvent, Transport, TransportResult};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Bot user id used by every test transport.
pub const BOT_USER: &str = "UBOT";

/// Transport that records every outbound message.
#[derive(Default)]
pub struct TestTransport {
    sent: Mutex<Vec<(String, String)>>,
    typing: Mutex<Vec<String>>,
    notify: Notify,
}

impl TestTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Everything sent so far as `(channel, text)` pairs.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts sent so far, in order.
    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }

    pub fn typing_channels(&self) -> Vec<String> {
        self.typing.lock().unwrap().clone()
    }

    /// Wait until at least `n` messages were sent, or panic after two seconds.
    pub async fn wait_for(&self, n: usize) -> Vec<(String, String)> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            let sent = self.sent();
            if sent.len() >= n {
                return sent;
            }
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                panic!("expected {n} messages, got {sent:?}");
            }
            let _ = tokio::time::timeout(remaining, self.notify.notified()).await;
        }
    }

    /// Give spawned handlers a moment, then return what was sent.
    pub async fn settle(&self) -> Vec<(String, String)> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.sent()
    }
}

#[async_trait]
impl Transport for TestTransport {
    fn identity(&self) -> Identity {
        Identity::new(BOT_USER).with_name("testbot")
    }

    async fn send(&self, channel: &str, text: &str) -> TransportResult {
        self.sent
            .lock()
            .unwrap()
            .push((channel.to_string(), text.to_string()));
        self.notify.notify_one();
        Ok(())
    }

    async fn typing(&self, channel: &str) -> TransportResult {
        self.typing.lock().unwrap().push(channel.to_string());
        Ok(())
    }
}

/// A message from `U1` in the direct channel `D1`.
pub fn direct(text: &str) -> Event {
    Event::Message(MessageEvent::new("D1", "U1", text))
}

/// A message from `U1` in the shared channel `C1`.
pub fn channel(text: &str) -> Event {
    Event::Message(MessageEvent::new("C1", "U1", text))
}

/// Finite, in-order event stream.
pub fn events(events: Vec<Event>) -> impl Stream<Item = Event> + Unpin {
    stream::iter(events)
}
