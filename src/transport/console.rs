//! Line-oriented console transport.
//!
//! Reads newline-delimited input through a [`LinesCodec`]. A line starting
//! with `{` is decoded as a JSON [`Event`], unknown `type`s included (see
//! [`Event::from_json`]); any other line becomes a message
//! from the console user on the console channel. Replies are written to the
//! output prefixed with their channel.

use super::{EventStream, Identity, Transport};
use crate::config::ConsoleConfig;
use crate::error::TransportResult;
use crate::event::{Event, MessageEvent};
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::warn;

/// Maximum accepted input line length.
const MAX_LINE_LENGTH: usize = 8192;

/// Transport that talks to a pair of byte streams, normally stdin/stdout.
pub struct ConsoleTransport<W> {
    identity: Identity,
    output: Mutex<W>,
}

impl ConsoleTransport<tokio::io::Stdout> {
    /// Console transport on the process's stdin and stdout.
    pub fn stdio(config: &ConsoleConfig) -> (Self, EventStream) {
        let transport = Self::new(Identity::new(&config.bot_user), tokio::io::stdout());
        let events = console_events(tokio::io::stdin(), config.clone());
        (transport, events)
    }
}

impl<W> ConsoleTransport<W>
where
    W: AsyncWrite + Send + Unpin + 'static,
{
    pub fn new(identity: Identity, output: W) -> Self {
        Self {
            identity,
            output: Mutex::new(output),
        }
    }

    /// Recover the output stream.
    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

#[async_trait]
impl<W> Transport for ConsoleTransport<W>
where
    W: AsyncWrite + Send + Unpin + 'static,
{
    fn identity(&self) -> Identity {
        self.identity.clone()
    }

    async fn send(&self, channel: &str, text: &str) -> TransportResult {
        let mut out = self.output.lock().await;
        let mut frame = String::with_capacity(channel.len() + text.len() + 4);
        for line in text.lines() {
            frame.push_str(&format!("[{channel}] {line}\n"));
        }
        out.write_all(frame.as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }

    async fn typing(&self, channel: &str) -> TransportResult {
        let mut out = self.output.lock().await;
        out.write_all(format!("[{channel}] ...\n").as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }
}

/// Decode one input line into an event.
///
/// Returns `None` for blank lines and undecodable JSON.
pub fn parse_line(line: &str, config: &ConsoleConfig) -> Option<Event> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return None;
    }
    if line.trim_start().starts_with('{') {
        return match serde_json::from_str(line).and_then(Event::from_json) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed console event");
                None
            }
        };
    }
    Some(Event::Message(MessageEvent::new(
        &config.channel,
        &config.user,
        line,
    )))
}

/// Turn a byte stream into console events.
///
/// A `connected` event is emitted first. The stream ends when the input
/// does or when a line cannot be framed.
pub fn console_events<R>(input: R, config: ConsoleConfig) -> EventStream
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let lines = FramedRead::new(input, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    let events = lines
        .take_while(|line| {
            let keep = match line {
                Ok(_) => true,
                Err(e) => {
                    warn!(error = %e, "Console input closed");
                    false
                }
            };
            futures_util::future::ready(keep)
        })
        .filter_map(move |line| {
            let event = line.ok().and_then(|l| parse_line(&l, &config));
            futures_util::future::ready(event)
        });
    Box::pin(futures_util::stream::once(futures_util::future::ready(Event::Connected)).chain(events))
}
