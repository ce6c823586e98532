//! The event loop and per-message dispatch.
//!
//! One loop reads the inbound stream in order. Every event that needs a
//! handler is moved onto its own tokio task so a slow handler never holds up
//! intake. With `max_in_flight` set, the loop waits for a free slot before
//! spawning, which pushes back on the transport.
//!
//! Spawned tasks are tracked. When the stream ends, [`Bot::run`] waits for
//! them so replies to the last messages are not lost on process exit.

use super::filter::strip_mention;
use super::{Bot, Runtime};
use crate::error::BotError;
use crate::event::{Event, MessageEvent};
use crate::handlers::{MatchSource, Request, ResponseWriter};
use crate::telemetry::{CommandTimer, spans};
use crate::transport::Identity;
use futures_util::{FutureExt, Stream, StreamExt};
use slirc_pattern::ParameterSet;
use std::any::Any;
use std::borrow::Cow;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, warn};
use uuid::Uuid;

impl Bot {
    /// Consume `events` until the stream ends or the transport reports
    /// invalid credentials.
    ///
    /// On stream end, waits for every handler still running before
    /// returning `Ok`. Returns [`BotError::InvalidToken`] in the latter case
    /// without waiting; no event after it is read.
    pub async fn run<S>(&self, mut events: S) -> Result<(), BotError>
    where
        S: Stream<Item = Event> + Unpin,
    {
        let rt = &self.runtime;
        info!(commands = rt.registry.len(), "Listening for events");

        while let Some(event) = events.next().await {
            crate::metrics::record_event(event.kind());

            match event {
                Event::Connected => {
                    let Some(init) = rt.init.clone() else { continue };
                    debug!("Connected");
                    self.spawn(callback("init", init(), rt.settings.handler_timeout)).await;
                }

                Event::Message(msg) => {
                    let identity = rt.transport.identity();
                    if let Err(reason) = rt.settings.addressing.check(&msg, &identity) {
                        debug!(
                            channel = %msg.channel,
                            user = %msg.user,
                            reason = reason.as_str(),
                            "Dropping message"
                        );
                        crate::metrics::record_dropped(reason.as_str());
                        continue;
                    }
                    let runtime = Arc::clone(rt);
                    self.spawn(runtime.handle_message(msg, identity)).await;
                }

                Event::Error { description } => {
                    let Some(on_error) = rt.error.clone() else { continue };
                    self.spawn(callback("error", on_error(description), rt.settings.handler_timeout))
                        .await;
                }

                Event::InvalidAuth => {
                    error!("Transport rejected credentials, stopping");
                    return Err(BotError::InvalidToken);
                }

                other @ Event::Other { .. } => {
                    let Some(on_event) = rt.default_event.clone() else { continue };
                    self.spawn(callback("event", on_event(other), rt.settings.handler_timeout))
                        .await;
                }
            }
        }

        info!(in_flight = rt.tasks.len(), "Event stream closed, draining handlers");
        self.shutdown().await;
        Ok(())
    }

    /// Wait for every handler task spawned so far.
    ///
    /// Useful after [`run`](Self::run) returned an error, which does not
    /// wait on its own.
    pub async fn shutdown(&self) {
        let tasks = &self.runtime.tasks;
        tasks.close();
        tasks.wait().await;
        // Allow the bot to be run again on a new stream.
        tasks.reopen();
    }

    /// Move `task` onto its own tokio task, waiting for a slot first when
    /// concurrency is capped.
    async fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permit = match &self.runtime.limiter {
            Some(limiter) => match Arc::clone(limiter).acquire_owned().await {
                Ok(permit) => Some(permit),
                // The semaphore is never closed while the runtime lives.
                Err(_) => return,
            },
            None => None,
        };
        self.runtime.tasks.spawn(async move {
            let _permit = permit;
            task.await;
        });
    }
}

/// Wrap a lifecycle callback in its span and the handler budget.
fn callback<F>(
    kind: &'static str,
    task: F,
    timeout: Option<Duration>,
) -> impl Future<Output = ()> + Send + 'static
where
    F: Future<Output = ()> + Send + 'static,
{
    supervise(kind, task, timeout, None).instrument(spans::callback(kind))
}

impl Runtime {
    /// Match one admitted message and run the chosen handler.
    async fn handle_message(self: Arc<Self>, msg: MessageEvent, identity: Identity) {
        let request_id = Uuid::new_v4();
        let span = spans::dispatch(request_id, &msg.channel, &msg.user);
        async move {
            let event = Arc::new(msg);
            let response = ResponseWriter::new(&event.channel, Arc::clone(&self.transport));
            let context = CancellationToken::new();

            let (text, pretext) = if self.settings.strip_mention {
                (
                    strip_mention(&event.text, &identity),
                    event.attachment_pretext().map(|p| strip_mention(p, &identity)),
                )
            } else {
                (
                    Cow::Borrowed(event.text.as_str()),
                    event.attachment_pretext().map(Cow::Borrowed),
                )
            };

            let found = self.registry.find_match(&text, pretext.as_deref());
            let Some(found) = found else {
                let Some(default) = self.default_message.clone() else {
                    debug!("No command matched");
                    return;
                };
                debug!("No command matched, using default handler");
                crate::metrics::record_default_handled();
                let request = Request::new(
                    request_id,
                    context.clone(),
                    Arc::clone(&event),
                    ParameterSet::new(),
                    MatchSource::Default,
                );
                let run = async move { default.handle(request, response).await };
                supervise("default", run, self.settings.handler_timeout, Some(context)).await;
                return;
            };

            let command = found.command;
            debug!(
                usage = %command.usage(),
                params = %found.parameters,
                source = ?found.source,
                "Command matched"
            );
            let request = Request::new(
                request_id,
                context.clone(),
                Arc::clone(&event),
                found.parameters,
                found.source,
            );
            let source = match found.source {
                MatchSource::Text => "text",
                MatchSource::Attachment => "attachment",
                MatchSource::Default => "default",
            };
            let _timer = CommandTimer::new(command.usage());
            supervise(
                "command",
                command.execute(request, response),
                self.settings.handler_timeout,
                Some(context),
            )
            .instrument(spans::command(command.usage(), source))
            .await;
        }
        .instrument(span)
        .await
    }
}

/// Run a handler future, containing panics and enforcing the time budget.
///
/// On timeout the future is dropped and `context` is cancelled so work the
/// handler started elsewhere can stop too.
async fn supervise<F>(
    kind: &'static str,
    task: F,
    timeout: Option<Duration>,
    context: Option<CancellationToken>,
) where
    F: Future<Output = ()> + Send,
{
    let guarded = AssertUnwindSafe(task).catch_unwind();
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(kind, timeout = ?limit, "Handler timed out");
                crate::metrics::record_handler_failure("timeout");
                if let Some(context) = context {
                    context.cancel();
                }
                return;
            }
        },
        None => guarded.await,
    };

    if let Err(panic) = outcome {
        error!(kind, panic = %panic_message(&*panic), "Handler panicked");
        crate::metrics::record_handler_failure("panic");
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
