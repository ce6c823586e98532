//! Bot assembly and the frozen runtime.
//!
//! [`BotBuilder`] collects commands and callbacks during a single-threaded
//! setup phase. [`BotBuilder::build`] installs the help command and freezes
//! everything into an immutable runtime shared by all handler tasks, so the
//! registry is read without locks once events flow.

mod dispatch;
pub mod filter;

pub use filter::{Addressing, DropReason};

use crate::config::{BotConfig, DispatchConfig};
use crate::event::Event;
use crate::handlers::{BoxedHandler, CommandHandler, CommandRegistry, Request, ResponseWriter};
use crate::transport::Transport;
use futures_util::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;

/// Runs when the transport reports it is connected.
pub type InitCallback = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;
/// Receives the description of a recoverable transport error.
pub type ErrorCallback = Arc<dyn Fn(String) -> BoxFuture<'static, ()> + Send + Sync>;
/// Receives events the bot has no dedicated handling for.
pub type EventCallback = Arc<dyn Fn(Event) -> BoxFuture<'static, ()> + Send + Sync>;

/// Dispatch tuning applied at build time.
#[derive(Debug, Clone, Default)]
pub struct DispatchSettings {
    pub addressing: Addressing,
    pub strip_mention: bool,
    /// Cap on concurrently running handler tasks.
    pub max_in_flight: Option<usize>,
    pub handler_timeout: Option<Duration>,
}

impl DispatchSettings {
    pub fn from_config(bot: &BotConfig, dispatch: &DispatchConfig) -> Self {
        Self {
            addressing: Addressing::new(&bot.direct_channel_prefix, dispatch.ignore_bot_messages),
            strip_mention: dispatch.strip_mention,
            max_in_flight: dispatch.max_in_flight,
            handler_timeout: dispatch.handler_timeout(),
        }
    }
}

/// Collects commands and callbacks before the bot starts.
pub struct BotBuilder {
    transport: Arc<dyn Transport>,
    registry: CommandRegistry,
    help: Option<BoxedHandler>,
    init: Option<InitCallback>,
    error: Option<ErrorCallback>,
    default_message: Option<BoxedHandler>,
    default_event: Option<EventCallback>,
    settings: DispatchSettings,
}

impl BotBuilder {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            registry: CommandRegistry::new(),
            help: None,
            init: None,
            error: None,
            default_message: None,
            default_event: None,
            settings: DispatchSettings::default(),
        }
    }

    /// Apply addressing and dispatch settings from configuration.
    pub fn with_config(self, bot: &BotConfig, dispatch: &DispatchConfig) -> Self {
        self.settings(DispatchSettings::from_config(bot, dispatch))
    }

    pub fn settings(mut self, settings: DispatchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Run `f` whenever the transport connects.
    pub fn on_init<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.init = Some(Arc::new(move || Box::pin(f()) as BoxFuture<'static, ()>));
        self
    }

    /// Run `f` with the description of each recoverable transport error.
    pub fn on_error<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.error = Some(Arc::new(move |description| {
            Box::pin(f(description)) as BoxFuture<'static, ()>
        }));
        self
    }

    /// Handle addressed messages that match no command.
    pub fn on_default_message<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Request, ResponseWriter) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.default_message = Some(Arc::new(f));
        self
    }

    /// Handle events with no dedicated handling.
    pub fn on_default_event<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.default_event = Some(Arc::new(move |event| {
            Box::pin(f(event)) as BoxFuture<'static, ()>
        }));
        self
    }

    /// Replace the generated help listing.
    pub fn on_help<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Request, ResponseWriter) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.help = Some(Arc::new(f));
        self
    }

    /// Register a command handled by an async closure.
    pub fn command<F, Fut>(self, usage: &str, description: &str, f: F) -> Self
    where
        F: Fn(Request, ResponseWriter) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.command_handler(usage, description, f)
    }

    /// Register a command handled by any [`CommandHandler`].
    pub fn command_handler<H: CommandHandler>(mut self, usage: &str, description: &str, handler: H) -> Self {
        self.registry.register(usage, description, Arc::new(handler));
        self
    }

    /// Install the help command and freeze the configuration.
    pub fn build(mut self) -> Bot {
        self.registry.prepend_help(self.help.take());
        let limiter = self
            .settings
            .max_in_flight
            .map(|n| Arc::new(Semaphore::new(n.max(1))));
        Bot {
            runtime: Arc::new(Runtime {
                transport: self.transport,
                registry: self.registry,
                init: self.init,
                error: self.error,
                default_message: self.default_message,
                default_event: self.default_event,
                settings: self.settings,
                limiter,
                tasks: TaskTracker::new(),
            }),
        }
    }
}

/// Immutable state shared by the loop and every handler task.
struct Runtime {
    transport: Arc<dyn Transport>,
    registry: CommandRegistry,
    init: Option<InitCallback>,
    error: Option<ErrorCallback>,
    default_message: Option<BoxedHandler>,
    default_event: Option<EventCallback>,
    settings: DispatchSettings,
    limiter: Option<Arc<Semaphore>>,
    /// Every handler and callback task spawned by the loop.
    tasks: TaskTracker,
}

/// A configured bot, ready to consume an event stream.
#[derive(Clone)]
pub struct Bot {
    runtime: Arc<Runtime>,
}

impl Bot {
    pub fn builder(transport: Arc<dyn Transport>) -> BotBuilder {
        BotBuilder::new(transport)
    }

    /// The frozen command registry, help first.
    pub fn registry(&self) -> &CommandRegistry {
        &self.runtime.registry
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.runtime.settings
    }
}
