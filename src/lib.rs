//! slirc-bot - command dispatch for chat bots.
//!
//! A bot is a list of usage patterns such as `deploy <env> to <region>`,
//! each bound to an async handler. Inbound messages are matched against the
//! patterns in registration order; the first match runs with its extracted
//! parameters. A `help` command listing every pattern is generated unless
//! replaced.
//!
//! ```no_run
//! use std::sync::Arc;
//! use slirc_bot::{Bot, ConsoleTransport};
//! use slirc_bot::config::ConsoleConfig;
//!
//! # async fn demo() -> Result<(), slirc_bot::BotError> {
//! let (transport, events) = ConsoleTransport::stdio(&ConsoleConfig::default());
//! let bot = Bot::builder(Arc::new(transport))
//!     .command("echo <word>", "Echo a word back", |req, res| async move {
//!         res.reply(req.string_param("word", "")).await;
//!     })
//!     .build();
//! bot.run(events).await
//! # }
//! ```
//!
//! The platform connection sits behind the [`Transport`] trait. Pattern
//! parsing and matching live in the `slirc-pattern` crate and are re-exported
//! here.

pub mod bot;
pub mod config;
pub mod error;
pub mod event;
pub mod handlers;
pub mod http;
pub mod metrics;
pub mod telemetry;
pub mod transport;

pub use bot::{Bot, BotBuilder, DispatchSettings};
pub use error::{BotError, TransportError, TransportResult};
pub use event::{Attachment, Event, MessageEvent};
pub use handlers::{
    CommandHandler, CommandRegistry, MatchSource, Request, ResponseWriter,
};
pub use transport::{ConsoleTransport, EventStream, Identity, Transport};

pub use slirc_pattern::{ParameterSet, Token, match_tokens, tokenize};
