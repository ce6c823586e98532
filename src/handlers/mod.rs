//! Command handling.
//!
//! - [`command`]: a usage pattern bound to a handler
//! - [`context`]: the per-message [`Request`] and [`ResponseWriter`]
//! - [`registry`]: ordered lookup and the synthesized help command

pub mod command;
pub mod context;
pub mod registry;

pub use command::{BoxedHandler, Command, CommandHandler};
pub use context::{MatchSource, Request, ResponseWriter};
pub use registry::{CommandMatch, CommandRegistry, HELP_COMMAND};
