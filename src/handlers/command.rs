//! Registered commands and the handler trait.

use super::context::{Request, ResponseWriter};
use async_trait::async_trait;
use slirc_pattern::{ParameterSet, Token, match_tokens, tokenize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Something that can answer a matched message.
///
/// Implemented for every `Fn(Request, ResponseWriter) -> impl Future` so plain
/// async closures work as handlers.
#[async_trait]
pub trait CommandHandler: Send + Sync + 'static {
    async fn handle(&self, request: Request, response: ResponseWriter);
}

#[async_trait]
impl<F, Fut> CommandHandler for F
where
    F: Fn(Request, ResponseWriter) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn handle(&self, request: Request, response: ResponseWriter) {
        (self)(request, response).await
    }
}

/// Shared handler reference.
pub type BoxedHandler = Arc<dyn CommandHandler>;

/// A usage pattern paired with its description and handler.
///
/// Tokens are computed once, at construction.
pub struct Command {
    usage: String,
    tokens: Vec<Token>,
    description: String,
    handler: BoxedHandler,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("usage", &self.usage)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl Command {
    pub fn new(usage: impl Into<String>, description: impl Into<String>, handler: BoxedHandler) -> Self {
        let usage = usage.into();
        let tokens = tokenize(&usage);
        Self {
            usage,
            tokens,
            description: description.into(),
            handler,
        }
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Match `text` against this command's pattern.
    pub fn matches(&self, text: &str) -> Option<ParameterSet> {
        match_tokens(&self.tokens, text)
    }

    /// Run the handler.
    pub async fn execute(&self, request: Request, response: ResponseWriter) {
        self.handler.handle(request, response).await
    }
}
