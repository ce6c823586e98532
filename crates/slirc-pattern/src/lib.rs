//! # slirc-pattern
//!
//! Tokenizing and matching of chat bot command usage patterns.
//!
//! A usage pattern such as `deploy <env> to <region>` is split into
//! positional [`Token`]s. Words wrapped in `<` and `>` are parameters, all
//! other words are literals. Incoming text matches a pattern when it has the
//! same number of words, every literal word is equal byte for byte, and each
//! parameter position holds some word.
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_pattern::{match_tokens, tokenize};
//!
//! let tokens = tokenize("deploy <env> to <region>");
//! let params = match_tokens(&tokens, "deploy prod to us-east").expect("pattern matches");
//!
//! assert_eq!(params.get("env"), Some("prod"));
//! assert_eq!(params.get("region"), Some("us-east"));
//! assert!(match_tokens(&tokens, "deploy prod").is_none());
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod help;
pub mod matcher;
pub mod params;
pub mod token;

pub use help::{render_help_line, render_usage};
pub use matcher::{match_tokens, words};
pub use params::ParameterSet;
pub use token::{duplicate_parameters, tokenize, Token};
