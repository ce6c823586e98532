//! Positional pattern matching.
//!
//! Matching is strict: the text must have exactly as many words as the
//! pattern has tokens. Literal tokens compare case-sensitively, parameter
//! tokens accept any single word. There is no backtracking, no optional
//! segment and no variadic capture.

use crate::params::ParameterSet;
use crate::token::Token;

/// Split text into words the same way patterns are split.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ').filter(|word| !word.is_empty())
}

/// Match `text` against a tokenized pattern.
///
/// Returns the extracted parameters on success and `None` on any mismatch.
/// When a pattern names the same parameter twice the later word wins.
///
/// ```
/// use slirc_pattern::{match_tokens, tokenize};
///
/// let tokens = tokenize("echo <word>");
/// let params = match_tokens(&tokens, "echo hi").unwrap();
/// assert_eq!(params.get("word"), Some("hi"));
/// assert!(match_tokens(&tokens, "Echo hi").is_none());
/// ```
pub fn match_tokens(tokens: &[Token], text: &str) -> Option<ParameterSet> {
    let words: Vec<&str> = words(text).collect();
    if words.len() != tokens.len() {
        return None;
    }

    let mut params = ParameterSet::new();
    for (token, word) in tokens.iter().zip(words) {
        if token.is_parameter {
            params.insert(token.word.clone(), word);
        } else if token.word != word {
            return None;
        }
    }
    Some(params)
}
