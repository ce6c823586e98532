//! Usage pattern tokenizer.
//!
//! Patterns are split on single spaces. Empty segments produced by runs of
//! spaces are skipped so they never become phantom tokens. No escaping is
//! supported: a word is either a parameter marker pair around a name or a
//! literal.

use std::fmt;

/// Opening parameter marker.
pub const PARAM_OPEN: char = '<';
/// Closing parameter marker.
pub const PARAM_CLOSE: char = '>';

/// One positional segment of a usage pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// Literal text, or the parameter name with markers stripped.
    pub word: String,
    /// Whether this token captures a word instead of requiring one.
    pub is_parameter: bool,
}

impl Token {
    /// Create a literal token.
    pub fn literal(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            is_parameter: false,
        }
    }

    /// Create a parameter token named `name`.
    pub fn parameter(name: impl Into<String>) -> Self {
        Self {
            word: name.into(),
            is_parameter: true,
        }
    }

    /// Classify a single non-empty pattern word.
    ///
    /// `<>` has no name and stays a literal.
    ///
    /// ```
    /// use slirc_pattern::Token;
    ///
    /// assert_eq!(Token::from_word("<env>"), Token::parameter("env"));
    /// assert_eq!(Token::from_word("deploy"), Token::literal("deploy"));
    /// assert_eq!(Token::from_word("<>"), Token::literal("<>"));
    /// ```
    pub fn from_word(word: &str) -> Self {
        match word
            .strip_prefix(PARAM_OPEN)
            .and_then(|rest| rest.strip_suffix(PARAM_CLOSE))
        {
            Some(name) if !name.is_empty() => Self::parameter(name),
            _ => Self::literal(word),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_parameter {
            write!(f, "{}{}{}", PARAM_OPEN, self.word, PARAM_CLOSE)
        } else {
            f.write_str(&self.word)
        }
    }
}

/// Split a usage pattern into its ordered tokens.
///
/// ```
/// use slirc_pattern::{tokenize, Token};
///
/// assert_eq!(
///     tokenize("deploy <env> to <region>"),
///     vec![
///         Token::literal("deploy"),
///         Token::parameter("env"),
///         Token::literal("to"),
///         Token::parameter("region"),
///     ]
/// );
/// ```
pub fn tokenize(pattern: &str) -> Vec<Token> {
    pattern
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(Token::from_word)
        .collect()
}

/// Names of parameter tokens that appear more than once, in first-seen order.
pub fn duplicate_parameters(tokens: &[Token]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    let mut dupes: Vec<&str> = Vec::new();
    for token in tokens.iter().filter(|t| t.is_parameter) {
        let name = token.word.as_str();
        if seen.contains(&name) {
            if !dupes.contains(&name) {
                dupes.push(name);
            }
        } else {
            seen.push(name);
        }
    }
    dupes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_mixed_pattern() {
        let tokens = tokenize("deploy <env> to <region>");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0], Token::literal("deploy"));
        assert_eq!(tokens[1], Token::parameter("env"));
        assert_eq!(tokens[2], Token::literal("to"));
        assert_eq!(tokens[3], Token::parameter("region"));
    }

    #[test]
    fn tokenize_skips_empty_segments() {
        let tokens = tokenize("  ping   <host> ");
        assert_eq!(tokens, vec![Token::literal("ping"), Token::parameter("host")]);
    }

    #[test]
    fn tokenize_empty_pattern() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn half_marked_words_are_literals() {
        assert_eq!(Token::from_word("<env"), Token::literal("<env"));
        assert_eq!(Token::from_word("env>"), Token::literal("env>"));
        assert_eq!(Token::from_word("<"), Token::literal("<"));
    }

    #[test]
    fn mention_shaped_word_is_a_parameter() {
        // No escaping: anything wrapped in markers names a parameter.
        assert_eq!(Token::from_word("<@U123>"), Token::parameter("@U123"));
    }

    #[test]
    fn display_restores_markers() {
        assert_eq!(Token::parameter("env").to_string(), "<env>");
        assert_eq!(Token::literal("help").to_string(), "help");
    }

    #[test]
    fn duplicate_parameters_reported_once() {
        let tokens = tokenize("copy <x> <y> <x> <x>");
        assert_eq!(duplicate_parameters(&tokens), vec!["x"]);
        assert!(duplicate_parameters(&tokenize("copy <x> <y>")).is_empty());
    }
}
