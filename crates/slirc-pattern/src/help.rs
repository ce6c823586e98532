//! Help text rendering.
//!
//! Literal words render bold, parameters render as inline code and the
//! description follows a dash in italics:
//!
//! ```text
//! *deploy* `env` *to* `region` - _Deploy a build_
//! ```

use crate::token::Token;

fn bold(text: &str) -> String {
    format!("*{text}*")
}

fn code(text: &str) -> String {
    format!("`{text}`")
}

fn italic(text: &str) -> String {
    format!("_{text}_")
}

/// Render the usage part of a help line.
pub fn render_usage(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| if t.is_parameter { code(&t.word) } else { bold(&t.word) })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render one help line (without the trailing newline).
///
/// ```
/// use slirc_pattern::{render_help_line, tokenize};
///
/// let line = render_help_line(&tokenize("echo <word>"), "Repeat a word");
/// assert_eq!(line, "*echo* `word` - _Repeat a word_");
/// ```
pub fn render_help_line(tokens: &[Token], description: &str) -> String {
    let usage = render_usage(tokens);
    if usage.is_empty() {
        format!("- {}", italic(description))
    } else {
        format!("{usage} - {}", italic(description))
    }
}
