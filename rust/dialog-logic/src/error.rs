//! Error types for the formula reader.

use thiserror::Error;

/// Errors that can occur while reading formulas.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Expected a particular token or construct but found something else.
    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: String },

    /// A character that is not part of the formula syntax.
    #[error("unexpected character '{character}' at offset {offset}")]
    UnexpectedCharacter { character: char, offset: usize },

    /// A `(` without its closing `)`.
    #[error("unbalanced parenthesis")]
    UnbalancedParenthesis,
}
