//! Parser error types

use thiserror::Error;

/// Filter grammar error. Malformed parentheses are never reported here;
/// the normalizer repairs them before parsing starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Structurally invalid token sequence
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Quoted value without a closing delimiter
    #[error("Unterminated {delimiter}-quoted value at offset {offset}")]
    UnterminatedQuote { delimiter: char, offset: usize },

    /// Operator token with no following value
    #[error("Operator '{0}' is not followed by a value")]
    DanglingOperator(String),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
