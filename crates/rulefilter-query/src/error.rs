//! Query adapter error types

use thiserror::Error;

/// Predicate-to-SQL translation failure. Provider-level failures
/// (connectivity, execution) happen outside this crate and are the
/// caller's to handle; nothing here retries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    /// The predicate contains a construct the SQL translator cannot express
    #[error("Cannot translate to SQL: {0}")]
    Unsupported(String),
}

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, TranslateError>;
