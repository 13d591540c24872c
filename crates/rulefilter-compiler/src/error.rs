//! Compiler error types

use rulefilter_core::{CoercionError, RuleOperator};
use rulefilter_parser::ParseError;
use thiserror::Error;

/// Binding or compilation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// Field name not found in the descriptor scope
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Term without a field name in a scope that declares no default field
    #[error("Term '{0}' has no field and the scope declares no default field")]
    NoDefaultField(String),

    /// Operator not in the bound descriptor's allowed set
    #[error("Operator {operator} is not allowed for field '{field}'")]
    UnsupportedOperator {
        field: String,
        operator: RuleOperator,
    },

    /// Raw value does not convert to the descriptor's value kind
    #[error(transparent)]
    ValueCoercion(#[from] CoercionError),

    /// Parse failure surfaced through the text convenience entry point
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;
