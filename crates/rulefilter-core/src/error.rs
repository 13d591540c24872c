//! Error types for rulefilter core

use crate::operator::RuleOperator;
use crate::value::ValueKind;
use thiserror::Error;

/// Descriptor registration error. Raised while a scope is being wired up,
/// never at evaluation time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Two descriptors registered under the same name within one scope
    #[error("Duplicate descriptor: {0}")]
    DuplicateDescriptor(String),

    /// Operator declared for a descriptor whose value kind cannot compile it
    #[error("Operator {operator} is not applicable to {kind} (descriptor '{name}')")]
    OperatorNotApplicable {
        name: String,
        operator: RuleOperator,
        kind: ValueKind,
    },

    /// Descriptor registered with an empty allowed-operator set
    #[error("Descriptor '{0}' has an empty operator set")]
    EmptyOperatorSet(String),

    /// Default field name does not resolve to a registered descriptor
    #[error("Default field '{0}' is not registered")]
    UnknownDefaultField(String),
}

/// Raw filter value could not be converted to the descriptor's value kind
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Cannot convert '{raw}' to {kind}")]
pub struct CoercionError {
    pub raw: String,
    pub kind: ValueKind,
}

/// Result type for registration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
