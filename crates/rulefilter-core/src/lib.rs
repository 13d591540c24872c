//! Core types for the rulefilter expression engine:
//! - Runtime values and value kinds with literal coercion
//! - The closed comparison operator set and logical combinators
//! - The filter AST (terms and groups)
//! - Field and quantifier descriptors plus the per-scope registry
//! - Error types

pub mod ast;
pub mod descriptor;
pub mod error;
pub mod operator;
pub mod value;

// Re-export commonly used types
pub use ast::{FilterGroup, FilterNode, FilterTerm};
pub use descriptor::{
    Descriptor, DescriptorRegistry, FieldDescriptor, QuantifierDescriptor, RegistryBuilder,
};
pub use error::{CoercionError, ConfigError};
pub use operator::{LogicalOperator, Quantifier, RuleOperator};
pub use value::{RuleValue, ValueKind};
