//! Predicate compiler
//!
//! Walks a bound filter AST and emits a small interpretable predicate tree
//! that evaluates records in memory or translates to a deferred query
//! fragment. Binding (descriptor resolution, value coercion, operator
//! checks) happens here, after parsing; binding failures are typed errors,
//! never silently dropped terms.

pub mod compiler;
pub mod error;
pub mod pattern;
pub mod predicate;

pub use compiler::{compile, compile_text};
pub use error::{CompileError, Result};
pub use pattern::WildcardPattern;
pub use predicate::{Comparison, Predicate};
