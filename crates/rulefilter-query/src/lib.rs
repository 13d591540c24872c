//! Query adapters
//!
//! Applies a compiled predicate to a queryable source: either an in-memory
//! sequence (filtered lazily, element by element) or a deferred SQL source
//! (translated to a parameterized `WHERE` clause without executing
//! anything). Both adapters share one semantic: user-level string equality
//! is case-insensitive, realized by lowering both operands.

pub mod error;
pub mod memory;
pub mod sql;

pub use error::{Result, TranslateError};
pub use memory::{Filtered, MemorySource};
pub use sql::{SqlQuery, SqlSource};
