//! Filter grammar parser
//!
//! Turns a filter string like `!(Country=DE and City=Berlin) or Total>100`
//! into a [`FilterGroup`](rulefilter_core::FilterGroup) tree. Malformed
//! parenthesization is repaired up front by the normalizer; structurally
//! invalid token sequences (dangling operator, unterminated quote) are
//! reported as [`ParseError`]s.

pub mod error;
pub mod normalizer;
pub mod parser;

pub use error::{ParseError, Result};
pub use normalizer::normalize;
pub use parser::FilterParser;
