//! Filter expression AST
//!
//! A filter is an ordered tree of terms and groups. Terms carry the
//! comparison (field, operator, raw value); groups nest arbitrarily and
//! may be negated. The logical combinator that joins a node with its next
//! sibling is stored on the node itself.

mod group;
mod term;

pub use group::{FilterGroup, FilterNode};
pub use term::FilterTerm;
