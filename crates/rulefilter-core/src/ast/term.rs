//! Filter term AST node

use crate::operator::{LogicalOperator, RuleOperator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single leaf comparison: field, operator and the raw (uncoerced) value.
///
/// `field = None` means the term binds to the scope's default descriptor;
/// the value is coerced to the bound descriptor's value kind at bind time,
/// not here. `implicit_operator` records that the operator was the parser's
/// Contains default rather than an explicit token, which lets the binder
/// rewrite it to IsEqualTo for numeric fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterTerm {
    /// Logical field name; None binds to the scope's default descriptor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Comparison operator (already inferred from the raw token)
    pub operator: RuleOperator,

    /// Raw value text as written in the filter, quotes stripped
    pub raw_value: String,

    /// Combinator joining this term with the *next* sibling
    #[serde(default)]
    pub combinator: LogicalOperator,

    /// True when the operator was defaulted rather than written out
    #[serde(default)]
    pub implicit_operator: bool,
}

impl FilterTerm {
    /// Create a term with an explicit operator
    pub fn new(operator: RuleOperator, raw_value: impl Into<String>) -> Self {
        Self {
            field: None,
            operator,
            raw_value: raw_value.into(),
            combinator: LogicalOperator::default(),
            implicit_operator: false,
        }
    }

    /// Create a bare-token term carrying the defaulted Contains operator
    pub fn contains(raw_value: impl Into<String>) -> Self {
        let mut term = Self::new(RuleOperator::Contains, raw_value);
        term.implicit_operator = true;
        term
    }

    /// Bind the term to an explicit field name
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the combinator joining this term with the next sibling
    pub fn with_combinator(mut self, combinator: LogicalOperator) -> Self {
        self.combinator = combinator;
        self
    }

    /// True when the raw value contains a `*` or `?` wildcard
    pub fn has_wildcard(&self) -> bool {
        self.raw_value.contains('*') || self.raw_value.contains('?')
    }
}

impl fmt::Display for FilterTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "{}", field)?;
        }
        if !self.implicit_operator || self.field.is_some() {
            write!(f, "{}", self.operator.token())?;
        }
        if needs_quoting(&self.raw_value) {
            write!(f, "\"{}\"", self.raw_value.replace('"', "\"\""))
        } else {
            write!(f, "{}", self.raw_value)
        }
    }
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"' | '\''))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_term_defaults() {
        let term = FilterTerm::contains("gift");
        assert_eq!(term.operator, RuleOperator::Contains);
        assert!(term.implicit_operator);
        assert_eq!(term.combinator, LogicalOperator::Or);
        assert_eq!(term.field, None);
    }

    #[test]
    fn test_term_with_field() {
        let term = FilterTerm::new(RuleOperator::IsEqualTo, "DE").with_field("Country");
        assert_eq!(term.field.as_deref(), Some("Country"));
        assert_eq!(term.to_string(), "Country=DE");
    }

    #[test]
    fn test_term_wildcard_detection() {
        assert!(FilterTerm::contains("gift*").has_wildcard());
        assert!(FilterTerm::contains("g?ft").has_wildcard());
        assert!(!FilterTerm::contains("gift").has_wildcard());
    }

    #[test]
    fn test_term_display_quotes_whitespace() {
        let term = FilterTerm::new(RuleOperator::IsEqualTo, "New York").with_field("City");
        assert_eq!(term.to_string(), "City=\"New York\"");
    }

    #[test]
    fn test_term_display_bare_token() {
        let term = FilterTerm::contains("gift");
        assert_eq!(term.to_string(), "gift");
    }

    #[test]
    fn test_term_serde_round_trip() {
        let term = FilterTerm::new(RuleOperator::GreaterThan, "100")
            .with_field("Total")
            .with_combinator(LogicalOperator::And);
        let json = serde_json::to_string(&term).unwrap();
        let back: FilterTerm = serde_json::from_str(&json).unwrap();
        assert_eq!(back, term);
    }
}
