//! Filter group AST node

use super::term::FilterTerm;
use crate::operator::LogicalOperator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A child of a filter group: either a leaf term or a nested group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    Term(FilterTerm),
    Group(FilterGroup),
}

impl FilterNode {
    /// Combinator joining this node with the next sibling
    pub fn combinator(&self) -> LogicalOperator {
        match self {
            FilterNode::Term(term) => term.combinator,
            FilterNode::Group(group) => group.combinator,
        }
    }
}

impl From<FilterTerm> for FilterNode {
    fn from(term: FilterTerm) -> Self {
        FilterNode::Term(term)
    }
}

impl From<FilterGroup> for FilterNode {
    fn from(group: FilterGroup) -> Self {
        FilterNode::Group(group)
    }
}

/// An ordered, possibly negated collection of terms and sub-groups.
///
/// The root group anchors a descriptor scope; an empty root group compiles
/// to the constant `true` predicate so that composition stays total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    /// Ordered children; each child carries its own trailing combinator
    pub children: Vec<FilterNode>,

    /// Combinator joining this group with the *next* sibling
    #[serde(default)]
    pub combinator: LogicalOperator,

    /// True for nested groups, false for the scope root
    #[serde(default)]
    pub is_sub_group: bool,

    /// Negate the compiled group predicate
    #[serde(default)]
    pub negate: bool,
}

impl FilterGroup {
    /// Create an empty root group
    pub fn root() -> Self {
        Self {
            children: Vec::new(),
            combinator: LogicalOperator::default(),
            is_sub_group: false,
            negate: false,
        }
    }

    /// Create an empty nested group
    pub fn sub_group() -> Self {
        Self {
            is_sub_group: true,
            ..Self::root()
        }
    }

    /// Flip the group's negation flag
    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Set the combinator joining this group with the next sibling
    pub fn with_combinator(mut self, combinator: LogicalOperator) -> Self {
        self.combinator = combinator;
        self
    }

    /// Append a term (builder style)
    pub fn term(mut self, term: FilterTerm) -> Self {
        self.children.push(FilterNode::Term(term));
        self
    }

    /// Append a nested group (builder style)
    pub fn group(mut self, group: FilterGroup) -> Self {
        self.children.push(FilterNode::Group(group));
        self
    }

    /// Append any node
    pub fn push(&mut self, node: impl Into<FilterNode>) {
        self.children.push(node.into());
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Default for FilterGroup {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for FilterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negate {
            write!(f, "!")?;
        }
        if self.is_sub_group || self.negate {
            write!(f, "(")?;
        }
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                // The combinator rendered between two nodes belongs to the
                // left one.
                write!(f, " {} ", self.children[i - 1].combinator())?;
            }
            match child {
                FilterNode::Term(term) => write!(f, "{}", term)?,
                FilterNode::Group(group) => write!(f, "{}", group)?,
            }
        }
        if self.is_sub_group || self.negate {
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::RuleOperator;

    fn term(field: &str, op: RuleOperator, value: &str) -> FilterTerm {
        FilterTerm::new(op, value).with_field(field)
    }

    #[test]
    fn test_group_builder() {
        let group = FilterGroup::root()
            .term(term("Country", RuleOperator::IsEqualTo, "DE").with_combinator(LogicalOperator::And))
            .term(term("City", RuleOperator::IsEqualTo, "Berlin"));

        assert_eq!(group.len(), 2);
        assert!(!group.is_sub_group);
        assert!(!group.negate);
    }

    #[test]
    fn test_group_display() {
        let group = FilterGroup::root().group(
            FilterGroup::sub_group()
                .term(
                    term("Country", RuleOperator::IsEqualTo, "DE")
                        .with_combinator(LogicalOperator::And),
                )
                .term(term("City", RuleOperator::IsEqualTo, "Berlin"))
                .negated(),
        );

        assert_eq!(group.to_string(), "!(Country=DE and City=Berlin)");
    }

    #[test]
    fn test_group_display_default_or() {
        let group = FilterGroup::root()
            .term(FilterTerm::contains("gift"))
            .term(FilterTerm::contains("card"));
        assert_eq!(group.to_string(), "gift or card");
    }

    #[test]
    fn test_empty_root_group() {
        let group = FilterGroup::root();
        assert!(group.is_empty());
        assert_eq!(group.to_string(), "");
    }

    #[test]
    fn test_group_serde_round_trip() {
        let group = FilterGroup::root()
            .term(term("Total", RuleOperator::GreaterThan, "100"))
            .group(FilterGroup::sub_group().term(FilterTerm::contains("gift*")).negated());

        let json = serde_json::to_string(&group).unwrap();
        let back: FilterGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(back, group);
    }
}
