//! Operators for rule filter expressions

use crate::value::ValueKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of comparison operators a filter term can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleOperator {
    /// Substring match on strings, membership on array values
    Contains,
    /// Negated Contains
    NotContains,
    /// Equality (==)
    IsEqualTo,
    /// Inequality (!=)
    IsNotEqualTo,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal (>=)
    GreaterThanOrEqualTo,
    /// Less than (<)
    LessThan,
    /// Less than or equal (<=)
    LessThanOrEqualTo,
    /// Wildcard pattern match (`*` = any run, `?` = one character)
    Like,
    /// Negated Like
    NotLike,
}

impl RuleOperator {
    /// Every operator, in declaration order
    pub const ALL: [RuleOperator; 10] = [
        RuleOperator::Contains,
        RuleOperator::NotContains,
        RuleOperator::IsEqualTo,
        RuleOperator::IsNotEqualTo,
        RuleOperator::GreaterThan,
        RuleOperator::GreaterThanOrEqualTo,
        RuleOperator::LessThan,
        RuleOperator::LessThanOrEqualTo,
        RuleOperator::Like,
        RuleOperator::NotLike,
    ];

    /// Returns true if this is an ordering comparison
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            RuleOperator::GreaterThan
                | RuleOperator::GreaterThanOrEqualTo
                | RuleOperator::LessThan
                | RuleOperator::LessThanOrEqualTo
        )
    }

    /// Returns true if this is a wildcard pattern operator
    pub fn is_pattern(&self) -> bool {
        matches!(self, RuleOperator::Like | RuleOperator::NotLike)
    }

    /// Returns true if this operator negates its base comparison
    pub fn is_negation(&self) -> bool {
        matches!(
            self,
            RuleOperator::NotContains | RuleOperator::IsNotEqualTo | RuleOperator::NotLike
        )
    }

    /// Whether this operator has a compilation rule for the given value kind.
    /// Kind/operator combinations outside this table are rejected when the
    /// descriptor is registered.
    pub fn supports(&self, kind: ValueKind) -> bool {
        match kind {
            ValueKind::String => true,
            ValueKind::Int | ValueKind::NullableInt | ValueKind::Money => {
                matches!(self, RuleOperator::IsEqualTo | RuleOperator::IsNotEqualTo)
                    || self.is_ordering()
            }
            ValueKind::Boolean => {
                matches!(self, RuleOperator::IsEqualTo | RuleOperator::IsNotEqualTo)
            }
            ValueKind::IntArray | ValueKind::StringArray => {
                matches!(self, RuleOperator::Contains | RuleOperator::NotContains)
            }
        }
    }

    /// All operators applicable to the given value kind
    pub fn applicable(kind: ValueKind) -> Vec<RuleOperator> {
        Self::ALL.iter().copied().filter(|op| op.supports(kind)).collect()
    }

    /// The grammar token that round-trips to this operator. Like/NotLike
    /// share tokens with equality; the wildcard in the value disambiguates.
    pub fn token(&self) -> &'static str {
        match self {
            RuleOperator::Contains => "~",
            RuleOperator::NotContains => "!~",
            RuleOperator::IsEqualTo | RuleOperator::Like => "=",
            RuleOperator::IsNotEqualTo | RuleOperator::NotLike => "!=",
            RuleOperator::GreaterThan => ">",
            RuleOperator::GreaterThanOrEqualTo => ">=",
            RuleOperator::LessThan => "<",
            RuleOperator::LessThanOrEqualTo => "<=",
        }
    }
}

impl fmt::Display for RuleOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Logical combinator joining a filter node with its *next* sibling.
/// Stored on the left operand, so a group of N children needs N-1
/// effective combinators; the last one is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
}

impl Default for LogicalOperator {
    fn default() -> Self {
        LogicalOperator::Or
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => write!(f, "and"),
            LogicalOperator::Or => write!(f, "or"),
        }
    }
}

/// Fold mode for a quantifier descriptor over a related collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantifier {
    /// At least one related element satisfies the inner comparison;
    /// an empty collection yields false
    Any,
    /// Every related element satisfies the inner comparison;
    /// an empty collection yields true
    All,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_is_ordering() {
        assert!(RuleOperator::GreaterThan.is_ordering());
        assert!(RuleOperator::LessThanOrEqualTo.is_ordering());
        assert!(!RuleOperator::Contains.is_ordering());
        assert!(!RuleOperator::Like.is_ordering());
    }

    #[test]
    fn test_operator_is_pattern() {
        assert!(RuleOperator::Like.is_pattern());
        assert!(RuleOperator::NotLike.is_pattern());
        assert!(!RuleOperator::IsEqualTo.is_pattern());
    }

    #[test]
    fn test_string_supports_everything() {
        for op in RuleOperator::ALL {
            assert!(op.supports(ValueKind::String), "{op} should apply to strings");
        }
    }

    #[test]
    fn test_numeric_rejects_contains_and_like() {
        assert!(!RuleOperator::Contains.supports(ValueKind::Int));
        assert!(!RuleOperator::Like.supports(ValueKind::Money));
        assert!(RuleOperator::GreaterThan.supports(ValueKind::Money));
        assert!(RuleOperator::IsEqualTo.supports(ValueKind::NullableInt));
    }

    #[test]
    fn test_boolean_supports_equality_only() {
        assert_eq!(
            RuleOperator::applicable(ValueKind::Boolean),
            vec![RuleOperator::IsEqualTo, RuleOperator::IsNotEqualTo]
        );
    }

    #[test]
    fn test_array_supports_membership_only() {
        assert_eq!(
            RuleOperator::applicable(ValueKind::IntArray),
            vec![RuleOperator::Contains, RuleOperator::NotContains]
        );
    }

    #[test]
    fn test_logical_operator_default_is_or() {
        assert_eq!(LogicalOperator::default(), LogicalOperator::Or);
    }

    #[test]
    fn test_operator_token_round_trip() {
        assert_eq!(RuleOperator::Contains.token(), "~");
        assert_eq!(RuleOperator::IsNotEqualTo.token(), "!=");
        assert_eq!(RuleOperator::GreaterThanOrEqualTo.token(), ">=");
    }
}
