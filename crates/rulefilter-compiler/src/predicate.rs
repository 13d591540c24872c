//! Compiled predicate tree
//!
//! The executable form of a filter group: a small interpretable AST with an
//! in-memory evaluator. The query adapter walks the same tree to build a
//! deferred SQL fragment, so every leaf also carries its descriptor's
//! access path. String comparisons are case-insensitive by lowering both
//! operands, with null coalescing to the empty string.

use crate::pattern::WildcardPattern;
use rulefilter_core::descriptor::{CollectionAccessor, ValueAccessor};
use rulefilter_core::{LogicalOperator, Quantifier, RuleOperator, RuleValue};
use std::fmt;

/// A single comparison: operator plus the coerced right-hand value.
/// Pattern operators (Like/NotLike) carry their parsed wildcard pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub operator: RuleOperator,
    pub value: RuleValue,
    pub pattern: Option<WildcardPattern>,
}

impl Comparison {
    /// Build a comparison; pattern operators parse their wildcard pattern
    /// from the value's string form here, once.
    pub fn new(operator: RuleOperator, value: RuleValue) -> Self {
        let pattern = if operator.is_pattern() {
            value.as_str().map(WildcardPattern::parse)
        } else {
            None
        };
        Self {
            operator,
            value,
            pattern,
        }
    }

    /// Evaluate the comparison against a projected field value
    pub fn matches(&self, left: &RuleValue) -> bool {
        if let Some(pattern) = &self.pattern {
            let hit = left.as_str().map(|s| pattern.matches(s)).unwrap_or(false);
            return if self.operator == RuleOperator::NotLike {
                !hit
            } else {
                hit
            };
        }

        match self.operator {
            RuleOperator::Contains => contains(left, &self.value),
            RuleOperator::NotContains => !contains(left, &self.value),
            RuleOperator::IsEqualTo => equals(left, &self.value),
            RuleOperator::IsNotEqualTo => !equals(left, &self.value),
            RuleOperator::GreaterThan
            | RuleOperator::GreaterThanOrEqualTo
            | RuleOperator::LessThan
            | RuleOperator::LessThanOrEqualTo => ordered(left, &self.value, self.operator),
            // new() always attaches a pattern for these
            RuleOperator::Like | RuleOperator::NotLike => false,
        }
    }
}

/// Case-insensitive equality with null coalescing to "" on the string side
fn equals(left: &RuleValue, right: &RuleValue) -> bool {
    match (left, right) {
        (RuleValue::Null, RuleValue::Null) => true,
        (RuleValue::String(a), RuleValue::String(b)) => a.to_lowercase() == b.to_lowercase(),
        (RuleValue::Null, RuleValue::String(s)) | (RuleValue::String(s), RuleValue::Null) => {
            s.is_empty()
        }
        (RuleValue::Bool(a), RuleValue::Bool(b)) => a == b,
        (RuleValue::IntArray(a), RuleValue::IntArray(b)) => a == b,
        (RuleValue::StringArray(a), RuleValue::StringArray(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b)
                    .all(|(x, y)| x.to_lowercase() == y.to_lowercase())
        }
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

/// Substring match on strings, membership when either side is an array
fn contains(left: &RuleValue, right: &RuleValue) -> bool {
    match (left, right) {
        // Membership of the field value in the filter's value set
        (_, RuleValue::IntArray(set)) => left
            .as_number()
            .map(|n| set.iter().any(|i| *i as f64 == n))
            .unwrap_or(false),
        (_, RuleValue::StringArray(set)) => left
            .as_str()
            .map(|s| {
                let s = s.to_lowercase();
                set.iter().any(|item| item.to_lowercase() == s)
            })
            .unwrap_or(false),
        // Membership of the filter value in a collection-valued field
        (RuleValue::StringArray(items), RuleValue::String(needle)) => {
            let needle = needle.to_lowercase();
            items.iter().any(|item| item.to_lowercase() == needle)
        }
        (RuleValue::IntArray(items), _) => right
            .as_number()
            .map(|n| items.iter().any(|i| *i as f64 == n))
            .unwrap_or(false),
        // Substring match, null coalescing to ""
        (_, RuleValue::String(needle)) => {
            let haystack = left.as_str().unwrap_or("").to_lowercase();
            haystack.contains(&needle.to_lowercase())
        }
        _ => false,
    }
}

/// Ordering comparison; numbers compare numerically, strings
/// lexicographically on the lowered forms, anything else is false
fn ordered(left: &RuleValue, right: &RuleValue, operator: RuleOperator) -> bool {
    let ordering = match (left, right) {
        (RuleValue::String(a), RuleValue::String(b)) => {
            a.to_lowercase().partial_cmp(&b.to_lowercase())
        }
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    };
    let Some(ordering) = ordering else {
        return false;
    };
    match operator {
        RuleOperator::GreaterThan => ordering.is_gt(),
        RuleOperator::GreaterThanOrEqualTo => ordering.is_ge(),
        RuleOperator::LessThan => ordering.is_lt(),
        RuleOperator::LessThanOrEqualTo => ordering.is_le(),
        _ => false,
    }
}

/// Executable form of a filter group
pub enum Predicate<T> {
    /// Constant result; the empty root group compiles to `Const(true)`
    Const(bool),
    /// Leaf comparison against a scalar field
    Test {
        /// Descriptor access path, for deferred query translation
        path: String,
        access: ValueAccessor<T>,
        test: Comparison,
    },
    /// Any/All fold of a scalar comparison over a related collection
    Quantifier {
        mode: Quantifier,
        /// Path to the related collection, for deferred query translation
        collection_path: String,
        /// Path to the compared value within one element
        element_path: String,
        access: CollectionAccessor<T>,
        test: Comparison,
    },
    And(Box<Predicate<T>>, Box<Predicate<T>>),
    Or(Box<Predicate<T>>, Box<Predicate<T>>),
    Not(Box<Predicate<T>>),
}

impl<T> Predicate<T> {
    /// Evaluate against a record, short-circuiting through And/Or
    pub fn eval(&self, record: &T) -> bool {
        match self {
            Predicate::Const(value) => *value,
            Predicate::Test { access, test, .. } => test.matches(&access(record)),
            Predicate::Quantifier {
                mode, access, test, ..
            } => {
                let elements = access(record);
                match mode {
                    Quantifier::Any => elements.iter().any(|v| test.matches(v)),
                    Quantifier::All => elements.iter().all(|v| test.matches(v)),
                }
            }
            Predicate::And(a, b) => a.eval(record) && b.eval(record),
            Predicate::Or(a, b) => a.eval(record) || b.eval(record),
            Predicate::Not(inner) => !inner.eval(record),
        }
    }

    pub fn and(self, other: Predicate<T>) -> Predicate<T> {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate<T>) -> Predicate<T> {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Predicate<T> {
        Predicate::Not(Box::new(self))
    }

    /// Fold step used by the group compiler: `acc = combine(acc, op, next)`
    pub fn combine(self, combinator: LogicalOperator, other: Predicate<T>) -> Predicate<T> {
        match combinator {
            LogicalOperator::And => self.and(other),
            LogicalOperator::Or => self.or(other),
        }
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        match self {
            Predicate::Const(value) => Predicate::Const(*value),
            Predicate::Test { path, access, test } => Predicate::Test {
                path: path.clone(),
                access: access.clone(),
                test: test.clone(),
            },
            Predicate::Quantifier {
                mode,
                collection_path,
                element_path,
                access,
                test,
            } => Predicate::Quantifier {
                mode: *mode,
                collection_path: collection_path.clone(),
                element_path: element_path.clone(),
                access: access.clone(),
                test: test.clone(),
            },
            Predicate::And(a, b) => Predicate::And(a.clone(), b.clone()),
            Predicate::Or(a, b) => Predicate::Or(a.clone(), b.clone()),
            Predicate::Not(inner) => Predicate::Not(inner.clone()),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Const(value) => f.debug_tuple("Const").field(value).finish(),
            Predicate::Test { path, test, .. } => f
                .debug_struct("Test")
                .field("path", path)
                .field("test", test)
                .finish(),
            Predicate::Quantifier {
                mode,
                collection_path,
                element_path,
                test,
                ..
            } => f
                .debug_struct("Quantifier")
                .field("mode", mode)
                .field("collection_path", collection_path)
                .field("element_path", element_path)
                .field("test", test)
                .finish(),
            Predicate::And(a, b) => f.debug_tuple("And").field(a).field(b).finish(),
            Predicate::Or(a, b) => f.debug_tuple("Or").field(a).field(b).finish(),
            Predicate::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
        }
    }
}
