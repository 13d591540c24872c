//! Runtime values and value kinds
//!
//! `RuleValue` is the dynamically-typed value a filter compares against;
//! `ValueKind` is the static kind a descriptor declares for its field and
//! drives both literal coercion and operator applicability.

use crate::error::CoercionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime value type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// Null value (nullable fields only)
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Money value (decimal amounts carried as f64)
    Money(f64),
    /// String value
    String(String),
    /// Array of integers
    IntArray(Vec<i64>),
    /// Array of strings
    StringArray(Vec<String>),
}

impl RuleValue {
    /// Returns true for `RuleValue::Null`
    pub fn is_null(&self) -> bool {
        matches!(self, RuleValue::Null)
    }

    /// Numeric view of the value, if it has one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RuleValue::Int(i) => Some(*i as f64),
            RuleValue::Money(m) => Some(*m),
            _ => None,
        }
    }

    /// String view of the value; null coalesces to the empty string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RuleValue::String(s) => Some(s),
            RuleValue::Null => Some(""),
            _ => None,
        }
    }

    /// Short name of the value's runtime type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            RuleValue::Null => "null",
            RuleValue::Bool(_) => "bool",
            RuleValue::Int(_) => "int",
            RuleValue::Money(_) => "money",
            RuleValue::String(_) => "string",
            RuleValue::IntArray(_) => "int[]",
            RuleValue::StringArray(_) => "string[]",
        }
    }
}

/// Static kind of a descriptor's value. Drives how a raw filter literal is
/// coerced and which operators the descriptor may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    String,
    Int,
    NullableInt,
    IntArray,
    StringArray,
    Boolean,
    Money,
}

impl ValueKind {
    /// Int, NullableInt and Money compare numerically
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Int | ValueKind::NullableInt | ValueKind::Money)
    }

    /// Array kinds coerce a comma-separated literal into a membership set
    pub fn is_array(&self) -> bool {
        matches!(self, ValueKind::IntArray | ValueKind::StringArray)
    }

    /// Convert a raw filter literal into a typed value.
    ///
    /// String kinds keep the literal untouched; everything else trims first.
    /// NullableInt treats an empty literal or `null` as the null value.
    pub fn coerce(&self, raw: &str) -> Result<RuleValue, CoercionError> {
        let err = || CoercionError {
            raw: raw.to_string(),
            kind: *self,
        };

        match self {
            ValueKind::String => Ok(RuleValue::String(raw.to_string())),
            ValueKind::Int => raw.trim().parse::<i64>().map(RuleValue::Int).map_err(|_| err()),
            ValueKind::NullableInt => {
                let trimmed = raw.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
                    Ok(RuleValue::Null)
                } else {
                    trimmed.parse::<i64>().map(RuleValue::Int).map_err(|_| err())
                }
            }
            ValueKind::Money => raw
                .trim()
                .parse::<f64>()
                .map(RuleValue::Money)
                .map_err(|_| err()),
            ValueKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(RuleValue::Bool(true)),
                "false" | "0" | "no" => Ok(RuleValue::Bool(false)),
                _ => Err(err()),
            },
            ValueKind::IntArray => {
                let mut items = Vec::new();
                for part in raw.split(',') {
                    let part = part.trim();
                    if part.is_empty() {
                        continue;
                    }
                    items.push(part.parse::<i64>().map_err(|_| err())?);
                }
                Ok(RuleValue::IntArray(items))
            }
            ValueKind::StringArray => {
                let items = raw
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                Ok(RuleValue::StringArray(items))
            }
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "String",
            ValueKind::Int => "Int",
            ValueKind::NullableInt => "NullableInt",
            ValueKind::IntArray => "IntArray",
            ValueKind::StringArray => "StringArray",
            ValueKind::Boolean => "Boolean",
            ValueKind::Money => "Money",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_string() {
        let value = ValueKind::String.coerce("  gift card  ").unwrap();
        assert_eq!(value, RuleValue::String("  gift card  ".to_string()));
    }

    #[test]
    fn test_coerce_int() {
        assert_eq!(ValueKind::Int.coerce("42").unwrap(), RuleValue::Int(42));
        assert_eq!(ValueKind::Int.coerce(" -7 ").unwrap(), RuleValue::Int(-7));
        assert!(ValueKind::Int.coerce("4.2").is_err());
        assert!(ValueKind::Int.coerce("abc").is_err());
    }

    #[test]
    fn test_coerce_nullable_int() {
        assert_eq!(ValueKind::NullableInt.coerce("").unwrap(), RuleValue::Null);
        assert_eq!(ValueKind::NullableInt.coerce("NULL").unwrap(), RuleValue::Null);
        assert_eq!(ValueKind::NullableInt.coerce("5").unwrap(), RuleValue::Int(5));
    }

    #[test]
    fn test_coerce_money() {
        assert_eq!(ValueKind::Money.coerce("19.99").unwrap(), RuleValue::Money(19.99));
        assert!(ValueKind::Money.coerce("nineteen").is_err());
    }

    #[test]
    fn test_coerce_boolean() {
        assert_eq!(ValueKind::Boolean.coerce("true").unwrap(), RuleValue::Bool(true));
        assert_eq!(ValueKind::Boolean.coerce("Yes").unwrap(), RuleValue::Bool(true));
        assert_eq!(ValueKind::Boolean.coerce("0").unwrap(), RuleValue::Bool(false));
        assert!(ValueKind::Boolean.coerce("maybe").is_err());
    }

    #[test]
    fn test_coerce_int_array() {
        assert_eq!(
            ValueKind::IntArray.coerce("1, 2, 3").unwrap(),
            RuleValue::IntArray(vec![1, 2, 3])
        );
        assert_eq!(ValueKind::IntArray.coerce("").unwrap(), RuleValue::IntArray(vec![]));
        assert!(ValueKind::IntArray.coerce("1,x").is_err());
    }

    #[test]
    fn test_coerce_string_array() {
        assert_eq!(
            ValueKind::StringArray.coerce("DE, AT ,CH").unwrap(),
            RuleValue::StringArray(vec!["DE".to_string(), "AT".to_string(), "CH".to_string()])
        );
    }

    #[test]
    fn test_value_as_number() {
        assert_eq!(RuleValue::Int(3).as_number(), Some(3.0));
        assert_eq!(RuleValue::Money(1.5).as_number(), Some(1.5));
        assert_eq!(RuleValue::String("x".to_string()).as_number(), None);
    }

    #[test]
    fn test_null_coalesces_to_empty_string() {
        assert_eq!(RuleValue::Null.as_str(), Some(""));
    }

    #[test]
    fn test_value_serde_json() {
        let value = RuleValue::StringArray(vec!["a".to_string(), "b".to_string()]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"["a","b"]"#);

        let value = RuleValue::Int(10);
        assert_eq!(serde_json::to_string(&value).unwrap(), "10");
    }
}
