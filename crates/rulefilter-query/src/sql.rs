//! Deferred SQL query adapter
//!
//! Translates a compiled predicate into a parameterized `WHERE` clause
//! without touching any data. The generated fragment uses `$n`
//! placeholders, lowers both sides of string comparisons, and escapes
//! wildcard patterns with an explicit `ESCAPE` character so a literal `_`
//! or `%` in user input never acts as a pattern wildcard. Execution,
//! cancellation and provider failures stay with the caller.

use crate::error::{Result, TranslateError};
use rulefilter_compiler::pattern::escape_like;
use rulefilter_compiler::{Comparison, Predicate};
use rulefilter_core::{Quantifier, RuleOperator, RuleValue};

/// A translated, not-yet-executed query fragment
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    /// Full `SELECT ... WHERE ...` statement
    pub sql: String,
    /// Parameter values, in `$1..$n` order
    pub params: Vec<RuleValue>,
}

/// A deferred queryable source backed by a SQL table
#[derive(Debug, Clone)]
pub struct SqlSource {
    table: String,
    columns: Vec<String>,
}

impl SqlSource {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: vec!["*".to_string()],
        }
    }

    /// Project specific columns instead of `*`
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Translate the predicate and build the full statement. Nothing is
    /// executed; the caller hands the statement and parameters to its
    /// provider when it actually enumerates.
    pub fn apply<T>(&self, predicate: &Predicate<T>) -> Result<SqlQuery> {
        let mut params = Vec::new();
        let clause = translate(predicate, &mut params)?;
        let sql = format!(
            "SELECT {} FROM {} WHERE {}",
            self.columns.join(", "),
            self.table,
            clause
        );
        tracing::debug!(table = %self.table, "generated SQL: {}", sql);
        Ok(SqlQuery { sql, params })
    }
}

/// Translate a predicate subtree into a boolean SQL expression
pub fn translate<T>(predicate: &Predicate<T>, params: &mut Vec<RuleValue>) -> Result<String> {
    match predicate {
        Predicate::Const(true) => Ok("TRUE".to_string()),
        Predicate::Const(false) => Ok("FALSE".to_string()),
        Predicate::Test { path, test, .. } => comparison_sql(path, test, params),
        Predicate::Quantifier {
            mode,
            collection_path,
            element_path,
            test,
            ..
        } => {
            let inner = comparison_sql(element_path, test, params)?;
            Ok(match mode {
                Quantifier::Any => {
                    format!("EXISTS (SELECT 1 FROM {collection_path} WHERE {inner})")
                }
                Quantifier::All => {
                    format!("NOT EXISTS (SELECT 1 FROM {collection_path} WHERE NOT ({inner}))")
                }
            })
        }
        Predicate::And(a, b) => Ok(format!(
            "({} AND {})",
            translate(a, params)?,
            translate(b, params)?
        )),
        Predicate::Or(a, b) => Ok(format!(
            "({} OR {})",
            translate(a, params)?,
            translate(b, params)?
        )),
        Predicate::Not(inner) => Ok(format!("NOT ({})", translate(inner, params)?)),
    }
}

fn comparison_sql(path: &str, test: &Comparison, params: &mut Vec<RuleValue>) -> Result<String> {
    if let Some(pattern) = &test.pattern {
        let placeholder = bind(params, RuleValue::String(pattern.to_like_pattern()));
        let like = format!("LOWER({path}) LIKE {placeholder} ESCAPE '\\'");
        return Ok(if test.operator == RuleOperator::NotLike {
            format!("NOT ({like})")
        } else {
            like
        });
    }

    match test.operator {
        RuleOperator::Contains | RuleOperator::NotContains => {
            let clause = containment_sql(path, &test.value, params)?;
            Ok(if test.operator == RuleOperator::NotContains {
                negate(clause)
            } else {
                clause
            })
        }
        RuleOperator::IsEqualTo | RuleOperator::IsNotEqualTo => {
            let negated = test.operator == RuleOperator::IsNotEqualTo;
            match &test.value {
                RuleValue::Null => Ok(format!(
                    "{path} IS {}NULL",
                    if negated { "NOT " } else { "" }
                )),
                RuleValue::String(_) => {
                    let placeholder = bind(params, test.value.clone());
                    let op = if negated { "<>" } else { "=" };
                    Ok(format!("LOWER({path}) {op} LOWER({placeholder})"))
                }
                RuleValue::Bool(_) | RuleValue::Int(_) | RuleValue::Money(_) => {
                    let placeholder = bind(params, test.value.clone());
                    let op = if negated { "<>" } else { "=" };
                    Ok(format!("{path} {op} {placeholder}"))
                }
                other => Err(TranslateError::Unsupported(format!(
                    "equality against {} value",
                    other.type_name()
                ))),
            }
        }
        RuleOperator::GreaterThan
        | RuleOperator::GreaterThanOrEqualTo
        | RuleOperator::LessThan
        | RuleOperator::LessThanOrEqualTo => {
            let op = match test.operator {
                RuleOperator::GreaterThan => ">",
                RuleOperator::GreaterThanOrEqualTo => ">=",
                RuleOperator::LessThan => "<",
                _ => "<=",
            };
            match &test.value {
                RuleValue::Int(_) | RuleValue::Money(_) => {
                    let placeholder = bind(params, test.value.clone());
                    Ok(format!("{path} {op} {placeholder}"))
                }
                RuleValue::String(_) => {
                    let placeholder = bind(params, test.value.clone());
                    Ok(format!("LOWER({path}) {op} LOWER({placeholder})"))
                }
                other => Err(TranslateError::Unsupported(format!(
                    "ordering against {} value",
                    other.type_name()
                ))),
            }
        }
        // Pattern operators always carry a parsed pattern
        RuleOperator::Like | RuleOperator::NotLike => Err(TranslateError::Unsupported(
            "pattern operator without a pattern".to_string(),
        )),
    }
}

/// Contains: substring match for a string value, membership for array values
fn containment_sql(path: &str, value: &RuleValue, params: &mut Vec<RuleValue>) -> Result<String> {
    match value {
        RuleValue::String(needle) => {
            let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
            let placeholder = bind(params, RuleValue::String(pattern));
            Ok(format!("LOWER({path}) LIKE {placeholder} ESCAPE '\\'"))
        }
        RuleValue::IntArray(items) => {
            if items.is_empty() {
                // IN over an empty set selects nothing
                return Ok("FALSE".to_string());
            }
            let placeholders: Vec<String> = items
                .iter()
                .map(|i| bind(params, RuleValue::Int(*i)))
                .collect();
            Ok(format!("{path} IN ({})", placeholders.join(", ")))
        }
        RuleValue::StringArray(items) => {
            if items.is_empty() {
                return Ok("FALSE".to_string());
            }
            let placeholders: Vec<String> = items
                .iter()
                .map(|s| format!("LOWER({})", bind(params, RuleValue::String(s.clone()))))
                .collect();
            Ok(format!("LOWER({path}) IN ({})", placeholders.join(", ")))
        }
        other => Err(TranslateError::Unsupported(format!(
            "containment against {} value",
            other.type_name()
        ))),
    }
}

fn bind(params: &mut Vec<RuleValue>, value: RuleValue) -> String {
    params.push(value);
    format!("${}", params.len())
}

fn negate(clause: String) -> String {
    format!("NOT ({clause})")
}
