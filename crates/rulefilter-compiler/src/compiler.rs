//! Binding and compilation
//!
//! Resolves each term's field name against the descriptor scope, coerces
//! the raw value to the descriptor's value kind, checks the operator
//! against the descriptor's allowed set, and folds the group tree into a
//! [`Predicate`]. Groups fold strictly left-to-right with the left
//! operand's combinator; there is no precedence between `and` and `or`.

use crate::error::{CompileError, Result};
use crate::predicate::{Comparison, Predicate};
use rulefilter_core::{
    Descriptor, DescriptorRegistry, FilterGroup, FilterNode, FilterTerm, Quantifier, RuleOperator,
    ValueKind,
};
use rulefilter_parser::FilterParser;

/// Compile a bound filter group into an executable predicate.
///
/// An empty root group compiles to the constant `true` predicate: an empty
/// rule set selects everything.
pub fn compile<T>(group: &FilterGroup, scope: &DescriptorRegistry<T>) -> Result<Predicate<T>> {
    let predicate = compile_group(group, scope)?;
    log::debug!("compiled filter '{}'", group);
    Ok(predicate)
}

/// Parse a filter string and compile it against the scope in one step
pub fn compile_text<T>(input: &str, scope: &DescriptorRegistry<T>) -> Result<Predicate<T>> {
    let group = FilterParser::parse(input)?;
    compile(&group, scope)
}

fn compile_group<T>(group: &FilterGroup, scope: &DescriptorRegistry<T>) -> Result<Predicate<T>> {
    let mut children = group.children.iter();

    let mut predicate = match children.next() {
        None => Predicate::Const(true),
        Some(first) => {
            let mut acc = compile_node(first, scope)?;
            let mut combinator = first.combinator();
            for child in children {
                let next = compile_node(child, scope)?;
                acc = acc.combine(combinator, next);
                combinator = child.combinator();
            }
            acc
        }
    };

    if group.negate {
        predicate = predicate.not();
    }
    Ok(predicate)
}

fn compile_node<T>(node: &FilterNode, scope: &DescriptorRegistry<T>) -> Result<Predicate<T>> {
    match node {
        FilterNode::Term(term) => compile_term(term, scope),
        FilterNode::Group(group) => compile_group(group, scope),
    }
}

fn compile_term<T>(term: &FilterTerm, scope: &DescriptorRegistry<T>) -> Result<Predicate<T>> {
    let name = match term.field.as_deref().or_else(|| scope.default_field()) {
        Some(name) => name,
        None => return Err(CompileError::NoDefaultField(term.raw_value.clone())),
    };
    let descriptor = scope
        .get(name)
        .ok_or_else(|| CompileError::UnknownField(name.to_string()))?;

    match descriptor.as_ref() {
        Descriptor::Field(field) => {
            let test = bind_comparison(term, name, field.kind, descriptor.operators())?;
            Ok(Predicate::Test {
                path: field.path.clone(),
                access: field.accessor(),
                test,
            })
        }
        Descriptor::Any(quantifier) => {
            let test = bind_comparison(term, name, quantifier.kind, descriptor.operators())?;
            Ok(Predicate::Quantifier {
                mode: Quantifier::Any,
                collection_path: quantifier.collection_path.clone(),
                element_path: quantifier.element_path.clone(),
                access: quantifier.accessor(),
                test,
            })
        }
        Descriptor::All(quantifier) => {
            let test = bind_comparison(term, name, quantifier.kind, descriptor.operators())?;
            Ok(Predicate::Quantifier {
                mode: Quantifier::All,
                collection_path: quantifier.collection_path.clone(),
                element_path: quantifier.element_path.clone(),
                access: quantifier.accessor(),
                test,
            })
        }
    }
}

/// Coerce the raw value and resolve the effective operator for one term
fn bind_comparison(
    term: &FilterTerm,
    field: &str,
    kind: ValueKind,
    allowed: &[RuleOperator],
) -> Result<Comparison> {
    let mut operator = term.operator;

    // The parser defaults a bare token to Contains, which has no numeric
    // meaning; rewrite it to equality for numeric fields.
    if term.implicit_operator && operator == RuleOperator::Contains && kind.is_numeric() {
        operator = RuleOperator::IsEqualTo;
    }

    if !allowed.contains(&operator) {
        return Err(CompileError::UnsupportedOperator {
            field: field.to_string(),
            operator,
        });
    }

    let value = if operator.is_pattern() {
        // Patterns always match on the string form
        ValueKind::String.coerce(&term.raw_value)?
    } else {
        kind.coerce(&term.raw_value)?
    };

    Ok(Comparison::new(operator, value))
}
