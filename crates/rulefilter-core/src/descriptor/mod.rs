//! Field and quantifier descriptors
//!
//! A descriptor binds a logical field name to an access path into a target
//! record type, declares the field's value kind and the operators it
//! accepts. Access is a typed closure captured at registration time, so
//! compilation stays allocation-light and needs no reflection. Descriptors
//! are immutable once registered and live for the process lifetime.

mod registry;

pub use registry::{DescriptorRegistry, RegistryBuilder};

use crate::operator::{Quantifier, RuleOperator};
use crate::value::{RuleValue, ValueKind};
use std::fmt;
use std::sync::Arc;

/// Typed accessor projecting a scalar value out of a record
pub type ValueAccessor<T> = Arc<dyn Fn(&T) -> RuleValue + Send + Sync>;

/// Typed accessor projecting the element values of a related collection
pub type CollectionAccessor<T> = Arc<dyn Fn(&T) -> Vec<RuleValue> + Send + Sync>;

/// Binds a logical field name to a scalar access path of `T`
pub struct FieldDescriptor<T> {
    /// Unique name within a scope; matched case-insensitively
    pub name: String,
    /// Access path for deferred query translation (e.g. a column name)
    pub path: String,
    /// Value kind driving literal coercion and operator applicability
    pub kind: ValueKind,
    /// Operators this field accepts; defaults to everything applicable
    pub operators: Vec<RuleOperator>,
    accessor: ValueAccessor<T>,
}

impl<T> FieldDescriptor<T> {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        kind: ValueKind,
        accessor: impl Fn(&T) -> RuleValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            operators: RuleOperator::applicable(kind),
            accessor: Arc::new(accessor),
        }
    }

    /// Restrict the allowed operator set. The set is validated against the
    /// value kind when the descriptor is registered.
    pub fn with_operators(mut self, operators: impl IntoIterator<Item = RuleOperator>) -> Self {
        self.operators = operators.into_iter().collect();
        self
    }

    /// Project the field value out of a record
    pub fn get(&self, record: &T) -> RuleValue {
        (self.accessor)(record)
    }

    /// Shared handle to the accessor closure
    pub fn accessor(&self) -> ValueAccessor<T> {
        Arc::clone(&self.accessor)
    }
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            path: self.path.clone(),
            kind: self.kind,
            operators: self.operators.clone(),
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("operators", &self.operators)
            .finish()
    }
}

/// Binds a logical field name to a one-to-many relationship of `T`.
///
/// Compiles to "does at least one / do all related elements satisfy the
/// inner comparison", depending on the registered quantifier mode.
pub struct QuantifierDescriptor<T> {
    /// Unique name within a scope; matched case-insensitively
    pub name: String,
    /// Access path to the related collection (e.g. a relation or table)
    pub collection_path: String,
    /// Access path to the compared value within one element
    pub element_path: String,
    /// Value kind of one element's projected value
    pub kind: ValueKind,
    /// Operators the element-level comparison accepts
    pub operators: Vec<RuleOperator>,
    accessor: CollectionAccessor<T>,
}

impl<T> QuantifierDescriptor<T> {
    pub fn new(
        name: impl Into<String>,
        collection_path: impl Into<String>,
        element_path: impl Into<String>,
        kind: ValueKind,
        accessor: impl Fn(&T) -> Vec<RuleValue> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            collection_path: collection_path.into(),
            element_path: element_path.into(),
            kind,
            operators: RuleOperator::applicable(kind),
            accessor: Arc::new(accessor),
        }
    }

    /// Restrict the allowed operator set for the element comparison
    pub fn with_operators(mut self, operators: impl IntoIterator<Item = RuleOperator>) -> Self {
        self.operators = operators.into_iter().collect();
        self
    }

    /// Project the related elements' values out of a record
    pub fn elements(&self, record: &T) -> Vec<RuleValue> {
        (self.accessor)(record)
    }

    /// Shared handle to the accessor closure
    pub fn accessor(&self) -> CollectionAccessor<T> {
        Arc::clone(&self.accessor)
    }
}

impl<T> Clone for QuantifierDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            collection_path: self.collection_path.clone(),
            element_path: self.element_path.clone(),
            kind: self.kind,
            operators: self.operators.clone(),
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<T> fmt::Debug for QuantifierDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantifierDescriptor")
            .field("name", &self.name)
            .field("collection_path", &self.collection_path)
            .field("element_path", &self.element_path)
            .field("kind", &self.kind)
            .field("operators", &self.operators)
            .finish()
    }
}

/// Tagged union over the descriptor variants. Each variant compiles
/// differently; matching on the tag keeps compilation exhaustive.
#[derive(Debug, Clone)]
pub enum Descriptor<T> {
    Field(FieldDescriptor<T>),
    Any(QuantifierDescriptor<T>),
    All(QuantifierDescriptor<T>),
}

impl<T> Descriptor<T> {
    pub fn name(&self) -> &str {
        match self {
            Descriptor::Field(d) => &d.name,
            Descriptor::Any(d) | Descriptor::All(d) => &d.name,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Descriptor::Field(d) => d.kind,
            Descriptor::Any(d) | Descriptor::All(d) => d.kind,
        }
    }

    pub fn operators(&self) -> &[RuleOperator] {
        match self {
            Descriptor::Field(d) => &d.operators,
            Descriptor::Any(d) | Descriptor::All(d) => &d.operators,
        }
    }

    /// Whether the operator is in this descriptor's allowed set
    pub fn allows(&self, operator: RuleOperator) -> bool {
        self.operators().contains(&operator)
    }

    /// Quantifier mode, if this is a quantifier descriptor
    pub fn quantifier(&self) -> Option<Quantifier> {
        match self {
            Descriptor::Field(_) => None,
            Descriptor::Any(_) => Some(Quantifier::Any),
            Descriptor::All(_) => Some(Quantifier::All),
        }
    }
}
