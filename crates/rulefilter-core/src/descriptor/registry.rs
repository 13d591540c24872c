//! Per-scope descriptor registry
//!
//! Built once at startup through `RegistryBuilder`, then immutable and safe
//! for unsynchronized concurrent reads. Registration is fail-fast: duplicate
//! names or operators outside the value kind's applicable set error at
//! registration time, never at evaluation time.

use super::{Descriptor, FieldDescriptor, QuantifierDescriptor};
use crate::error::{ConfigError, Result};
use crate::operator::Quantifier;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable name → descriptor lookup for one rule scope
/// (e.g. a "Customer" scope)
#[derive(Debug, Clone)]
pub struct DescriptorRegistry<T> {
    descriptors: HashMap<String, Arc<Descriptor<T>>>,
    default_field: Option<String>,
}

impl<T> DescriptorRegistry<T> {
    pub fn builder() -> RegistryBuilder<T> {
        RegistryBuilder::new()
    }

    /// Look up a descriptor by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&Arc<Descriptor<T>>> {
        self.descriptors.get(&name.to_lowercase())
    }

    /// Name of the descriptor a field-less term binds to, if declared
    pub fn default_field(&self) -> Option<&str> {
        self.default_field.as_deref()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Builder wiring up a descriptor scope at startup
pub struct RegistryBuilder<T> {
    descriptors: HashMap<String, Arc<Descriptor<T>>>,
    default_field: Option<String>,
}

impl<T> RegistryBuilder<T> {
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
            default_field: None,
        }
    }

    /// Register a scalar field descriptor
    pub fn field(self, descriptor: FieldDescriptor<T>) -> Result<Self> {
        self.insert(Descriptor::Field(descriptor))
    }

    /// Register a quantifier descriptor with the given fold mode
    pub fn quantifier(
        self,
        mode: Quantifier,
        descriptor: QuantifierDescriptor<T>,
    ) -> Result<Self> {
        let descriptor = match mode {
            Quantifier::Any => Descriptor::Any(descriptor),
            Quantifier::All => Descriptor::All(descriptor),
        };
        self.insert(descriptor)
    }

    /// Declare which descriptor a field-less term binds to
    pub fn default_field(mut self, name: impl Into<String>) -> Self {
        self.default_field = Some(name.into());
        self
    }

    fn insert(mut self, descriptor: Descriptor<T>) -> Result<Self> {
        let name = descriptor.name().to_string();
        if descriptor.operators().is_empty() {
            return Err(ConfigError::EmptyOperatorSet(name));
        }
        let kind = descriptor.kind();
        for &operator in descriptor.operators() {
            if !operator.supports(kind) {
                return Err(ConfigError::OperatorNotApplicable {
                    name: name.clone(),
                    operator,
                    kind,
                });
            }
        }
        let key = name.to_lowercase();
        if self.descriptors.contains_key(&key) {
            return Err(ConfigError::DuplicateDescriptor(name));
        }
        self.descriptors.insert(key, Arc::new(descriptor));
        Ok(self)
    }

    pub fn build(self) -> Result<DescriptorRegistry<T>> {
        if let Some(name) = &self.default_field {
            if !self.descriptors.contains_key(&name.to_lowercase()) {
                return Err(ConfigError::UnknownDefaultField(name.clone()));
            }
        }
        log::debug!("descriptor scope built with {} descriptors", self.descriptors.len());
        Ok(DescriptorRegistry {
            descriptors: self.descriptors,
            default_field: self.default_field,
        })
    }
}

impl<T> Default for RegistryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::RuleOperator;
    use crate::value::{RuleValue, ValueKind};

    struct Customer {
        country: String,
    }

    fn country_field() -> FieldDescriptor<Customer> {
        FieldDescriptor::new("Country", "country", ValueKind::String, |c: &Customer| {
            RuleValue::String(c.country.clone())
        })
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = DescriptorRegistry::builder()
            .field(country_field())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.get("Country").is_some());
        // Lookup is case-insensitive
        assert!(registry.get("country").is_some());
        assert!(registry.get("COUNTRY").is_some());
        assert!(registry.get("City").is_none());
    }

    #[test]
    fn test_duplicate_descriptor_fails_fast() {
        let result = DescriptorRegistry::builder()
            .field(country_field())
            .unwrap()
            .field(country_field());

        assert!(matches!(result, Err(ConfigError::DuplicateDescriptor(name)) if name == "Country"));
    }

    #[test]
    fn test_operator_kind_mismatch_fails_fast() {
        let descriptor = FieldDescriptor::new("Active", "active", ValueKind::Boolean, |_: &Customer| {
            RuleValue::Bool(true)
        })
        .with_operators([RuleOperator::Like]);

        let result = DescriptorRegistry::builder().field(descriptor);
        assert!(matches!(
            result,
            Err(ConfigError::OperatorNotApplicable {
                operator: RuleOperator::Like,
                kind: ValueKind::Boolean,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_operator_set_rejected() {
        let descriptor = country_field().with_operators([]);
        let result = DescriptorRegistry::builder().field(descriptor);
        assert!(matches!(result, Err(ConfigError::EmptyOperatorSet(_))));
    }

    #[test]
    fn test_unknown_default_field_rejected() {
        let result = DescriptorRegistry::builder()
            .field(country_field())
            .unwrap()
            .default_field("CustomerNumber")
            .build();
        assert!(matches!(result, Err(ConfigError::UnknownDefaultField(_))));
    }

    #[test]
    fn test_default_field_resolves() {
        let registry = DescriptorRegistry::builder()
            .field(country_field())
            .unwrap()
            .default_field("Country")
            .build()
            .unwrap();
        assert_eq!(registry.default_field(), Some("Country"));
    }
}
