//! Tool Registry - central registration of all calculators.
//!
//! The registry is filled during startup by a single registration pass and
//! then shared behind an `Arc`. Nothing mutates it afterwards, so concurrent
//! readers need no locking.

use std::collections::BTreeMap;
use std::collections::btree_map::Values;
use tracing::{debug, info, warn};

use super::definition::CalculatorDefinition;
use super::descriptor::ToolDescriptor;
use super::error::CatalogError;
use crate::domains::calculators;

/// Immutable catalog of tool descriptors, keyed by tool id.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolDescriptor>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry holding every built-in calculator.
    pub fn builtin() -> Result<Self, CatalogError> {
        let mut registry = Self::new();
        calculators::register_all(&mut registry)?;
        info!("Registered {} calculators", registry.len());
        Ok(registry)
    }

    /// Build a registry from arbitrary descriptors, failing on the first invalid one.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = ToolDescriptor>,
    ) -> Result<Self, CatalogError> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Add a descriptor after checking its invariants.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), CatalogError> {
        if self.tools.contains_key(&descriptor.tool_id) {
            warn!("Rejected duplicate tool id: {}", descriptor.tool_id);
            return Err(CatalogError::duplicate(&descriptor.tool_id));
        }

        descriptor.validate()?;

        debug!(
            tool_id = %descriptor.tool_id,
            parameters = descriptor.parameter_specs.len(),
            "Registered tool"
        );
        self.tools.insert(descriptor.tool_id.clone(), descriptor);
        Ok(())
    }

    /// Register a calculator definition.
    pub fn register_definition<C: CalculatorDefinition>(&mut self) -> Result<(), CatalogError> {
        self.register(ToolDescriptor::from_definition::<C>())
    }

    /// Look up a descriptor by id.
    pub fn get(&self, tool_id: &str) -> Result<&ToolDescriptor, CatalogError> {
        self.tools
            .get(tool_id)
            .ok_or_else(|| CatalogError::not_found(tool_id))
    }

    /// Whether `tool_id` is registered.
    pub fn contains(&self, tool_id: &str) -> bool {
        self.tools.contains_key(tool_id)
    }

    /// Every descriptor, ordered by tool id.
    ///
    /// Each call starts a fresh iteration.
    pub fn all(&self) -> Values<'_, String, ToolDescriptor> {
        self.tools.values()
    }

    /// Every registered tool id, ordered.
    pub fn tool_ids(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::catalog::{
        BoundParams, CalculatorError, CalculatorOutput, HighLevelKey, Interpretation, Reference,
        Severity,
    };

    fn noop(_: &BoundParams) -> Result<CalculatorOutput, CalculatorError> {
        Ok(CalculatorOutput::new(
            1.0,
            "",
            Interpretation::new(Severity::Normal, "ok"),
        ))
    }

    fn descriptor(id: &str) -> ToolDescriptor {
        ToolDescriptor::new(id, id, "testing", noop)
            .with_key(HighLevelKey::new().keywords(["test"]))
            .with_references(vec![Reference::new("ref")])
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(descriptor("alpha")).unwrap();

        assert_eq!(registry.get("alpha").unwrap().tool_id, "alpha");
        assert!(matches!(
            registry.get("beta"),
            Err(CatalogError::ToolNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(descriptor("alpha")).unwrap();
        let err = registry.register(descriptor("alpha")).unwrap_err();
        assert_eq!(err, CatalogError::duplicate("alpha"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_descriptor_rejected() {
        let mut registry = ToolRegistry::new();
        let err = registry
            .register(descriptor("alpha").with_references(vec![]))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDescriptor { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_all_is_ordered_and_restartable() {
        let mut registry = ToolRegistry::new();
        for id in ["gamma", "alpha", "beta"] {
            registry.register(descriptor(id)).unwrap();
        }

        let first: Vec<_> = registry.all().map(|d| d.tool_id.as_str()).collect();
        let second: Vec<_> = registry.all().map(|d| d.tool_id.as_str()).collect();
        assert_eq!(first, vec!["alpha", "beta", "gamma"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_builtin_catalog_invariants() {
        let registry = ToolRegistry::builtin().unwrap();
        assert!(!registry.is_empty());
        for tool in registry.all() {
            assert!(!tool.references.is_empty(), "{} has no references", tool.tool_id);
            assert!(tool.high_level_key.is_discoverable());
            assert!(tool.validate().is_ok());
        }
    }
}
