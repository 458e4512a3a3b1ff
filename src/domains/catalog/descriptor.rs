//! Tool descriptors.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::definition::{CalculateFn, CalculatorDefinition, CalculatorError, CalculatorOutput};
use super::dimension::HighLevelKey;
use super::error::CatalogError;
use super::parameter::{CrossFieldRule, ParameterSpec, ValueKind};
use super::values::BoundParams;

/// A literature citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub citation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

impl Reference {
    pub fn new(citation: impl Into<String>) -> Self {
        Self {
            citation: citation.into(),
            doi: None,
        }
    }

    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }
}

/// Everything the server knows about one calculator.
///
/// Built once at registration and never mutated.
#[derive(Clone)]
pub struct ToolDescriptor {
    pub tool_id: String,
    pub name: String,
    pub purpose: String,
    pub parameter_specs: Vec<ParameterSpec>,
    pub high_level_key: HighLevelKey,
    pub references: Vec<Reference>,
    pub cross_field_rules: Vec<CrossFieldRule>,
    calculate: CalculateFn,
}

impl ToolDescriptor {
    /// Start a descriptor with no parameters, key or references.
    pub fn new(
        tool_id: impl Into<String>,
        name: impl Into<String>,
        purpose: impl Into<String>,
        calculate: CalculateFn,
    ) -> Self {
        Self {
            tool_id: tool_id.into(),
            name: name.into(),
            purpose: purpose.into(),
            parameter_specs: Vec::new(),
            high_level_key: HighLevelKey::default(),
            references: Vec::new(),
            cross_field_rules: Vec::new(),
            calculate,
        }
    }

    /// Build the descriptor of a calculator definition.
    pub fn from_definition<C: CalculatorDefinition>() -> Self {
        Self::new(C::TOOL_ID, C::NAME, C::PURPOSE, C::calculate)
            .with_parameters(C::parameters())
            .with_key(C::high_level_key())
            .with_references(C::references())
            .with_rules(C::cross_field_rules())
    }

    pub fn with_parameters(mut self, specs: Vec<ParameterSpec>) -> Self {
        self.parameter_specs = specs;
        self
    }

    pub fn with_key(mut self, key: HighLevelKey) -> Self {
        self.high_level_key = key;
        self
    }

    pub fn with_references(mut self, references: Vec<Reference>) -> Self {
        self.references = references;
        self
    }

    pub fn with_rules(mut self, rules: Vec<CrossFieldRule>) -> Self {
        self.cross_field_rules = rules;
        self
    }

    /// Look up a parameter by canonical name.
    pub fn parameter(&self, canonical_name: &str) -> Option<&ParameterSpec> {
        self.parameter_specs
            .iter()
            .find(|p| p.canonical_name == canonical_name)
    }

    /// Run the bound computation.
    pub fn calculate(&self, params: &BoundParams) -> Result<CalculatorOutput, CalculatorError> {
        (self.calculate)(params)
    }

    /// Check the registration invariants.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::invalid(&self.tool_id, reason);

        if self.tool_id.is_empty()
            || !self
                .tool_id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(invalid(
                "tool id must be non-empty lowercase snake_case".to_string(),
            ));
        }

        if self.references.is_empty() {
            return Err(invalid("at least one literature reference is required".to_string()));
        }

        if !self.high_level_key.is_discoverable() {
            return Err(invalid(
                "at least one discovery dimension must be populated".to_string(),
            ));
        }

        // Every canonical name and alias must resolve to exactly one parameter.
        let mut owners: BTreeMap<String, &str> = BTreeMap::new();
        for spec in &self.parameter_specs {
            for name in spec.names() {
                let key = name.to_lowercase();
                if let Some(owner) = owners.insert(key, &spec.canonical_name) {
                    return Err(invalid(format!(
                        "name '{}' is claimed by both '{}' and '{}'",
                        name, owner, spec.canonical_name
                    )));
                }
            }

            match spec.value_kind {
                ValueKind::Enum if spec.enum_values.is_empty() => {
                    return Err(invalid(format!(
                        "enum parameter '{}' declares no values",
                        spec.canonical_name
                    )));
                }
                ValueKind::Enum | ValueKind::Boolean if spec.boundary.is_some() => {
                    return Err(invalid(format!(
                        "boundary declared on non-numeric parameter '{}'",
                        spec.canonical_name
                    )));
                }
                _ => {}
            }

            if spec.boundary.as_ref().is_some_and(|b| !b.is_consistent()) {
                return Err(invalid(format!(
                    "inconsistent boundary on '{}': expected hard_min <= soft_min <= soft_max <= hard_max",
                    spec.canonical_name
                )));
            }
        }

        for rule in &self.cross_field_rules {
            for operand in [&rule.left, &rule.right] {
                match self.parameter(operand) {
                    Some(spec) if spec.value_kind == ValueKind::Numeric => {}
                    Some(_) => {
                        return Err(invalid(format!(
                            "cross-field rule '{}' references non-numeric parameter '{}'",
                            rule.expression(),
                            operand
                        )));
                    }
                    None => {
                        return Err(invalid(format!(
                            "cross-field rule '{}' references unknown parameter '{}'",
                            rule.expression(),
                            operand
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("tool_id", &self.tool_id)
            .field("name", &self.name)
            .field("parameters", &self.parameter_specs.len())
            .field("references", &self.references.len())
            .finish_non_exhaustive()
    }
}
