//! Calculator definitions.
//!
//! Every calculator in the catalog implements [`CalculatorDefinition`]. The
//! registry turns a definition into a [`ToolDescriptor`](super::ToolDescriptor)
//! exactly once, capturing `calculate` as a plain function pointer so that no
//! dispatch happens by name at call time.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use super::descriptor::Reference;
use super::dimension::HighLevelKey;
use super::parameter::{CrossFieldRule, ParameterSpec};
use super::values::BoundParams;

/// Signature of a calculator's pure computation.
pub type CalculateFn = fn(&BoundParams) -> Result<CalculatorOutput, CalculatorError>;

/// Trait for calculator definitions.
///
/// Each calculator lives in its own file under `domains/calculators/` and
/// provides its metadata and computation through this trait.
pub trait CalculatorDefinition {
    /// Globally unique, stable identifier.
    const TOOL_ID: &'static str;

    /// Display name.
    const NAME: &'static str;

    /// One-sentence description of what the tool computes.
    const PURPOSE: &'static str;

    /// Ordered parameter schema.
    fn parameters() -> Vec<ParameterSpec>;

    /// Discovery metadata.
    fn high_level_key() -> HighLevelKey;

    /// Literature backing the formula. Must not be empty.
    fn references() -> Vec<Reference>;

    /// Relational invariants between parameters.
    fn cross_field_rules() -> Vec<CrossFieldRule> {
        Vec::new()
    }

    /// Compute the result from validated inputs.
    fn calculate(params: &BoundParams) -> Result<CalculatorOutput, CalculatorError>;
}

/// How concerning a result is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    Mild,
    Moderate,
    Severe,
    Critical,
}

/// Clinical reading of a computed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub summary: String,
    pub severity: Severity,
    /// Stage or category label, e.g. `G2` or `high risk`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

impl Interpretation {
    pub fn new(severity: Severity, summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            severity,
            stage: None,
            recommendations: Vec::new(),
        }
    }

    pub fn stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn recommend(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendations.push(recommendation.into());
        self
    }
}

/// What a calculator returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatorOutput {
    pub value: f64,
    pub unit: String,
    pub interpretation: Interpretation,
    /// Sub-scores or intermediate values, keyed by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, f64>,
}

impl CalculatorOutput {
    pub fn new(value: f64, unit: impl Into<String>, interpretation: Interpretation) -> Self {
        Self {
            value,
            unit: unit.into(),
            interpretation,
            components: BTreeMap::new(),
        }
    }

    pub fn component(mut self, name: impl Into<String>, value: f64) -> Self {
        self.components.insert(name.into(), value);
        self
    }
}

/// Errors a calculator may raise on inputs that passed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculatorError {
    #[error("input '{name}' was not supplied")]
    MissingInput { name: String },

    #[error("input '{name}' should be {expected} but was {actual}")]
    WrongKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{0}")]
    Undefined(String),
}

impl CalculatorError {
    pub fn missing_input(name: impl Into<String>) -> Self {
        Self::MissingInput { name: name.into() }
    }

    pub fn wrong_kind(name: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::WrongKind {
            name: name.into(),
            expected,
            actual,
        }
    }

    /// The formula is not defined for the given inputs.
    pub fn undefined(msg: impl Into<String>) -> Self {
        Self::Undefined(msg.into())
    }
}
