//! Calculation result envelopes.

use schemars::JsonSchema;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

use super::error::CalculationError;
use crate::domains::catalog::{Interpretation, Reference};
use crate::domains::parameters::{MatchMethod, ParameterWarning};

/// How one supplied key was bound to a canonical parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedParameter {
    pub canonical_name: String,
    pub supplied_key: String,
    #[serde(flatten)]
    pub method: MatchMethod,
}

/// A successful calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    pub tool_id: String,
    pub tool_name: String,
    pub value: f64,
    pub unit: String,
    pub interpretation: Interpretation,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, f64>,
    pub references: Vec<Reference>,
    pub warnings: Vec<ParameterWarning>,
    pub resolved_parameters: Vec<ResolvedParameter>,
}

impl CalculationResult {
    /// One-line text rendering for MCP text content.
    pub fn summary(&self) -> String {
        let mut text = format!("{}: {}", self.tool_name, self.interpretation.summary);
        if !self.warnings.is_empty() {
            text.push_str(&format!(" ({} warning(s))", self.warnings.len()));
        }
        text
    }
}

/// One entry of a batch request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct BatchItem {
    /// Tool id to run
    pub tool_id: String,
    /// Parameters keyed by canonical name, alias or close spelling
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl BatchItem {
    pub fn new(tool_id: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            tool_id: tool_id.into(),
            params,
        }
    }
}

/// Outcome of one batch entry; failures are isolated per item.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItemResult {
    pub index: usize,
    pub tool_id: String,
    pub outcome: Result<CalculationResult, CalculationError>,
}

impl BatchItemResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl Serialize for BatchItemResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BatchItemResult", 4)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("tool_id", &self.tool_id)?;
        match &self.outcome {
            Ok(result) => {
                state.serialize_field("status", "ok")?;
                state.serialize_field("result", result)?;
            }
            Err(err) => {
                state.serialize_field("status", "error")?;
                state.serialize_field(
                    "error",
                    &json!({
                        "code": err.code(),
                        "message": err.to_string(),
                        "details": err.details(),
                    }),
                )?;
            }
        }
        state.end()
    }
}
