//! Discovery response shapes.
//!
//! Every response carries a [`NextStep`] so a caller always knows which tool
//! to call next, even after an empty result.

use serde::Serialize;
use serde_json::{Value, json};

use crate::domains::catalog::{
    ClinicalContext, CrossFieldRule, DimensionValue, HighLevelKey, ParameterSpec, Reference,
    Specialty, ToolDescriptor,
};

/// Machine-readable pointer to the next useful call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextStep {
    pub action: String,
    pub arguments: Value,
    pub description: String,
}

impl NextStep {
    pub fn new(action: &str, arguments: Value, description: impl Into<String>) -> Self {
        Self {
            action: action.to_string(),
            arguments,
            description: description.into(),
        }
    }

    pub fn list_specialties() -> Self {
        Self::new(
            "list_specialties",
            json!({}),
            "Browse the specialties present in the catalog",
        )
    }

    pub fn get_tool_schema(tool_id: &str) -> Self {
        Self::new(
            "get_tool_schema",
            json!({ "tool_id": tool_id }),
            format!("Inspect the parameters of '{}' before calculating", tool_id),
        )
    }

    pub fn calculate(tool_id: &str) -> Self {
        Self::new(
            "calculate",
            json!({ "tool_id": tool_id, "params": {} }),
            format!("Call '{}' with the parameters listed in its schema", tool_id),
        )
    }

    pub fn discover(by: &str, value: &str) -> Self {
        Self::new(
            "discover_tools",
            json!({ "by": by, "value": value }),
            format!("List the tools for {} '{}'", by, value),
        )
    }
}

/// Compact description of a tool in a result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSummary {
    pub tool_id: String,
    pub name: String,
    pub purpose: String,
    pub specialties: Vec<Specialty>,
    pub clinical_contexts: Vec<ClinicalContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl ToolSummary {
    pub fn of(tool: &ToolDescriptor) -> Self {
        Self {
            tool_id: tool.tool_id.clone(),
            name: tool.name.clone(),
            purpose: tool.purpose.clone(),
            specialties: tool.high_level_key.specialties.iter().copied().collect(),
            clinical_contexts: tool.high_level_key.clinical_contexts.iter().copied().collect(),
            score: None,
        }
    }

    pub fn scored(tool: &ToolDescriptor, score: u32) -> Self {
        Self {
            score: Some(score),
            ..Self::of(tool)
        }
    }
}

/// Result of a `discover` query along one dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryResponse {
    /// The dimension that was queried.
    pub by: &'static str,
    /// The caller's value, echoed.
    pub query: String,
    /// Total matches before any limit.
    pub count: usize,
    pub tools: Vec<ToolSummary>,
    pub next_step: NextStep,
}

impl DiscoveryResponse {
    pub fn new(by: &'static str, query: &str, count: usize, tools: Vec<ToolSummary>) -> Self {
        let next_step = match tools.first() {
            Some(best) => NextStep::get_tool_schema(&best.tool_id),
            None => NextStep::list_specialties(),
        };
        Self {
            by,
            query: query.to_string(),
            count,
            tools,
            next_step,
        }
    }
}

/// A dimension value present in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionCount {
    pub value: String,
    pub tool_count: usize,
}

/// Distinct values of a closed dimension with tool counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionListing {
    pub dimension: &'static str,
    pub count: usize,
    pub values: Vec<DimensionCount>,
    pub next_step: NextStep,
}

impl DimensionListing {
    pub fn new(dimension: &'static str, by: &str, values: Vec<DimensionCount>) -> Self {
        let next_step = match values.first() {
            Some(first) => NextStep::discover(by, &first.value),
            None => NextStep::new("discover_tools", json!({ "by": "keyword" }), "Search by keyword"),
        };
        Self {
            dimension,
            count: values.len(),
            values,
            next_step,
        }
    }
}

/// A tool related to another through shared discovery values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedTool {
    #[serde(flatten)]
    pub summary: ToolSummary,
    pub shared_count: usize,
    pub shared_values: Vec<DimensionValue>,
}

/// Tools sharing at least one discovery value with `tool_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedToolsResponse {
    pub tool_id: String,
    /// Total related tools before any limit.
    pub count: usize,
    pub related: Vec<RelatedTool>,
    pub next_step: NextStep,
}

/// Everything a caller needs to invoke one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSchema {
    pub tool_id: String,
    pub name: String,
    pub purpose: String,
    pub parameters: Vec<ParameterSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cross_field_rules: Vec<CrossFieldRule>,
    pub references: Vec<Reference>,
    pub high_level_key: HighLevelKey,
    pub next_step: NextStep,
}

impl ToolSchema {
    pub fn of(tool: &ToolDescriptor) -> Self {
        Self {
            tool_id: tool.tool_id.clone(),
            name: tool.name.clone(),
            purpose: tool.purpose.clone(),
            parameters: tool.parameter_specs.clone(),
            cross_field_rules: tool.cross_field_rules.clone(),
            references: tool.references.clone(),
            high_level_key: tool.high_level_key.clone(),
            next_step: NextStep::calculate(&tool.tool_id),
        }
    }
}
