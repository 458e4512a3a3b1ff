//! Run one calculator.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, instrument};

use super::super::common::{error_result, parse_arguments, structured_result};
use crate::domains::tools::ToolContext;

/// Parameters for the calculate tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CalculateParams {
    /// Tool id to run.
    pub tool_id: String,

    /// Input values keyed by canonical name, alias or a close spelling.
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Calculate tool - resolves parameter names, validates and computes.
pub struct CalculateTool;

impl CalculateTool {
    pub const NAME: &'static str = "calculate";

    pub const DESCRIPTION: &'static str = "Run a clinical calculator. Parameter names are matched exactly, by alias, with unit suffixes (age_years) or by close spelling. Returns the value, unit, interpretation, literature references and any warnings. Invalid input returns a structured error naming the parameter and what was expected.";

    #[instrument(skip_all, fields(tool_id = %params.tool_id))]
    pub fn execute(params: &CalculateParams, ctx: &ToolContext) -> CallToolResult {
        match ctx.calculation.execute(&params.tool_id, &params.params) {
            Ok(result) => {
                info!(value = result.value, "Calculated {}", result.tool_id);
                structured_result(result.summary(), &result)
            }
            Err(e) => error_result(e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: CalculateParams = super::super::common::http_arguments(arguments)?;
        Ok(super::super::common::http_response(Self::execute(&params, ctx)))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<CalculateParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    pub fn create_route<S>(ctx: Arc<ToolContext>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |call: ToolCallContext<'_, S>| {
            let args = call.arguments.clone().unwrap_or_default();
            let ctx = ctx.clone();
            async move {
                let params: CalculateParams = parse_arguments(args)?;
                Ok(Self::execute(&params, &ctx))
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use serde_json::json;

    fn run(tool_id: &str, params: Value) -> CallToolResult {
        let ctx = ToolContext::builtin(&Config::default()).unwrap();
        CalculateTool::execute(
            &CalculateParams {
                tool_id: tool_id.to_string(),
                params: params.as_object().cloned().unwrap(),
            },
            &ctx,
        )
    }

    #[test]
    fn test_success_has_value_and_references() {
        let result = run("ckd_epi_2021", json!({"Cr": 1.2, "age_years": 65, "sex": "male"}));
        assert_eq!(result.is_error, Some(false));
        let data = result.structured_content.unwrap();
        assert_eq!(data["value"], 67.1);
        assert_eq!(data["interpretation"]["stage"], "G2");
        assert!(!data["references"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_hard_range_is_structured_error() {
        let result = run("anion_gap", json!({"sodium": 500}));
        assert_eq!(result.is_error, Some(true));
        let body = result.structured_content.unwrap();
        assert_eq!(body["code"], "HARD_RANGE_VIOLATION");
        assert_eq!(body["details"]["parameter"], "sodium");
    }
}
