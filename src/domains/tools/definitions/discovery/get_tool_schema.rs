//! Return the full parameter schema of one calculator.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

use super::super::common::{error_result, parse_arguments, structured_result};
use crate::domains::tools::ToolContext;

/// Parameters for the schema tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetToolSchemaParams {
    /// Exact tool id, as returned by discover_tools.
    pub tool_id: String,
}

pub struct GetToolSchemaTool;

impl GetToolSchemaTool {
    pub const NAME: &'static str = "get_tool_schema";

    pub const DESCRIPTION: &'static str = "Describe one calculator: canonical parameter names, accepted aliases, units, valid ranges, cross-field rules and literature references.";

    #[instrument(skip_all, fields(tool_id = %params.tool_id))]
    pub fn execute(params: &GetToolSchemaParams, ctx: &ToolContext) -> CallToolResult {
        match ctx.discovery.tool_schema(&params.tool_id) {
            Ok(schema) => {
                let required = schema.parameters.iter().filter(|p| p.required).count();
                let summary = format!(
                    "{} takes {} parameter(s), {} required",
                    schema.name,
                    schema.parameters.len(),
                    required
                );
                structured_result(summary, &schema)
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
        let params: GetToolSchemaParams = super::super::common::http_arguments(arguments)?;
        Ok(super::super::common::http_response(Self::execute(&params, ctx)))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetToolSchemaParams>(),
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
                let params: GetToolSchemaParams = parse_arguments(args)?;
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

    fn run(tool_id: &str) -> CallToolResult {
        let ctx = ToolContext::builtin(&Config::default()).unwrap();
        GetToolSchemaTool::execute(
            &GetToolSchemaParams {
                tool_id: tool_id.to_string(),
            },
            &ctx,
        )
    }

    #[test]
    fn test_schema_lists_parameters_and_references() {
        let data = run("ckd_epi_2021").structured_content.unwrap();
        let names: Vec<_> = data["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["canonical_name"].as_str().unwrap().to_string())
            .collect();
        assert!(names.contains(&"serum_creatinine".to_string()));
        assert!(!data["references"].as_array().unwrap().is_empty());
        assert_eq!(data["next_step"]["action"], "calculate");
    }

    #[test]
    fn test_unknown_tool() {
        let result = run("not_a_tool");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.structured_content.unwrap()["code"], "TOOL_NOT_FOUND");
    }
}
