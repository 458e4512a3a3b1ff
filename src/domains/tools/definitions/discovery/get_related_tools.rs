//! Find calculators that share discovery values with a given one.

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

/// Parameters for the related tools tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetRelatedToolsParams {
    /// Tool id to start from.
    pub tool_id: String,

    /// Maximum number of related tools to return.
    #[serde(default)]
    pub limit: Option<usize>,
}

pub struct GetRelatedToolsTool;

impl GetRelatedToolsTool {
    pub const NAME: &'static str = "get_related_tools";

    pub const DESCRIPTION: &'static str = "List calculators related to a given tool, ranked by how many specialties, conditions, contexts, ICD-10 codes and keywords they share with it.";

    #[instrument(skip_all, fields(tool_id = %params.tool_id))]
    pub fn execute(params: &GetRelatedToolsParams, ctx: &ToolContext) -> CallToolResult {
        match ctx.discovery.get_related_tools(&params.tool_id, params.limit) {
            Ok(response) => {
                let ids: Vec<&str> = response
                    .related
                    .iter()
                    .map(|r| r.summary.tool_id.as_str())
                    .collect();
                let summary = format!(
                    "{} tool(s) related to {}: {}",
                    response.count,
                    response.tool_id,
                    ids.join(", ")
                );
                structured_result(summary, &response)
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
        let params: GetRelatedToolsParams = super::super::common::http_arguments(arguments)?;
        Ok(super::super::common::http_response(Self::execute(&params, ctx)))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetRelatedToolsParams>(),
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
                let params: GetRelatedToolsParams = parse_arguments(args)?;
                Ok(Self::execute(&params, &ctx))
            }
            .boxed()
        })
    }
}
