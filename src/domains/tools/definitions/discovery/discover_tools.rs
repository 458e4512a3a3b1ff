//! Discover tools by specialty, context, condition, ICD-10 code or keyword.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::super::common::{error_result, parse_arguments, structured_result};
use crate::domains::discovery::DiscoverBy;
use crate::domains::tools::ToolContext;

/// Parameters for the discover tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DiscoverToolsParams {
    /// Dimension to search along.
    #[schemars(description = "One of: specialty, context, condition, icd10, keyword")]
    pub by: String,

    /// Value to look up, e.g. "nephrology", "sepsis" or "N18".
    pub value: String,

    /// Maximum number of keyword results (keyword search only).
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Discover tool - the entry point for callers that do not know tool ids.
pub struct DiscoverToolsTool;

impl DiscoverToolsTool {
    pub const NAME: &'static str = "discover_tools";

    pub const DESCRIPTION: &'static str = "Find clinical calculators by specialty, clinical context, condition, ICD-10 code or free-text keyword. Keyword results are ranked by relevance. Every response names the next call to make.";

    #[instrument(skip_all, fields(by = %params.by, value = %params.value))]
    pub fn execute(params: &DiscoverToolsParams, ctx: &ToolContext) -> CallToolResult {
        let by = match DiscoverBy::parse(&params.by) {
            Ok(by) => by,
            Err(e) => return error_result(e),
        };

        match ctx.discovery.discover(by, &params.value, params.limit) {
            Ok(response) => {
                info!("Discovery returned {} tool(s)", response.tools.len());
                let summary = match response.tools.first() {
                    Some(first) => format!(
                        "Found {} tool(s) for {} '{}'; best match: {}",
                        response.count, response.by, response.query, first.tool_id
                    ),
                    None => format!(
                        "No tools found for {} '{}'; try list_specialties",
                        response.by, response.query
                    ),
                };
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
        let params: DiscoverToolsParams = super::super::common::http_arguments(arguments)?;
        Ok(super::super::common::http_response(Self::execute(&params, ctx)))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<DiscoverToolsParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the STDIO transport.
    pub fn create_route<S>(ctx: Arc<ToolContext>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |call: ToolCallContext<'_, S>| {
            let args = call.arguments.clone().unwrap_or_default();
            let ctx = ctx.clone();
            async move {
                let params: DiscoverToolsParams = parse_arguments(args)?;
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

    fn ctx() -> ToolContext {
        ToolContext::builtin(&Config::default()).unwrap()
    }

    fn params(by: &str, value: &str) -> DiscoverToolsParams {
        DiscoverToolsParams {
            by: by.to_string(),
            value: value.to_string(),
            limit: None,
        }
    }

    #[test]
    fn test_keyword_discovery_is_ranked() {
        let result = DiscoverToolsTool::execute(&params("keyword", "sepsis"), &ctx());
        assert_eq!(result.is_error, Some(false));
        let data = result.structured_content.unwrap();
        assert_eq!(data["tools"][0]["tool_id"], "news2_score");
        assert_eq!(data["next_step"]["action"], "get_tool_schema");
    }

    #[test]
    fn test_unknown_specialty_lists_options() {
        let result = DiscoverToolsTool::execute(&params("specialty", "astrology"), &ctx());
        assert_eq!(result.is_error, Some(true));
        let body = result.structured_content.unwrap();
        assert_eq!(body["code"], "UNKNOWN_DIMENSION_VALUE");
        assert!(body["details"]["valid_options"].as_array().unwrap().len() > 1);
    }

    #[test]
    fn test_unknown_dimension() {
        let result = DiscoverToolsTool::execute(&params("colour", "red"), &ctx());
        let body = result.structured_content.unwrap();
        assert_eq!(body["code"], "UNKNOWN_DIMENSION");
    }

    #[test]
    fn test_empty_keyword_result_is_not_an_error() {
        let result = DiscoverToolsTool::execute(&params("keyword", "zzzz"), &ctx());
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.structured_content.unwrap()["count"], 0);
    }
}
