//! List the contexts present in the catalog.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::super::common::{parse_arguments, structured_result};
use crate::domains::tools::ToolContext;

/// The tool takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListContextsParams {}

pub struct ListContextsTool;

impl ListContextsTool {
    pub const NAME: &'static str = "list_contexts";

    pub const DESCRIPTION: &'static str = "List every clinical context such as diagnosis, prognosis or drug dosing covered by the catalog with the number of calculators in each.";

    pub fn execute(_params: &ListContextsParams, ctx: &ToolContext) -> CallToolResult {
        let listing = ctx.discovery.list_contexts();
        debug!("Listing {} contexts", listing.count);
        let names: Vec<&str> = listing.values.iter().map(|v| v.value.as_str()).collect();
        let summary = format!("{} clinical context(s): {}", listing.count, names.join(", "));
        structured_result(summary, &listing)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: ListContextsParams = super::super::common::http_arguments(arguments)?;
        Ok(super::super::common::http_response(Self::execute(&params, ctx)))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ListContextsParams>(),
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
                let params: ListContextsParams = parse_arguments(args)?;
                Ok(Self::execute(&params, &ctx))
            }
            .boxed()
        })
    }
}
