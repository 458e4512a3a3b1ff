//! List the specialties present in the catalog.

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
pub struct ListSpecialtiesParams {}

pub struct ListSpecialtiesTool;

impl ListSpecialtiesTool {
    pub const NAME: &'static str = "list_specialties";

    pub const DESCRIPTION: &'static str = "List every medical specialty covered by the catalog with the number of calculators in each. Start here when you do not know what to search for.";

    pub fn execute(_params: &ListSpecialtiesParams, ctx: &ToolContext) -> CallToolResult {
        let listing = ctx.discovery.list_specialties();
        debug!("Listing {} specialties", listing.count);
        let names: Vec<&str> = listing.values.iter().map(|v| v.value.as_str()).collect();
        let summary = format!("{} specialt(ies): {}", listing.count, names.join(", "));
        structured_result(summary, &listing)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: ListSpecialtiesParams = super::super::common::http_arguments(arguments)?;
        Ok(super::super::common::http_response(Self::execute(&params, ctx)))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ListSpecialtiesParams>(),
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
                let params: ListSpecialtiesParams = parse_arguments(args)?;
                Ok(Self::execute(&params, &ctx))
            }
            .boxed()
        })
    }
}
