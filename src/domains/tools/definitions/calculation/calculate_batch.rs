//! Run several calculations in one call.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use super::super::common::{error_result, parse_arguments, structured_result};
use crate::domains::calculation::{BatchItem, BatchItemResult};
use crate::domains::tools::ToolContext;

/// Parameters for the batch tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CalculateBatchParams {
    /// Calculations to run, in order.
    pub items: Vec<BatchItem>,
}

/// Structured output for a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub count: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<BatchItemResult>,
}

impl BatchResponse {
    fn new(results: Vec<BatchItemResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        Self {
            count: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}

pub struct CalculateBatchTool;

impl CalculateBatchTool {
    pub const NAME: &'static str = "calculate_batch";

    pub const DESCRIPTION: &'static str = "Run several calculators in one call. Results come back in input order. A failing item reports its own structured error without affecting the others.";

    #[instrument(skip_all, fields(items = params.items.len()))]
    pub fn execute(params: &CalculateBatchParams, ctx: &ToolContext) -> CallToolResult {
        match ctx.calculation.execute_batch(&params.items) {
            Ok(results) => {
                let response = BatchResponse::new(results);
                let summary = format!(
                    "{} calculation(s): {} succeeded, {} failed",
                    response.count, response.succeeded, response.failed
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
        let params: CalculateBatchParams = super::super::common::http_arguments(arguments)?;
        Ok(super::super::common::http_response(Self::execute(&params, ctx)))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<CalculateBatchParams>(),
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
                let params: CalculateBatchParams = parse_arguments(args)?;
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
    use serde_json::{Map, json};

    fn ctx() -> ToolContext {
        ToolContext::builtin(&Config::default()).unwrap()
    }

    #[test]
    fn test_failed_item_does_not_fail_batch() {
        let params: CalculateBatchParams = serde_json::from_value(json!({
            "items": [
                {"tool_id": "qsofa_score", "params": {"respiratory_rate": 24, "systolic_bp": 95, "altered_mentation": false}},
                {"tool_id": "not_a_tool"}
            ]
        }))
        .unwrap();

        let result = CalculateBatchTool::execute(&params, &ctx());
        assert_eq!(result.is_error, Some(false));

        let data = result.structured_content.unwrap();
        assert_eq!(data["count"], 2);
        assert_eq!(data["succeeded"], 1);
        assert_eq!(data["results"][0]["status"], "ok");
        assert_eq!(data["results"][1]["status"], "error");
        assert_eq!(data["results"][1]["error"]["code"], "TOOL_NOT_FOUND");
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let params = CalculateBatchParams { items: vec![] };
        let result = CalculateBatchTool::execute(&params, &ctx());
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.structured_content.unwrap()["code"], "EMPTY_BATCH");
    }

    #[test]
    fn test_oversized_batch_is_rejected() {
        let mut config = Config::default();
        config.calculation.max_batch_size = 1;
        let ctx = ToolContext::builtin(&config).unwrap();
        let params = CalculateBatchParams {
            items: vec![BatchItem::new("bmi", Map::new()); 2],
        };
        let body = CalculateBatchTool::execute(&params, &ctx)
            .structured_content
            .unwrap();
        assert_eq!(body["code"], "BATCH_TOO_LARGE");
        assert_eq!(body["details"]["max"], 1);
    }
}
