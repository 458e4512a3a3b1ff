//! Tool Dispatcher - tool metadata and HTTP dispatch by tool name.

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use super::context::ToolContext;
use super::definitions::{
    CalculateBatchTool, CalculateTool, DiscoverToolsTool, GetRelatedToolsTool, GetToolSchemaTool,
    ListContextsTool, ListSpecialtiesTool,
};

/// Central point for listing tools and dispatching HTTP tool calls.
pub struct ToolDispatcher {
    ctx: Arc<ToolContext>,
}

impl ToolDispatcher {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }

    /// Get all tool names.
    pub fn tool_names() -> Vec<&'static str> {
        vec![
            DiscoverToolsTool::NAME,
            ListSpecialtiesTool::NAME,
            ListContextsTool::NAME,
            GetToolSchemaTool::NAME,
            GetRelatedToolsTool::NAME,
            CalculateTool::NAME,
            CalculateBatchTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            DiscoverToolsTool::to_tool(),
            ListSpecialtiesTool::to_tool(),
            ListContextsTool::to_tool(),
            GetToolSchemaTool::to_tool(),
            GetRelatedToolsTool::to_tool(),
            CalculateTool::to_tool(),
            CalculateBatchTool::to_tool(),
        ]
    }

    pub fn context(&self) -> &Arc<ToolContext> {
        &self.ctx
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    #[cfg(feature = "http")]
    pub fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let ctx = self.ctx.as_ref();
        match name {
            DiscoverToolsTool::NAME => DiscoverToolsTool::http_handler(arguments, ctx),
            ListSpecialtiesTool::NAME => ListSpecialtiesTool::http_handler(arguments, ctx),
            ListContextsTool::NAME => ListContextsTool::http_handler(arguments, ctx),
            GetToolSchemaTool::NAME => GetToolSchemaTool::http_handler(arguments, ctx),
            GetRelatedToolsTool::NAME => GetRelatedToolsTool::http_handler(arguments, ctx),
            CalculateTool::NAME => CalculateTool::http_handler(arguments, ctx),
            CalculateBatchTool::NAME => CalculateBatchTool::http_handler(arguments, ctx),
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(format!("Unknown tool: {}", name))
            }
        }
    }
}
