//! MCP Server implementation and lifecycle management.
//!
//! The server owns the catalog services and the tool router built from them.
//! Tools are defined in `domains/tools/definitions/`, one file per tool, and
//! the router is assembled in `domains/tools/router.rs`.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use crate::domains::tools::{ToolContext, build_tool_router};

#[cfg(feature = "http")]
use crate::domains::tools::ToolDispatcher;

const INSTRUCTIONS: &str = "Clinical calculator catalog. Start with discover_tools (by specialty, context, condition, icd10 or keyword) or list_specialties, inspect a tool with get_tool_schema, then run it with calculate or calculate_batch. Parameter names are matched tolerantly; every result carries literature references and any input warnings.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registry and services shared by every tool.
    context: Arc<ToolContext>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a server over the built-in calculator catalog.
    ///
    /// Fails if the catalog cannot be built.
    pub fn new(config: Config) -> super::error::Result<Self> {
        let context = Arc::new(ToolContext::builtin(&config)?);
        Ok(Self::with_context(config, context))
    }

    /// Create a server over an already built context.
    pub fn with_context(config: Config, context: Arc<ToolContext>) -> Self {
        info!(
            tools = context.registry().len(),
            "Calculator catalog loaded"
        );
        Self {
            tool_router: build_tool_router::<Self>(context.clone()),
            config: Arc::new(config),
            context,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn context(&self) -> &Arc<ToolContext> {
        &self.context
    }

    /// Server instructions sent to clients on initialize.
    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, String> {
        ToolDispatcher::new(self.context.clone()).call_tool(name, arguments)
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = self.config.server.name.clone();
        server_info.version = self.config.server.version.clone();

        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_server_handler<T: ServerHandler + Clone + Send + Sync + 'static>() {}

    #[test]
    fn test_router_backs_server_handler() {
        assert_server_handler::<McpServer>();
        let server = McpServer::new(Config::default()).unwrap();
        assert!(server.tool_router.has_route("calculate"));
        assert!(server.tool_router.has_route("discover_tools"));
    }

    #[test]
    fn test_server_lists_catalog_tools() {
        let server = McpServer::new(Config::default()).unwrap();
        let tools = server.list_tools();
        assert_eq!(tools.len(), 7);
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[test]
    fn test_info_advertises_tools_only() {
        let server = McpServer::new(Config::default()).unwrap();
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert_eq!(info.server_info.name, "medcalc-mcp-server");
    }
}
