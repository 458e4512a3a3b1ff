//! Tool Router - builds the rmcp ToolRouter for the STDIO transport.
//!
//! Each tool definition knows how to create its own route; this module only
//! chains them.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::context::ToolContext;
use super::definitions::{
    CalculateBatchTool, CalculateTool, DiscoverToolsTool, GetRelatedToolsTool, GetToolSchemaTool,
    ListContextsTool, ListSpecialtiesTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(ctx: Arc<ToolContext>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(DiscoverToolsTool::create_route(ctx.clone()))
        .with_route(ListSpecialtiesTool::create_route(ctx.clone()))
        .with_route(ListContextsTool::create_route(ctx.clone()))
        .with_route(GetToolSchemaTool::create_route(ctx.clone()))
        .with_route(GetRelatedToolsTool::create_route(ctx.clone()))
        .with_route(CalculateTool::create_route(ctx.clone()))
        .with_route(CalculateBatchTool::create_route(ctx))
}

#[cfg(test)]
mod tests {
    use super::super::dispatcher::ToolDispatcher;
    use super::*;
    use crate::core::config::Config;

    struct TestServer {}

    fn test_context() -> Arc<ToolContext> {
        Arc::new(ToolContext::builtin(&Config::default()).unwrap())
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_context());
        let tools = router.list_all();
        assert_eq!(tools.len(), 7);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"discover_tools"));
        assert!(names.contains(&"list_specialties"));
        assert!(names.contains(&"list_contexts"));
        assert!(names.contains(&"get_tool_schema"));
        assert!(names.contains(&"get_related_tools"));
        assert!(names.contains(&"calculate"));
        assert!(names.contains(&"calculate_batch"));
    }

    #[test]
    fn test_dispatcher_matches_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_context());
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        let dispatcher_names = ToolDispatcher::tool_names();
        assert_eq!(dispatcher_names.len(), router_names.len());
        for name in dispatcher_names {
            assert!(router_names.contains(&name));
        }
    }
}
