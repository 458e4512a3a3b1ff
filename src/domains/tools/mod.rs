//! Tools domain module.
//!
//! The MCP surface of the server. Each tool is a thin adapter that parses
//! arguments, calls the discovery engine or the calculate use case, and turns
//! the outcome into a `CallToolResult` with a text summary and structured
//! content.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `context.rs` - Shared registry and services handed to every tool
//! - `router.rs` - Dynamic ToolRouter builder for the STDIO transport
//! - `dispatcher.rs` - Tool metadata and HTTP dispatch
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/`
//! 2. Define params, execute(), http_handler(), to_tool() and create_route()
//! 3. Export it from `definitions/mod.rs`
//! 4. Add the route in `router.rs` and the name in `dispatcher.rs`

mod context;
pub mod definitions;
mod dispatcher;
pub mod router;

pub use context::ToolContext;
pub use dispatcher::ToolDispatcher;
pub use router::build_tool_router;
