//! Tool definitions module.
//!
//! One file per MCP tool, grouped by the domain service it fronts.

pub mod calculation;
pub mod common;
pub mod discovery;

pub use calculation::{
    BatchResponse, CalculateBatchParams, CalculateBatchTool, CalculateParams, CalculateTool,
};
pub use discovery::{
    DiscoverToolsParams, DiscoverToolsTool, GetRelatedToolsParams, GetRelatedToolsTool,
    GetToolSchemaParams, GetToolSchemaTool, ListContextsParams, ListContextsTool,
    ListSpecialtiesParams, ListSpecialtiesTool,
};
