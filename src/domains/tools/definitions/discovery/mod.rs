//! Discovery tools: find a calculator and learn how to call it.

mod discover_tools;
mod get_related_tools;
mod get_tool_schema;
mod list_contexts;
mod list_specialties;

pub use discover_tools::{DiscoverToolsParams, DiscoverToolsTool};
pub use get_related_tools::{GetRelatedToolsParams, GetRelatedToolsTool};
pub use get_tool_schema::{GetToolSchemaParams, GetToolSchemaTool};
pub use list_contexts::{ListContextsParams, ListContextsTool};
pub use list_specialties::{ListSpecialtiesParams, ListSpecialtiesTool};
