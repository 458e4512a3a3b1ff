//! Discovery domain module.
//!
//! Lets a caller who does not know tool ids find the right calculator by
//! specialty, clinical context, condition, ICD-10 code or keyword, and
//! inspect a tool's schema before calling it.
//!
//! ## Architecture
//!
//! - `index.rs` - Inverted index built once from the registry
//! - `engine.rs` - Query operations over the index
//! - `response.rs` - Response shapes, each with a `next_step` hint
//! - `error.rs` - Discovery-specific error types

mod engine;
mod error;
mod index;
mod response;

pub use engine::{DEFAULT_RELATED_LIMIT, DEFAULT_SEARCH_LIMIT, DiscoverBy, DiscoveryEngine};
pub use error::DiscoveryError;
pub use index::{DiscoveryIndex, tokenize};
pub use response::{
    DimensionCount, DimensionListing, DiscoveryResponse, NextStep, RelatedTool,
    RelatedToolsResponse, ToolSchema, ToolSummary,
};
