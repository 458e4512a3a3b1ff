//! Catalog-specific error types.

use thiserror::Error;

/// Errors raised while building or querying the tool registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// No tool is registered under the requested id.
    #[error("Tool not found: '{tool_id}'. Use discover_tools or list_specialties to find valid tool ids")]
    ToolNotFound { tool_id: String },

    /// A second descriptor tried to claim an id that is already registered.
    #[error("Duplicate tool id: '{tool_id}' is already registered")]
    DuplicateToolId { tool_id: String },

    /// A descriptor violates one of the registration invariants.
    #[error("Invalid descriptor '{tool_id}': {reason}")]
    InvalidDescriptor { tool_id: String, reason: String },
}

impl CatalogError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ToolNotFound { .. } => "TOOL_NOT_FOUND",
            Self::DuplicateToolId { .. } => "DUPLICATE_TOOL_ID",
            Self::InvalidDescriptor { .. } => "INVALID_DESCRIPTOR",
        }
    }

    /// Create a new "tool not found" error.
    pub fn not_found(tool_id: impl Into<String>) -> Self {
        Self::ToolNotFound {
            tool_id: tool_id.into(),
        }
    }

    /// Create a new "duplicate tool id" error.
    pub fn duplicate(tool_id: impl Into<String>) -> Self {
        Self::DuplicateToolId {
            tool_id: tool_id.into(),
        }
    }

    /// Create a new "invalid descriptor" error.
    pub fn invalid(tool_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            tool_id: tool_id.into(),
            reason: reason.into(),
        }
    }
}
