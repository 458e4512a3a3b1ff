//! Calculation-specific error types.

use serde_json::{Value, json};
use thiserror::Error;

use crate::domains::catalog::CatalogError;
use crate::domains::parameters::ParameterError;

/// Errors that abort a single calculation or a whole batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// The calculator failed or produced a non-finite value.
    #[error("Calculation failed for '{tool_id}': {message}")]
    Internal { tool_id: String, message: String },

    #[error("Batch is empty: supply at least one item")]
    EmptyBatch,

    #[error("Batch of {size} items exceeds the maximum of {max}")]
    BatchTooLarge { size: usize, max: usize },
}

impl CalculationError {
    /// Create a new "internal" error.
    pub fn internal(tool_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            tool_id: tool_id.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Catalog(err) => err.code(),
            Self::Parameter(err) => err.code(),
            Self::Internal { .. } => "CALCULATION_INTERNAL_ERROR",
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
        }
    }

    /// Structured details for the error body.
    pub fn details(&self) -> Value {
        match self {
            Self::Catalog(CatalogError::ToolNotFound { tool_id })
            | Self::Catalog(CatalogError::DuplicateToolId { tool_id }) => {
                json!({ "tool_id": tool_id })
            }
            Self::Catalog(CatalogError::InvalidDescriptor { tool_id, reason }) => {
                json!({ "tool_id": tool_id, "reason": reason })
            }
            Self::Parameter(err) => serde_json::to_value(err).unwrap_or(Value::Null),
            Self::Internal { tool_id, message } => json!({ "tool_id": tool_id, "message": message }),
            Self::EmptyBatch => Value::Null,
            Self::BatchTooLarge { size, max } => json!({ "size": size, "max": max }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_pass_through() {
        let err: CalculationError = CatalogError::not_found("x").into();
        assert_eq!(err.code(), "TOOL_NOT_FOUND");
        assert_eq!(err.details(), json!({ "tool_id": "x" }));

        let err: CalculationError = ParameterError::type_mismatch("age", "a number", "string").into();
        assert_eq!(err.code(), "TYPE_MISMATCH");
        assert_eq!(err.details()["parameter"], "age");
    }

    #[test]
    fn test_batch_errors() {
        assert_eq!(CalculationError::EmptyBatch.code(), "EMPTY_BATCH");
        let err = CalculationError::BatchTooLarge { size: 60, max: 50 };
        assert_eq!(err.code(), "BATCH_TOO_LARGE");
        assert!(err.to_string().contains("60"));
    }
}
