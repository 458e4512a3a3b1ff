//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type over every domain error plus
//! transport and serialization failures, and the structured body that is
//! sent to MCP clients when a tool call fails.

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domains::calculation::CalculationError;
use crate::domains::catalog::CatalogError;
use crate::domains::discovery::DiscoveryError;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error building or querying the tool catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Error answering a discovery query.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Error running a calculation.
    #[error(transparent)]
    Calculation(#[from] CalculationError),

    /// Error from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Catalog(err) => err.code(),
            Self::Discovery(err) => err.code(),
            Self::Calculation(err) => err.code(),
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Json(_) => "INVALID_JSON",
        }
    }

    /// The structured body returned to clients.
    pub fn body(&self) -> ErrorBody {
        let details = match self {
            Self::Calculation(err) => err.details(),
            Self::Catalog(err) => CalculationError::Catalog(err.clone()).details(),
            Self::Discovery(DiscoveryError::Catalog(err)) => {
                CalculationError::Catalog(err.clone()).details()
            }
            Self::Discovery(DiscoveryError::UnknownDimensionValue {
                dimension,
                value,
                valid_options,
            }) => json!({
                "dimension": dimension,
                "value": value,
                "valid_options": valid_options,
            }),
            Self::Discovery(DiscoveryError::UnknownDimension(by)) => json!({
                "by": by,
                "valid_options": ["specialty", "context", "condition", "icd10", "keyword"],
            }),
            _ => Value::Null,
        };

        ErrorBody {
            code: self.code(),
            message: self.to_string(),
            details,
        }
    }
}

/// `{code, message, details}` error payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_domain_errors() {
        let err: Error = CatalogError::not_found("x").into();
        assert_eq!(err.code(), "TOOL_NOT_FOUND");
        assert_eq!(err.body().details["tool_id"], "x");

        let err: Error = DiscoveryError::unknown_value("specialty", "astro", vec!["a".into()]).into();
        let body = err.body();
        assert_eq!(body.code, "UNKNOWN_DIMENSION_VALUE");
        assert_eq!(body.details["valid_options"][0], "a");
    }

    #[test]
    fn test_body_omits_null_details() {
        let err = serde_json::from_str::<Value>("{").unwrap_err();
        let body = Error::from(err).body();
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("details").is_none());
        assert_eq!(json["code"], "INVALID_JSON");
    }
}
