//! Discovery-specific error types.

use thiserror::Error;

use crate::domains::catalog::CatalogError;

/// Errors that can occur while answering discovery queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscoveryError {
    /// A lookup against the registry failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A closed dimension was queried with a value it does not contain.
    #[error("Unknown {dimension} '{value}'. Valid options: {}", valid_options.join(", "))]
    UnknownDimensionValue {
        dimension: &'static str,
        value: String,
        valid_options: Vec<String>,
    },

    /// The `by` argument of a discovery request names no dimension.
    #[error("Unknown discovery dimension '{0}'. Valid options: specialty, context, condition, icd10, keyword")]
    UnknownDimension(String),
}

impl DiscoveryError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Catalog(err) => err.code(),
            Self::UnknownDimensionValue { .. } => "UNKNOWN_DIMENSION_VALUE",
            Self::UnknownDimension(_) => "UNKNOWN_DIMENSION",
        }
    }

    /// Create a new "unknown dimension value" error.
    pub fn unknown_value(
        dimension: &'static str,
        value: impl Into<String>,
        valid_options: Vec<String>,
    ) -> Self {
        Self::UnknownDimensionValue {
            dimension,
            value: value.into(),
            valid_options,
        }
    }
}
