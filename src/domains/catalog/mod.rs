//! Catalog domain module.
//!
//! This module owns the immutable description of every calculator the server
//! knows about: descriptors, parameter schemas, discovery keys and the
//! registry that holds them.
//!
//! ## Architecture
//!
//! - `definition.rs` - The `CalculatorDefinition` trait each calculator implements
//! - `descriptor.rs` - `ToolDescriptor`, built once per calculator at registration
//! - `parameter.rs` - Parameter schemas, boundaries and cross-field rules
//! - `dimension.rs` - Discovery dimensions (specialties, contexts, keywords, ...)
//! - `values.rs` - Validated parameter values handed to a calculator
//! - `registry.rs` - The `ToolRegistry` built during startup
//! - `error.rs` - Catalog-specific error types

mod definition;
mod descriptor;
mod dimension;
mod error;
mod parameter;
mod registry;
mod values;

pub use definition::{
    CalculateFn, CalculatorDefinition, CalculatorError, CalculatorOutput, Interpretation,
    Severity,
};
pub use descriptor::{Reference, ToolDescriptor};
pub use dimension::{ClinicalContext, DimensionValue, HighLevelKey, Specialty};
pub use error::CatalogError;
pub use parameter::{BoundarySpec, Comparison, CrossFieldRule, ParameterSpec, ValueKind};
pub use registry::ToolRegistry;
pub use values::{BoundParams, ParamValue};
