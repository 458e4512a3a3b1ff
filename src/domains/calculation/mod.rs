//! Calculation domain module.
//!
//! Orchestrates a calculation: resolve the tool, bind the caller's keys,
//! validate the values, run the formula and wrap the result with its
//! warnings, references and parameter resolutions.
//!
//! ## Architecture
//!
//! - `use_case.rs` - `CalculateUseCase`, single and batch execution
//! - `result.rs` - Result envelopes and batch items
//! - `error.rs` - Calculation-specific error types

mod error;
mod result;
mod use_case;

pub use error::CalculationError;
pub use result::{BatchItem, BatchItemResult, CalculationResult, ResolvedParameter};
pub use use_case::{CalculateUseCase, DEFAULT_MAX_BATCH_SIZE};
