//! Parameters domain module.
//!
//! Turns an arbitrary caller-supplied `{name: value}` map into validated,
//! canonically named values for one tool.
//!
//! ## Architecture
//!
//! - `similarity.rs` - Normalized edit-distance metric and fuzzy thresholds
//! - `matcher.rs` - Binds caller keys to canonical parameter names
//! - `validator.rs` - Type, hard/soft range and cross-field checks
//! - `error.rs` - Fatal parameter errors and non-fatal warnings

mod error;
mod matcher;
pub mod similarity;
mod validator;

pub use error::{AmbiguousKey, MissingField, ParameterError, ParameterWarning};
pub use matcher::{Binding, MatchMethod, MatchOutcome, ParameterMatcher, unit_tokens};
pub use similarity::FuzzyThresholds;
pub use validator::{BoundaryValidator, FieldValidation};
