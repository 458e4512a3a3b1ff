//! Calculation tools.

mod calculate;
mod calculate_batch;

pub use calculate::{CalculateParams, CalculateTool};
pub use calculate_batch::{BatchResponse, CalculateBatchParams, CalculateBatchTool};
