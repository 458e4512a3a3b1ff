//! Built-in calculators.
//!
//! Each calculator is a unit struct implementing
//! [`CalculatorDefinition`](crate::domains::catalog::CalculatorDefinition),
//! grouped by clinical area:
//!
//! - `renal/` - kidney function and electrolytes
//! - `critical_care/` - sepsis and deterioration scores
//! - `general/` - everything else
//!
//! To add a calculator, implement the trait in a new file and list it in
//! [`register_all`].

pub mod common;
pub mod critical_care;
pub mod general;
pub mod renal;

use crate::domains::catalog::{CatalogError, ToolRegistry};

/// Register every built-in calculator.
pub fn register_all(registry: &mut ToolRegistry) -> Result<(), CatalogError> {
    registry.register_definition::<renal::AnionGap>()?;
    registry.register_definition::<renal::CkdEpi2021>()?;
    registry.register_definition::<renal::CockcroftGault>()?;

    registry.register_definition::<critical_care::News2Score>()?;
    registry.register_definition::<critical_care::QsofaScore>()?;
    registry.register_definition::<critical_care::SofaScore>()?;

    registry.register_definition::<general::Bmi>()?;
    registry.register_definition::<general::Curb65>()?;
    registry.register_definition::<general::MeanArterialPressure>()?;

    Ok(())
}
