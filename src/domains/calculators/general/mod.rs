//! General medicine calculators.

mod bmi;
mod curb_65;
mod mean_arterial_pressure;

pub use bmi::Bmi;
pub use curb_65::Curb65;
pub use mean_arterial_pressure::MeanArterialPressure;
