//! Kidney function and electrolyte calculators.

mod anion_gap;
mod ckd_epi_2021;
mod cockcroft_gault;

pub use anion_gap::AnionGap;
pub use ckd_epi_2021::CkdEpi2021;
pub use cockcroft_gault::CockcroftGault;
