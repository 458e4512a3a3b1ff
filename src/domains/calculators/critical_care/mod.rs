//! Sepsis, organ failure and deterioration scores.

mod news2_score;
mod qsofa_score;
mod sofa_score;

pub use news2_score::News2Score;
pub use qsofa_score::QsofaScore;
pub use sofa_score::SofaScore;
