//! Parameter schemas and helpers shared across calculators.
//!
//! Boundaries live here so that every calculator asking for, say, systolic
//! pressure applies the same physiological limits.

use crate::domains::catalog::{BoundarySpec, ParameterSpec};

pub const KRATZ_2004: &str =
    "Kratz A, et al. Laboratory reference values. N Engl J Med. 2004;351(15):1548-63";
pub const WHELTON_2017: &str =
    "Whelton PK, et al. 2017 ACC/AHA Guideline for High Blood Pressure in Adults. Hypertension. 2018;71:e13-e115";
pub const RCP_NEWS2_2017: &str =
    "Royal College of Physicians. National Early Warning Score (NEWS) 2. London: RCP, 2017";

pub fn age() -> ParameterSpec {
    ParameterSpec::numeric("age", "years")
        .aliases(&["patient_age"])
        .bounded(BoundarySpec::new(
            (0.0, 125.0),
            (18.0, 100.0),
            "Adult validation cohorts of the included equations enrolled patients aged 18 and over",
        ))
        .describe("Patient age in years")
}

pub fn sex() -> ParameterSpec {
    ParameterSpec::choice("sex", &["male", "female"])
        .aliases(&["gender"])
        .describe("Biological sex used by the equation")
}

pub fn serum_creatinine() -> ParameterSpec {
    ParameterSpec::numeric("serum_creatinine", "mg/dL")
        .aliases(&["cr", "creatinine", "scr", "serum_cr"])
        .bounded(BoundarySpec::new((0.1, 30.0), (0.5, 1.3), KRATZ_2004))
        .describe("Serum creatinine (IDMS-traceable) in mg/dL")
}

pub fn systolic_bp() -> ParameterSpec {
    ParameterSpec::numeric("systolic_bp", "mmHg")
        .aliases(&["sbp", "systolic", "systolic_blood_pressure"])
        .bounded(BoundarySpec::new((20.0, 300.0), (90.0, 180.0), WHELTON_2017))
        .describe("Systolic blood pressure in mmHg")
}

pub fn diastolic_bp() -> ParameterSpec {
    ParameterSpec::numeric("diastolic_bp", "mmHg")
        .aliases(&["dbp", "diastolic", "diastolic_blood_pressure"])
        .bounded(BoundarySpec::new((10.0, 200.0), (60.0, 110.0), WHELTON_2017))
        .describe("Diastolic blood pressure in mmHg")
}

pub fn respiratory_rate() -> ParameterSpec {
    ParameterSpec::numeric("respiratory_rate", "breaths/min")
        .aliases(&["rr", "resp_rate", "breathing_rate"])
        .bounded(BoundarySpec::new((0.0, 80.0), (12.0, 20.0), RCP_NEWS2_2017))
        .describe("Respiratory rate in breaths per minute")
}

pub fn heart_rate() -> ParameterSpec {
    ParameterSpec::numeric("heart_rate", "beats/min")
        .aliases(&["hr", "pulse", "pulse_rate"])
        .bounded(BoundarySpec::new((0.0, 300.0), (51.0, 90.0), RCP_NEWS2_2017))
        .describe("Heart rate in beats per minute")
}

pub fn weight() -> ParameterSpec {
    ParameterSpec::numeric("weight", "kg")
        .aliases(&["body_weight", "wt"])
        .bounded(BoundarySpec::new(
            (1.0, 650.0),
            (40.0, 150.0),
            "NCD Risk Factor Collaboration. Lancet. 2016;387:1377-96",
        ))
        .describe("Body weight in kilograms")
}

/// Round to `places` decimal places for reporting.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// 1 if `condition` holds, else 0.
pub fn point(condition: bool) -> f64 {
    if condition { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(67.1096, 1), 67.1);
        assert_eq!(round_to(50.236, 1), 50.2);
        assert_eq!(round_to(12.5, 0), 13.0);
    }

    #[test]
    fn test_shared_boundaries_are_consistent() {
        for spec in [
            age(),
            serum_creatinine(),
            systolic_bp(),
            diastolic_bp(),
            respiratory_rate(),
            heart_rate(),
            weight(),
        ] {
            let boundary = spec.boundary.as_ref().unwrap();
            assert!(boundary.is_consistent(), "{}", spec.canonical_name);
        }
    }
}
