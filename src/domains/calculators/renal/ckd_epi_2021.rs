//! CKD-EPI 2021 creatinine equation (race-free).

use crate::domains::calculators::common::{age, round_to, serum_creatinine, sex};
use crate::domains::catalog::{
    BoundParams, CalculatorDefinition, CalculatorError, CalculatorOutput, ClinicalContext,
    HighLevelKey, Interpretation, ParameterSpec, Reference, Severity, Specialty,
};

/// Estimated GFR from serum creatinine, age and sex.
pub struct CkdEpi2021;

impl CkdEpi2021 {
    /// KDIGO GFR category for an eGFR in mL/min/1.73m².
    pub fn gfr_category(egfr: f64) -> (&'static str, Severity, &'static str) {
        match egfr {
            e if e >= 90.0 => ("G1", Severity::Normal, "Normal or high kidney function"),
            e if e >= 60.0 => ("G2", Severity::Mild, "Mildly decreased kidney function"),
            e if e >= 45.0 => ("G3a", Severity::Moderate, "Mildly to moderately decreased kidney function"),
            e if e >= 30.0 => ("G3b", Severity::Moderate, "Moderately to severely decreased kidney function"),
            e if e >= 15.0 => ("G4", Severity::Severe, "Severely decreased kidney function"),
            _ => ("G5", Severity::Critical, "Kidney failure"),
        }
    }
}

impl CalculatorDefinition for CkdEpi2021 {
    const TOOL_ID: &'static str = "ckd_epi_2021";
    const NAME: &'static str = "CKD-EPI 2021 eGFR";
    const PURPOSE: &'static str = "Estimates glomerular filtration rate from serum creatinine, age and sex using the race-free 2021 CKD-EPI equation, and stages chronic kidney disease";

    fn parameters() -> Vec<ParameterSpec> {
        vec![serum_creatinine(), age(), sex()]
    }

    fn high_level_key() -> HighLevelKey {
        HighLevelKey::new()
            .specialties([Specialty::Nephrology, Specialty::InternalMedicine])
            .conditions(["chronic kidney disease", "ckd", "acute kidney injury"])
            .contexts([ClinicalContext::Diagnosis, ClinicalContext::Screening, ClinicalContext::DrugDosing])
            .icd10(["N18.1", "N18.2", "N18.3", "N18.4", "N18.5", "N18.6", "N18.9"])
            .keywords(["egfr", "gfr", "kidney function", "renal function", "creatinine", "ckd staging"])
            .questions([
                "What is this patient's kidney function?",
                "Which CKD stage is this patient in?",
            ])
    }

    fn references() -> Vec<Reference> {
        vec![
            Reference::new(
                "Inker LA, et al. New Creatinine- and Cystatin C-Based Equations to Estimate GFR without Race. N Engl J Med. 2021;385(19):1737-1749",
            )
            .doi("10.1056/NEJMoa2102953"),
            Reference::new(
                "KDIGO 2012 Clinical Practice Guideline for the Evaluation and Management of Chronic Kidney Disease. Kidney Int Suppl. 2013;3:1-150",
            ),
        ]
    }

    fn calculate(params: &BoundParams) -> Result<CalculatorOutput, CalculatorError> {
        let scr = params.number("serum_creatinine")?;
        let age = params.number("age")?;
        let female = params.choice("sex")? == "female";

        let (kappa, alpha, sex_factor) = if female {
            (0.7, -0.241, 1.012)
        } else {
            (0.9, -0.302, 1.0)
        };

        let ratio = scr / kappa;
        let egfr = 142.0
            * ratio.min(1.0).powf(alpha)
            * ratio.max(1.0).powf(-1.200)
            * 0.9938_f64.powf(age)
            * sex_factor;
        let egfr = round_to(egfr, 1);

        let (stage, severity, description) = Self::gfr_category(egfr);
        let mut interpretation = Interpretation::new(
            severity,
            format!("eGFR {:.1} mL/min/1.73m² (KDIGO {}): {}", egfr, stage, description),
        )
        .stage(stage);

        if egfr < 60.0 {
            interpretation = interpretation
                .recommend("Confirm persistence over 3 months and check albuminuria to stage CKD")
                .recommend("Review renally cleared medications for dose adjustment");
        }
        if egfr < 30.0 {
            interpretation = interpretation.recommend("Refer to nephrology");
        }

        Ok(CalculatorOutput::new(egfr, "mL/min/1.73m²", interpretation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::catalog::ParamValue;

    fn params(scr: f64, age: f64, sex: &str) -> BoundParams {
        [
            ("serum_creatinine".to_string(), ParamValue::Number(scr)),
            ("age".to_string(), ParamValue::Number(age)),
            ("sex".to_string(), ParamValue::Choice(sex.to_string())),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_male_reference_value() {
        let out = CkdEpi2021::calculate(&params(1.2, 65.0, "male")).unwrap();
        assert_eq!(out.value, 67.1);
        assert_eq!(out.interpretation.stage.as_deref(), Some("G2"));
    }

    #[test]
    fn test_female_reference_value() {
        let out = CkdEpi2021::calculate(&params(1.2, 65.0, "female")).unwrap();
        assert_eq!(out.value, 50.2);
        assert_eq!(out.interpretation.stage.as_deref(), Some("G3a"));
        assert!(!out.interpretation.recommendations.is_empty());
    }

    #[test]
    fn test_low_creatinine_uses_alpha_branch() {
        let out = CkdEpi2021::calculate(&params(0.6, 40.0, "female")).unwrap();
        assert!(out.value > 100.0);
        assert_eq!(out.interpretation.stage.as_deref(), Some("G1"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(CkdEpi2021::gfr_category(90.0).0, "G1");
        assert_eq!(CkdEpi2021::gfr_category(59.9).0, "G3a");
        assert_eq!(CkdEpi2021::gfr_category(29.9).0, "G4");
        assert_eq!(CkdEpi2021::gfr_category(10.0).0, "G5");
    }
}
