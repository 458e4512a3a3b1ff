//! Quick SOFA (qSOFA) bedside sepsis screen.

use crate::domains::calculators::common::{point, respiratory_rate, systolic_bp};
use crate::domains::catalog::{
    BoundParams, CalculatorDefinition, CalculatorError, CalculatorOutput, ClinicalContext,
    HighLevelKey, Interpretation, ParameterSpec, Reference, Severity, Specialty,
};

pub struct QsofaScore;

impl CalculatorDefinition for QsofaScore {
    const TOOL_ID: &'static str = "qsofa_score";
    const NAME: &'static str = "qSOFA Score";
    const PURPOSE: &'static str = "Bedside screen outside the ICU that flags patients with suspected infection at risk of poor outcomes from sepsis";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            respiratory_rate(),
            systolic_bp(),
            ParameterSpec::flag("altered_mentation")
                .aliases(&["altered_mental_status", "ams", "gcs_below_15"])
                .describe("Any alteration in mentation (GCS below 15)"),
        ]
    }

    fn high_level_key() -> HighLevelKey {
        HighLevelKey::new()
            .specialties([
                Specialty::EmergencyMedicine,
                Specialty::CriticalCare,
                Specialty::InfectiousDisease,
                Specialty::InternalMedicine,
            ])
            .conditions(["sepsis", "infection"])
            .contexts([ClinicalContext::Screening, ClinicalContext::Triage, ClinicalContext::RiskStratification])
            .icd10(["A41.9", "R65.20"])
            .keywords(["sepsis", "qsofa", "quick sofa", "sepsis screening"])
            .questions(["Is this patient with infection at risk of sepsis?"])
    }

    fn references() -> Vec<Reference> {
        vec![
            Reference::new(
                "Seymour CW, et al. Assessment of Clinical Criteria for Sepsis: For the Third International Consensus Definitions for Sepsis and Septic Shock (Sepsis-3). JAMA. 2016;315(8):762-774",
            )
            .doi("10.1001/jama.2016.0288"),
        ]
    }

    fn calculate(params: &BoundParams) -> Result<CalculatorOutput, CalculatorError> {
        let tachypnea = point(params.number("respiratory_rate")? >= 22.0);
        let hypotension = point(params.number("systolic_bp")? <= 100.0);
        let mentation = point(params.flag("altered_mentation")?);
        let score = tachypnea + hypotension + mentation;

        let interpretation = if score >= 2.0 {
            Interpretation::new(
                Severity::Severe,
                format!("qSOFA {:.0} of 3: high risk of poor outcome", score),
            )
            .stage("positive")
            .recommend("Assess for organ dysfunction with a full SOFA score")
            .recommend("Escalate care and consider ICU referral")
        } else {
            Interpretation::new(
                Severity::Normal,
                format!("qSOFA {:.0} of 3: not high risk by qSOFA", score),
            )
            .stage("negative")
            .recommend("A negative qSOFA does not exclude sepsis; keep monitoring")
        };

        Ok(CalculatorOutput::new(score, "points", interpretation)
            .component("respiratory_rate", tachypnea)
            .component("systolic_bp", hypotension)
            .component("altered_mentation", mentation))
    }
}
