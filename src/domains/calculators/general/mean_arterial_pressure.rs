//! Mean arterial pressure from a cuff reading.

use crate::domains::calculators::common::{WHELTON_2017, diastolic_bp, round_to, systolic_bp};
use crate::domains::catalog::{
    BoundParams, CalculatorDefinition, CalculatorError, CalculatorOutput, ClinicalContext,
    Comparison, CrossFieldRule, HighLevelKey, Interpretation, ParameterSpec, Reference, Severity,
    Specialty,
};

pub struct MeanArterialPressure;

impl CalculatorDefinition for MeanArterialPressure {
    const TOOL_ID: &'static str = "mean_arterial_pressure";
    const NAME: &'static str = "Mean Arterial Pressure";
    const PURPOSE: &'static str = "Estimates mean arterial pressure from systolic and diastolic pressure, the usual perfusion target in shock and sepsis resuscitation";

    fn parameters() -> Vec<ParameterSpec> {
        vec![systolic_bp(), diastolic_bp()]
    }

    fn cross_field_rules() -> Vec<CrossFieldRule> {
        vec![CrossFieldRule::new(
            "systolic_bp",
            Comparison::GreaterThan,
            "diastolic_bp",
            "Systolic pressure must exceed diastolic pressure",
        )]
    }

    fn high_level_key() -> HighLevelKey {
        HighLevelKey::new()
            .specialties([
                Specialty::Cardiology,
                Specialty::CriticalCare,
                Specialty::Anesthesiology,
                Specialty::EmergencyMedicine,
            ])
            .conditions(["hypotension", "shock", "hypertension"])
            .contexts([ClinicalContext::Monitoring])
            .icd10(["I95.9", "R57.9", "I10"])
            .keywords(["map", "mean arterial pressure", "blood pressure", "perfusion pressure"])
            .questions(["Is this patient's perfusion pressure adequate?"])
    }

    fn references() -> Vec<Reference> {
        vec![
            Reference::new(
                "Sesso HD, et al. Systolic and diastolic blood pressure, pulse pressure, and mean arterial pressure as predictors of cardiovascular disease risk in men. Hypertension. 2000;36(5):801-807",
            )
            .doi("10.1161/01.HYP.36.5.801"),
            Reference::new(WHELTON_2017),
        ]
    }

    fn calculate(params: &BoundParams) -> Result<CalculatorOutput, CalculatorError> {
        let systolic = params.number("systolic_bp")?;
        let diastolic = params.number("diastolic_bp")?;
        let map = round_to((systolic + 2.0 * diastolic) / 3.0, 1);

        let interpretation = match map {
            m if m < 65.0 => Interpretation::new(Severity::Severe, format!("MAP {:.1} mmHg: below perfusion target", m))
                .stage("low")
                .recommend("MAP below 65 mmHg risks organ hypoperfusion; assess for shock")
                .recommend("In septic shock, target MAP of 65 mmHg with fluids and vasopressors"),
            m if m <= 100.0 => Interpretation::new(Severity::Normal, format!("MAP {:.1} mmHg: adequate", m))
                .stage("normal"),
            m => Interpretation::new(Severity::Moderate, format!("MAP {:.1} mmHg: elevated", m))
                .stage("high")
                .recommend("Evaluate for hypertension"),
        };

        Ok(CalculatorOutput::new(map, "mmHg", interpretation)
            .component("pulse_pressure", systolic - diastolic))
    }
}
