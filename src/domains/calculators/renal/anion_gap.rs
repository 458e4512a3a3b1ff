//! Serum anion gap with optional albumin correction.

use crate::domains::calculators::common::{KRATZ_2004, round_to};
use crate::domains::catalog::{
    BoundParams, BoundarySpec, CalculatorDefinition, CalculatorError, CalculatorOutput,
    ClinicalContext, HighLevelKey, Interpretation, ParameterSpec, Reference, Severity, Specialty,
};

/// Albumin the correction is anchored to, in g/dL.
const NORMAL_ALBUMIN: f64 = 4.0;
/// Anion gap change per g/dL of albumin.
const ALBUMIN_FACTOR: f64 = 2.5;

pub struct AnionGap;

impl CalculatorDefinition for AnionGap {
    const TOOL_ID: &'static str = "anion_gap";
    const NAME: &'static str = "Anion Gap";
    const PURPOSE: &'static str = "Computes the serum anion gap, corrected for albumin when supplied, to classify metabolic acidosis";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::numeric("sodium", "mEq/L")
                .aliases(&["na", "serum_sodium"])
                .bounded(BoundarySpec::new((100.0, 200.0), (135.0, 145.0), KRATZ_2004))
                .describe("Serum sodium in mEq/L"),
            ParameterSpec::numeric("chloride", "mEq/L")
                .aliases(&["cl", "serum_chloride"])
                .bounded(BoundarySpec::new((60.0, 160.0), (98.0, 106.0), KRATZ_2004))
                .describe("Serum chloride in mEq/L"),
            ParameterSpec::numeric("bicarbonate", "mEq/L")
                .aliases(&["hco3", "bicarb", "total_co2", "co2"])
                .bounded(BoundarySpec::new((1.0, 60.0), (22.0, 29.0), KRATZ_2004))
                .describe("Serum bicarbonate (total CO2) in mEq/L"),
            ParameterSpec::numeric("albumin", "g/dL")
                .aliases(&["alb", "serum_albumin"])
                .optional()
                .bounded(BoundarySpec::new((0.5, 7.0), (3.5, 5.0), KRATZ_2004))
                .describe("Serum albumin in g/dL, enables the corrected anion gap"),
        ]
    }

    fn high_level_key() -> HighLevelKey {
        HighLevelKey::new()
            .specialties([
                Specialty::Nephrology,
                Specialty::CriticalCare,
                Specialty::EmergencyMedicine,
                Specialty::InternalMedicine,
            ])
            .conditions(["metabolic acidosis", "diabetic ketoacidosis", "lactic acidosis", "toxic ingestion"])
            .contexts([ClinicalContext::Diagnosis])
            .icd10(["E87.2", "E11.10", "E87.20"])
            .keywords(["anion gap", "acid base", "acidosis", "electrolytes", "bicarbonate"])
            .questions(["Is this a high anion gap metabolic acidosis?"])
    }

    fn references() -> Vec<Reference> {
        vec![
            Reference::new(
                "Kraut JA, Madias NE. Serum anion gap: its uses and limitations in clinical medicine. Clin J Am Soc Nephrol. 2007;2(1):162-174",
            )
            .doi("10.2215/CJN.03020906"),
            Reference::new(
                "Figge J, et al. Anion gap and hypoalbuminemia. Crit Care Med. 1998;26(11):1807-1810",
            ),
        ]
    }

    fn calculate(params: &BoundParams) -> Result<CalculatorOutput, CalculatorError> {
        let sodium = params.number("sodium")?;
        let chloride = params.number("chloride")?;
        let bicarbonate = params.number("bicarbonate")?;
        let albumin = params.optional_number("albumin")?;

        let gap = round_to(sodium - (chloride + bicarbonate), 1);
        let corrected = albumin.map(|a| round_to(gap + ALBUMIN_FACTOR * (NORMAL_ALBUMIN - a), 1));
        let reported = corrected.unwrap_or(gap);
        let label = if corrected.is_some() { "Corrected anion gap" } else { "Anion gap" };

        let interpretation = if reported > 12.0 {
            let severity = if reported > 20.0 { Severity::Severe } else { Severity::Moderate };
            Interpretation::new(
                severity,
                format!("{} {:.1} mEq/L: elevated", label, reported),
            )
            .stage("high")
            .recommend("Evaluate for ketoacidosis, lactic acidosis, renal failure and toxic alcohols")
            .recommend("Compute the delta ratio to look for a mixed disorder")
        } else if reported < 3.0 {
            Interpretation::new(Severity::Mild, format!("{} {:.1} mEq/L: low", label, reported))
                .stage("low")
                .recommend("Consider hypoalbuminemia, paraproteinemia or laboratory error")
        } else {
            Interpretation::new(Severity::Normal, format!("{} {:.1} mEq/L: within 3-12", label, reported))
                .stage("normal")
        };

        let mut output = CalculatorOutput::new(reported, "mEq/L", interpretation).component("anion_gap", gap);
        if let Some(corrected) = corrected {
            output = output.component("corrected_anion_gap", corrected);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::catalog::ParamValue;

    fn params(na: f64, cl: f64, hco3: f64, albumin: Option<f64>) -> BoundParams {
        let mut params: BoundParams = [
            ("sodium".to_string(), ParamValue::Number(na)),
            ("chloride".to_string(), ParamValue::Number(cl)),
            ("bicarbonate".to_string(), ParamValue::Number(hco3)),
        ]
        .into_iter()
        .collect();
        if let Some(a) = albumin {
            params.insert("albumin", ParamValue::Number(a));
        }
        params
    }

    #[test]
    fn test_normal_gap() {
        let out = AnionGap::calculate(&params(140.0, 104.0, 24.0, None)).unwrap();
        assert_eq!(out.value, 12.0);
        assert_eq!(out.interpretation.stage.as_deref(), Some("normal"));
    }

    #[test]
    fn test_high_gap() {
        let out = AnionGap::calculate(&params(140.0, 100.0, 12.0, None)).unwrap();
        assert_eq!(out.value, 28.0);
        assert_eq!(out.interpretation.severity, Severity::Severe);
    }

    #[test]
    fn test_albumin_correction_unmasks_gap() {
        let out = AnionGap::calculate(&params(140.0, 106.0, 24.0, Some(2.0))).unwrap();
        assert_eq!(out.components["anion_gap"], 10.0);
        assert_eq!(out.value, 15.0);
        assert_eq!(out.interpretation.stage.as_deref(), Some("high"));
    }
}
