//! Sequential Organ Failure Assessment (SOFA) score.
//!
//! Six organ systems, each scored 0-4:
//!
//! | System         | Input                                   |
//! |----------------|-----------------------------------------|
//! | Respiration    | PaO2/FiO2, mechanical ventilation       |
//! | Coagulation    | Platelets                               |
//! | Liver          | Bilirubin                               |
//! | Cardiovascular | MAP and vasoactive infusions            |
//! | CNS            | Glasgow Coma Scale                      |
//! | Renal          | Creatinine or urine output              |
//!
//! Respiratory scores of 3 and 4 require ventilatory support.

use crate::domains::calculators::common::{KRATZ_2004, serum_creatinine};
use crate::domains::catalog::{
    BoundParams, BoundarySpec, CalculatorDefinition, CalculatorError, CalculatorOutput,
    ClinicalContext, HighLevelKey, Interpretation, ParameterSpec, Reference, Severity, Specialty,
};

const VINCENT_1996: &str = "Vincent JL, et al. The SOFA (Sepsis-related Organ Failure Assessment) score to describe organ dysfunction/failure. Intensive Care Med. 1996;22(7):707-710";

pub struct SofaScore;

fn infusion(name: &str, aliases: &[&str], hard_max: f64, soft_max: f64) -> ParameterSpec {
    ParameterSpec::numeric(name, "mcg/kg/min")
        .aliases(aliases)
        .optional()
        .bounded(BoundarySpec::new((0.0, hard_max), (0.0, soft_max), VINCENT_1996))
}

fn respiration(pf_ratio: f64, ventilated: bool) -> u8 {
    match pf_ratio {
        r if r < 100.0 && ventilated => 4,
        r if r < 200.0 && ventilated => 3,
        r if r < 300.0 => 2,
        r if r < 400.0 => 1,
        _ => 0,
    }
}

fn coagulation(platelets: f64) -> u8 {
    match platelets {
        p if p < 20.0 => 4,
        p if p < 50.0 => 3,
        p if p < 100.0 => 2,
        p if p < 150.0 => 1,
        _ => 0,
    }
}

fn liver(bilirubin: f64) -> u8 {
    match bilirubin {
        b if b >= 12.0 => 4,
        b if b >= 6.0 => 3,
        b if b >= 2.0 => 2,
        b if b >= 1.2 => 1,
        _ => 0,
    }
}

/// Doses are in mcg/kg/min; an absent or zero infusion counts as none.
fn cardiovascular(
    map: f64,
    dopamine: f64,
    dobutamine: f64,
    epinephrine: f64,
    norepinephrine: f64,
) -> u8 {
    if dopamine > 15.0 || epinephrine > 0.1 || norepinephrine > 0.1 {
        4
    } else if dopamine > 5.0 || epinephrine > 0.0 || norepinephrine > 0.0 {
        3
    } else if dopamine > 0.0 || dobutamine > 0.0 {
        2
    } else if map < 70.0 {
        1
    } else {
        0
    }
}

fn cns(gcs: f64) -> u8 {
    match gcs {
        g if g < 6.0 => 4,
        g if g < 10.0 => 3,
        g if g < 13.0 => 2,
        g if g < 15.0 => 1,
        _ => 0,
    }
}

fn renal(creatinine: f64, urine_output: Option<f64>) -> u8 {
    let by_creatinine = match creatinine {
        c if c >= 5.0 => 4,
        c if c >= 3.5 => 3,
        c if c >= 2.0 => 2,
        c if c >= 1.2 => 1,
        _ => 0,
    };
    let by_urine = match urine_output {
        Some(u) if u < 200.0 => 4,
        Some(u) if u < 500.0 => 3,
        _ => 0,
    };
    by_creatinine.max(by_urine)
}

impl CalculatorDefinition for SofaScore {
    const TOOL_ID: &'static str = "sofa_score";
    const NAME: &'static str = "SOFA Score";
    const PURPOSE: &'static str = "Quantifies organ dysfunction across six organ systems in critically ill patients; an acute rise of 2 or more points defines sepsis-associated organ dysfunction";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::numeric("pao2_fio2_ratio", "mmHg")
                .aliases(&["pf_ratio", "p_f_ratio", "pao2_fio2"])
                .bounded(BoundarySpec::new((20.0, 700.0), (400.0, 550.0), VINCENT_1996))
                .describe("PaO2/FiO2 ratio in mmHg"),
            ParameterSpec::flag("mechanical_ventilation")
                .aliases(&["ventilated", "on_ventilator", "respiratory_support"])
                .optional()
                .describe("Whether the patient receives mechanical ventilation or CPAP"),
            ParameterSpec::numeric("platelets", "x10^3/uL")
                .aliases(&["plt", "platelet_count"])
                .bounded(BoundarySpec::new((0.0, 2000.0), (150.0, 450.0), KRATZ_2004))
                .describe("Platelet count in thousands per microliter"),
            ParameterSpec::numeric("bilirubin", "mg/dL")
                .aliases(&["total_bilirubin", "tbili", "bili"])
                .bounded(BoundarySpec::new((0.0, 50.0), (0.1, 1.2), KRATZ_2004))
                .describe("Total serum bilirubin in mg/dL"),
            ParameterSpec::numeric("mean_arterial_pressure", "mmHg")
                .aliases(&["map"])
                .bounded(BoundarySpec::new((10.0, 250.0), (70.0, 105.0), VINCENT_1996))
                .describe("Mean arterial pressure in mmHg"),
            infusion("dopamine", &["dopamine_dose"], 50.0, 20.0)
                .describe("Dopamine infusion in mcg/kg/min"),
            infusion("dobutamine", &["dobutamine_dose"], 40.0, 20.0)
                .describe("Dobutamine infusion in mcg/kg/min"),
            infusion("epinephrine", &["epi", "adrenaline"], 5.0, 1.0)
                .describe("Epinephrine infusion in mcg/kg/min"),
            infusion("norepinephrine", &["norepi", "noradrenaline"], 5.0, 1.0)
                .describe("Norepinephrine infusion in mcg/kg/min"),
            ParameterSpec::numeric("gcs_score", "")
                .aliases(&["gcs", "glasgow_coma_scale"])
                .bounded(BoundarySpec::new((3.0, 15.0), (3.0, 15.0), VINCENT_1996))
                .describe("Glasgow Coma Scale, 3-15"),
            serum_creatinine(),
            ParameterSpec::numeric("urine_output", "mL/day")
                .aliases(&["uop", "urine_output_24h"])
                .optional()
                .bounded(BoundarySpec::new((0.0, 10000.0), (800.0, 3000.0), VINCENT_1996))
                .describe("Urine output over 24 hours in mL"),
        ]
    }

    fn high_level_key() -> HighLevelKey {
        HighLevelKey::new()
            .specialties([Specialty::CriticalCare, Specialty::InfectiousDisease])
            .conditions(["sepsis", "septic shock", "multiple organ dysfunction syndrome"])
            .contexts([ClinicalContext::SeverityAssessment, ClinicalContext::Prognosis, ClinicalContext::Monitoring])
            .icd10(["A41.9", "R65.20", "R65.21"])
            .keywords(["sepsis", "sofa", "organ failure", "organ dysfunction", "icu mortality"])
            .questions([
                "How much organ dysfunction does this ICU patient have?",
                "Does this infected patient meet Sepsis-3 criteria?",
            ])
    }

    fn references() -> Vec<Reference> {
        vec![
            Reference::new(VINCENT_1996).doi("10.1007/BF01709751"),
            Reference::new(
                "Singer M, et al. The Third International Consensus Definitions for Sepsis and Septic Shock (Sepsis-3). JAMA. 2016;315(8):801-810",
            )
            .doi("10.1001/jama.2016.0287"),
        ]
    }

    fn calculate(params: &BoundParams) -> Result<CalculatorOutput, CalculatorError> {
        let dose = |name: &str| -> Result<f64, CalculatorError> {
            Ok(params.optional_number(name)?.unwrap_or(0.0))
        };

        let respiration = respiration(
            params.number("pao2_fio2_ratio")?,
            params.flag_or("mechanical_ventilation", false)?,
        );
        let coagulation = coagulation(params.number("platelets")?);
        let liver = liver(params.number("bilirubin")?);
        let cardiovascular = cardiovascular(
            params.number("mean_arterial_pressure")?,
            dose("dopamine")?,
            dose("dobutamine")?,
            dose("epinephrine")?,
            dose("norepinephrine")?,
        );
        let cns = cns(params.number("gcs_score")?);
        let renal = renal(
            params.number("serum_creatinine")?,
            params.optional_number("urine_output")?,
        );

        let total = respiration + coagulation + liver + cardiovascular + cns + renal;

        let (severity, mortality) = match total {
            0..=1 => (Severity::Normal, "<10%"),
            2..=6 => (Severity::Moderate, "<10%"),
            7..=9 => (Severity::Severe, "15-20%"),
            10..=12 => (Severity::Severe, "40-50%"),
            13..=14 => (Severity::Critical, "50-60%"),
            _ => (Severity::Critical, ">80%"),
        };

        let mut interpretation = Interpretation::new(
            severity,
            format!(
                "SOFA {} of 24: estimated ICU mortality {}",
                total, mortality
            ),
        );
        if total >= 2 {
            interpretation = interpretation
                .recommend("An acute rise of 2 or more points with suspected infection meets Sepsis-3 criteria")
                .recommend("Reassess every 24-48 hours to track trajectory");
        }

        Ok(CalculatorOutput::new(f64::from(total), "points", interpretation)
            .component("respiration", f64::from(respiration))
            .component("coagulation", f64::from(coagulation))
            .component("liver", f64::from(liver))
            .component("cardiovascular", f64::from(cardiovascular))
            .component("cns", f64::from(cns))
            .component("renal", f64::from(renal)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::catalog::ParamValue;

    fn healthy() -> BoundParams {
        [
            ("pao2_fio2_ratio", 450.0),
            ("platelets", 250.0),
            ("bilirubin", 0.8),
            ("mean_arterial_pressure", 85.0),
            ("gcs_score", 15.0),
            ("serum_creatinine", 0.9),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), ParamValue::Number(v)))
        .collect()
    }

    #[test]
    fn test_healthy_scores_zero() {
        let out = SofaScore::calculate(&healthy()).unwrap();
        assert_eq!(out.value, 0.0);
        assert_eq!(out.interpretation.severity, Severity::Normal);
        assert_eq!(out.components.len(), 6);
    }

    #[test]
    fn test_respiration_needs_ventilation_for_high_scores() {
        assert_eq!(respiration(90.0, false), 2);
        assert_eq!(respiration(90.0, true), 4);
        assert_eq!(respiration(150.0, true), 3);
        assert_eq!(respiration(350.0, false), 1);
    }

    #[test]
    fn test_cardiovascular_tiers() {
        assert_eq!(cardiovascular(65.0, 0.0, 0.0, 0.0, 0.0), 1);
        assert_eq!(cardiovascular(65.0, 0.0, 5.0, 0.0, 0.0), 2);
        assert_eq!(cardiovascular(65.0, 0.0, 0.0, 0.0, 0.05), 3);
        assert_eq!(cardiovascular(65.0, 0.0, 0.0, 0.0, 0.2), 4);
        assert_eq!(cardiovascular(65.0, 16.0, 0.0, 0.0, 0.0), 4);
    }

    #[test]
    fn test_renal_uses_worse_of_creatinine_and_urine() {
        assert_eq!(renal(1.0, Some(150.0)), 4);
        assert_eq!(renal(3.6, Some(2000.0)), 3);
        assert_eq!(renal(1.3, None), 1);
    }

    #[test]
    fn test_septic_patient() {
        let mut params = healthy();
        params.insert("pao2_fio2_ratio", ParamValue::Number(180.0));
        params.insert("mechanical_ventilation", ParamValue::Flag(true));
        params.insert("platelets", ParamValue::Number(80.0));
        params.insert("mean_arterial_pressure", ParamValue::Number(62.0));
        params.insert("norepinephrine", ParamValue::Number(0.08));

        let out = SofaScore::calculate(&params).unwrap();
        // respiration 3, coagulation 2, cardiovascular 3
        assert_eq!(out.value, 8.0);
        assert_eq!(out.components["cardiovascular"], 3.0);
        assert!(!out.interpretation.recommendations.is_empty());
    }
}
