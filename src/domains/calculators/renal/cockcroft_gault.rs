//! Cockcroft-Gault creatinine clearance.

use crate::domains::calculators::common::{age, round_to, serum_creatinine, sex, weight};
use crate::domains::catalog::{
    BoundParams, CalculatorDefinition, CalculatorError, CalculatorOutput, ClinicalContext,
    HighLevelKey, Interpretation, ParameterSpec, Reference, Severity, Specialty,
};

pub struct CockcroftGault;

impl CalculatorDefinition for CockcroftGault {
    const TOOL_ID: &'static str = "cockcroft_gault";
    const NAME: &'static str = "Cockcroft-Gault Creatinine Clearance";
    const PURPOSE: &'static str = "Estimates creatinine clearance from age, weight, sex and serum creatinine for renal dose adjustment of medications";

    fn parameters() -> Vec<ParameterSpec> {
        vec![age(), weight(), serum_creatinine(), sex()]
    }

    fn high_level_key() -> HighLevelKey {
        HighLevelKey::new()
            .specialties([Specialty::Nephrology, Specialty::Pharmacy, Specialty::InternalMedicine])
            .conditions(["chronic kidney disease", "ckd", "acute kidney injury"])
            .contexts([ClinicalContext::DrugDosing])
            .icd10(["N18.9", "N17.9"])
            .keywords(["creatinine clearance", "crcl", "renal dosing", "kidney function", "creatinine"])
            .questions(["Does this drug need a renal dose adjustment?"])
    }

    fn references() -> Vec<Reference> {
        vec![
            Reference::new(
                "Cockcroft DW, Gault MH. Prediction of creatinine clearance from serum creatinine. Nephron. 1976;16(1):31-41",
            )
            .doi("10.1159/000180580"),
        ]
    }

    fn calculate(params: &BoundParams) -> Result<CalculatorOutput, CalculatorError> {
        let age = params.number("age")?;
        let weight = params.number("weight")?;
        let scr = params.number("serum_creatinine")?;
        let female = params.choice("sex")? == "female";

        if age >= 140.0 {
            return Err(CalculatorError::undefined(
                "Cockcroft-Gault is not defined for age of 140 years or more",
            ));
        }

        let mut crcl = (140.0 - age) * weight / (72.0 * scr);
        if female {
            crcl *= 0.85;
        }
        let crcl = round_to(crcl, 1);

        let interpretation = match crcl {
            c if c >= 90.0 => Interpretation::new(Severity::Normal, format!("CrCl {:.1} mL/min: normal clearance", c)),
            c if c >= 60.0 => Interpretation::new(Severity::Mild, format!("CrCl {:.1} mL/min: mildly reduced clearance", c)),
            c if c >= 30.0 => Interpretation::new(Severity::Moderate, format!("CrCl {:.1} mL/min: moderately reduced clearance", c))
                .recommend("Check labeling of renally cleared drugs for dose reduction"),
            c if c >= 15.0 => Interpretation::new(Severity::Severe, format!("CrCl {:.1} mL/min: severely reduced clearance", c))
                .recommend("Reduce or avoid renally cleared drugs per labeling"),
            c => Interpretation::new(Severity::Critical, format!("CrCl {:.1} mL/min: kidney failure range", c))
                .recommend("Most renally cleared drugs are contraindicated or need dialysis dosing"),
        };

        Ok(CalculatorOutput::new(crcl, "mL/min", interpretation))
    }
}
