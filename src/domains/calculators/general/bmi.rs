//! Body mass index.

use crate::domains::calculators::common::{round_to, weight};
use crate::domains::catalog::{
    BoundParams, BoundarySpec, CalculatorDefinition, CalculatorError, CalculatorOutput,
    ClinicalContext, HighLevelKey, Interpretation, ParameterSpec, Reference, Severity, Specialty,
};

const WHO_2000: &str = "World Health Organization. Obesity: preventing and managing the global epidemic. WHO Technical Report Series 894. Geneva: WHO, 2000";

pub struct Bmi;

impl CalculatorDefinition for Bmi {
    const TOOL_ID: &'static str = "bmi";
    const NAME: &'static str = "Body Mass Index";
    const PURPOSE: &'static str = "Computes body mass index from weight and height and assigns the WHO weight category";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            weight(),
            ParameterSpec::numeric("height", "cm")
                .aliases(&["body_height", "ht", "stature"])
                .bounded(BoundarySpec::new((30.0, 275.0), (140.0, 200.0), WHO_2000))
                .describe("Height in centimeters"),
        ]
    }

    fn high_level_key() -> HighLevelKey {
        HighLevelKey::new()
            .specialties([Specialty::Nutrition, Specialty::Endocrinology, Specialty::InternalMedicine])
            .conditions(["obesity", "malnutrition", "underweight"])
            .contexts([ClinicalContext::Screening, ClinicalContext::RiskStratification])
            .icd10(["E66.9", "E44.0", "R63.6"])
            .keywords(["bmi", "body mass index", "obesity", "weight"])
            .questions(["Is this patient overweight or underweight?"])
    }

    fn references() -> Vec<Reference> {
        vec![Reference::new(WHO_2000)]
    }

    fn calculate(params: &BoundParams) -> Result<CalculatorOutput, CalculatorError> {
        let weight = params.number("weight")?;
        let height_m = params.number("height")? / 100.0;
        let bmi = round_to(weight / (height_m * height_m), 1);

        let (stage, severity) = match bmi {
            b if b < 16.0 => ("severe thinness", Severity::Severe),
            b if b < 18.5 => ("underweight", Severity::Mild),
            b if b < 25.0 => ("normal weight", Severity::Normal),
            b if b < 30.0 => ("overweight", Severity::Mild),
            b if b < 35.0 => ("obesity class I", Severity::Moderate),
            b if b < 40.0 => ("obesity class II", Severity::Severe),
            _ => ("obesity class III", Severity::Severe),
        };

        let mut interpretation =
            Interpretation::new(severity, format!("BMI {:.1} kg/m²: {}", bmi, stage)).stage(stage);
        if bmi >= 30.0 {
            interpretation = interpretation.recommend("Screen for diabetes, hypertension and dyslipidemia");
        } else if bmi < 18.5 {
            interpretation = interpretation.recommend("Assess nutritional status and screen for malnutrition");
        }

        Ok(CalculatorOutput::new(bmi, "kg/m²", interpretation))
    }
}
