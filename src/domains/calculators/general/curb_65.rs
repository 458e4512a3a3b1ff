//! CURB-65 pneumonia severity score.

use crate::domains::calculators::common::{
    KRATZ_2004, age, diastolic_bp, point, respiratory_rate, systolic_bp,
};
use crate::domains::catalog::{
    BoundParams, BoundarySpec, CalculatorDefinition, CalculatorError, CalculatorOutput,
    ClinicalContext, HighLevelKey, Interpretation, ParameterSpec, Reference, Severity, Specialty,
};

pub struct Curb65;

impl CalculatorDefinition for Curb65 {
    const TOOL_ID: &'static str = "curb_65";
    const NAME: &'static str = "CURB-65";
    const PURPOSE: &'static str = "Estimates 30-day mortality in community-acquired pneumonia to guide the choice between outpatient, ward and ICU care";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::flag("confusion")
                .aliases(&["new_confusion", "disorientation"])
                .describe("New disorientation in person, place or time"),
            ParameterSpec::numeric("bun", "mg/dL")
                .aliases(&["blood_urea_nitrogen", "urea_nitrogen"])
                .bounded(BoundarySpec::new((1.0, 300.0), (7.0, 20.0), KRATZ_2004))
                .describe("Blood urea nitrogen in mg/dL"),
            respiratory_rate(),
            systolic_bp(),
            diastolic_bp(),
            age(),
        ]
    }

    fn high_level_key() -> HighLevelKey {
        HighLevelKey::new()
            .specialties([
                Specialty::Pulmonology,
                Specialty::EmergencyMedicine,
                Specialty::InfectiousDisease,
                Specialty::InternalMedicine,
            ])
            .conditions(["community-acquired pneumonia", "pneumonia"])
            .contexts([ClinicalContext::Triage, ClinicalContext::Prognosis, ClinicalContext::RiskStratification])
            .icd10(["J18.9", "J15.9", "J13"])
            .keywords(["curb-65", "curb65", "pneumonia severity", "admission decision"])
            .questions(["Should this pneumonia patient be admitted?"])
    }

    fn references() -> Vec<Reference> {
        vec![
            Reference::new(
                "Lim WS, et al. Defining community acquired pneumonia severity on presentation to hospital: an international derivation and validation study. Thorax. 2003;58(5):377-382",
            )
            .doi("10.1136/thorax.58.5.377"),
        ]
    }

    fn calculate(params: &BoundParams) -> Result<CalculatorOutput, CalculatorError> {
        let confusion = point(params.flag("confusion")?);
        let urea = point(params.number("bun")? > 19.0);
        let respiratory = point(params.number("respiratory_rate")? >= 30.0);
        let pressure = point(
            params.number("systolic_bp")? < 90.0 || params.number("diastolic_bp")? <= 60.0,
        );
        let elderly = point(params.number("age")? >= 65.0);
        let score = confusion + urea + respiratory + pressure + elderly;

        let interpretation = match score as u8 {
            0..=1 => Interpretation::new(
                Severity::Mild,
                format!("CURB-65 {:.0}: low risk, 30-day mortality about 1.5%", score),
            )
            .stage("low")
            .recommend("Consider outpatient treatment"),
            2 => Interpretation::new(
                Severity::Moderate,
                format!("CURB-65 {:.0}: moderate risk, 30-day mortality about 9%", score),
            )
            .stage("moderate")
            .recommend("Consider short inpatient stay or closely supervised outpatient care"),
            _ => Interpretation::new(
                Severity::Severe,
                format!("CURB-65 {:.0}: high risk, 30-day mortality about 22%", score),
            )
            .stage("high")
            .recommend("Manage in hospital as severe pneumonia")
            .recommend("Assess for ICU admission, especially with a score of 4 or 5"),
        };

        Ok(CalculatorOutput::new(score, "points", interpretation)
            .component("confusion", confusion)
            .component("urea", urea)
            .component("respiratory_rate", respiratory)
            .component("blood_pressure", pressure)
            .component("age", elderly))
    }
}
