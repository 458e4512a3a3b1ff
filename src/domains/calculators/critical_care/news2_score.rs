//! National Early Warning Score 2 (NEWS2).

use crate::domains::calculators::common::{
    RCP_NEWS2_2017, heart_rate, respiratory_rate, systolic_bp,
};
use crate::domains::catalog::{
    BoundParams, BoundarySpec, CalculatorDefinition, CalculatorError, CalculatorOutput,
    ClinicalContext, HighLevelKey, Interpretation, ParameterSpec, Reference, Severity, Specialty,
};

pub struct News2Score;

fn respiration_points(rr: f64) -> u8 {
    match rr {
        r if r <= 8.0 => 3,
        r if r <= 11.0 => 1,
        r if r <= 20.0 => 0,
        r if r <= 24.0 => 2,
        _ => 3,
    }
}

/// Scale 1 is the default; scale 2 is for confirmed hypercapnic respiratory failure.
fn saturation_points(spo2: f64, scale_2: bool, on_oxygen: bool) -> u8 {
    if !scale_2 {
        return match spo2 {
            s if s <= 91.0 => 3,
            s if s <= 93.0 => 2,
            s if s <= 95.0 => 1,
            _ => 0,
        };
    }

    match spo2 {
        s if s <= 83.0 => 3,
        s if s <= 85.0 => 2,
        s if s <= 87.0 => 1,
        s if s <= 92.0 || !on_oxygen => 0,
        s if s <= 94.0 => 1,
        s if s <= 96.0 => 2,
        _ => 3,
    }
}

fn systolic_points(sbp: f64) -> u8 {
    match sbp {
        s if s <= 90.0 => 3,
        s if s <= 100.0 => 2,
        s if s <= 110.0 => 1,
        s if s <= 219.0 => 0,
        _ => 3,
    }
}

fn pulse_points(hr: f64) -> u8 {
    match hr {
        h if h <= 40.0 => 3,
        h if h <= 50.0 => 1,
        h if h <= 90.0 => 0,
        h if h <= 110.0 => 1,
        h if h <= 130.0 => 2,
        _ => 3,
    }
}

fn temperature_points(temp: f64) -> u8 {
    match temp {
        t if t <= 35.0 => 3,
        t if t <= 36.0 => 1,
        t if t <= 38.0 => 0,
        t if t <= 39.0 => 1,
        _ => 2,
    }
}

impl CalculatorDefinition for News2Score {
    const TOOL_ID: &'static str = "news2_score";
    const NAME: &'static str = "NEWS2";
    const PURPOSE: &'static str = "Aggregates six physiological observations into an early warning score that detects clinical deterioration, including sepsis, in adult patients";

    fn parameters() -> Vec<ParameterSpec> {
        vec![
            respiratory_rate(),
            ParameterSpec::numeric("spo2", "%")
                .aliases(&["oxygen_saturation", "o2_sat", "sao2", "sats"])
                .bounded(BoundarySpec::new((50.0, 100.0), (96.0, 100.0), RCP_NEWS2_2017))
                .describe("Peripheral oxygen saturation in percent"),
            ParameterSpec::flag("spo2_scale_2")
                .aliases(&["hypercapnic_respiratory_failure", "scale_2"])
                .optional()
                .describe("Use SpO2 scale 2 (target 88-92%) for confirmed hypercapnic respiratory failure"),
            ParameterSpec::flag("on_supplemental_oxygen")
                .aliases(&["supplemental_oxygen", "on_oxygen", "oxygen"])
                .describe("Whether the patient is receiving supplemental oxygen"),
            systolic_bp(),
            heart_rate(),
            ParameterSpec::choice(
                "consciousness",
                &["alert", "confusion", "voice", "pain", "unresponsive"],
            )
            .aliases(&["acvpu", "level_of_consciousness", "avpu"])
            .describe("ACVPU level: alert, new confusion, responds to voice, to pain, or unresponsive"),
            ParameterSpec::numeric("temperature", "°C")
                .aliases(&["temp", "body_temperature"])
                .bounded(BoundarySpec::new((25.0, 45.0), (36.1, 38.0), RCP_NEWS2_2017))
                .describe("Body temperature in degrees Celsius"),
        ]
    }

    fn high_level_key() -> HighLevelKey {
        HighLevelKey::new()
            .specialties([
                Specialty::EmergencyMedicine,
                Specialty::InternalMedicine,
                Specialty::CriticalCare,
            ])
            .conditions(["sepsis", "clinical deterioration", "acute illness"])
            .contexts([ClinicalContext::Monitoring, ClinicalContext::Triage, ClinicalContext::SeverityAssessment])
            .icd10(["R65.10", "A41.9"])
            .keywords(["sepsis", "news", "news2", "early warning score", "deterioration", "vital signs"])
            .questions([
                "Is this ward patient deteriorating?",
                "How urgently does this patient need review?",
            ])
    }

    fn references() -> Vec<Reference> {
        vec![Reference::new(RCP_NEWS2_2017)]
    }

    fn calculate(params: &BoundParams) -> Result<CalculatorOutput, CalculatorError> {
        let on_oxygen = params.flag("on_supplemental_oxygen")?;

        let respiration = respiration_points(params.number("respiratory_rate")?);
        let saturation = saturation_points(
            params.number("spo2")?,
            params.flag_or("spo2_scale_2", false)?,
            on_oxygen,
        );
        let oxygen = if on_oxygen { 2 } else { 0 };
        let systolic = systolic_points(params.number("systolic_bp")?);
        let pulse = pulse_points(params.number("heart_rate")?);
        let consciousness = if params.choice("consciousness")? == "alert" { 0 } else { 3 };
        let temperature = temperature_points(params.number("temperature")?);

        let parts = [respiration, saturation, oxygen, systolic, pulse, consciousness, temperature];
        let total: u8 = parts.iter().sum();
        let red_flag = parts.iter().any(|&p| p == 3);

        let interpretation = match total {
            t if t >= 7 => Interpretation::new(Severity::Critical, format!("NEWS2 {}: high clinical risk", t))
                .stage("high")
                .recommend("Emergency assessment by a critical care team")
                .recommend("Continuous monitoring of vital signs"),
            t if t >= 5 => Interpretation::new(Severity::Severe, format!("NEWS2 {}: medium clinical risk", t))
                .stage("medium")
                .recommend("Urgent review by a clinician competent in acute illness")
                .recommend("Monitor at least hourly and screen for sepsis"),
            t if red_flag => Interpretation::new(
                Severity::Moderate,
                format!("NEWS2 {}: low-medium risk, a single parameter scores 3", t),
            )
            .stage("low-medium")
            .recommend("Urgent ward-based review"),
            t if t >= 1 => Interpretation::new(Severity::Mild, format!("NEWS2 {}: low clinical risk", t))
                .stage("low")
                .recommend("Assessment by a registered nurse; monitor at least every 4-6 hours"),
            t => Interpretation::new(Severity::Normal, format!("NEWS2 {}: low clinical risk", t))
                .stage("low")
                .recommend("Continue routine monitoring at least every 12 hours"),
        };

        Ok(CalculatorOutput::new(f64::from(total), "points", interpretation)
            .component("respiration_rate", f64::from(respiration))
            .component("spo2", f64::from(saturation))
            .component("air_or_oxygen", f64::from(oxygen))
            .component("systolic_bp", f64::from(systolic))
            .component("pulse", f64::from(pulse))
            .component("consciousness", f64::from(consciousness))
            .component("temperature", f64::from(temperature)))
    }
}
