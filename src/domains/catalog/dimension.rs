//! Discovery dimensions.
//!
//! A tool is discoverable along every dimension of its [`HighLevelKey`] that
//! carries at least one value. Specialties and clinical contexts are closed
//! sets; conditions, ICD-10 codes and keywords are open.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Declares a closed dimension enum with its wire names.
///
/// Variants must be listed in alphabetical order of their wire names so that
/// the derived `Ord` matches lexical ordering.
macro_rules! closed_dimension {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every value of this dimension, in lexical order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The stable wire name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Parse a caller-supplied value, tolerating case, spaces and hyphens.
            pub fn parse(value: &str) -> Option<Self> {
                let normalized = normalize_dimension_value(value);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str() == normalized)
            }

            /// Wire names of every value, for error messages.
            pub fn valid_options() -> Vec<String> {
                Self::ALL.iter().map(|v| v.as_str().to_string()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_dimension! {
    /// Medical specialty a calculator belongs to.
    Specialty {
        Anesthesiology => "anesthesiology",
        Cardiology => "cardiology",
        CriticalCare => "critical_care",
        EmergencyMedicine => "emergency_medicine",
        Endocrinology => "endocrinology",
        InfectiousDisease => "infectious_disease",
        InternalMedicine => "internal_medicine",
        Nephrology => "nephrology",
        Nutrition => "nutrition",
        Pharmacy => "pharmacy",
        Pulmonology => "pulmonology",
    }
}

closed_dimension! {
    /// Clinical situation in which a calculator is used.
    ClinicalContext {
        Diagnosis => "diagnosis",
        DrugDosing => "drug_dosing",
        Monitoring => "monitoring",
        Prognosis => "prognosis",
        RiskStratification => "risk_stratification",
        Screening => "screening",
        SeverityAssessment => "severity_assessment",
        Triage => "triage",
    }
}

/// Lowercase, trim, and fold spaces/hyphens into underscores.
fn normalize_dimension_value(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// One value along one discovery dimension.
///
/// Used to compare tools with each other: two tools are related when their
/// keys share at least one `DimensionValue`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "dimension", content = "value", rename_all = "snake_case")]
pub enum DimensionValue {
    Specialty(Specialty),
    Condition(String),
    ClinicalContext(ClinicalContext),
    Icd10(String),
    Keyword(String),
}

/// The discovery metadata of a tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HighLevelKey {
    pub specialties: BTreeSet<Specialty>,
    pub conditions: BTreeSet<String>,
    pub clinical_contexts: BTreeSet<ClinicalContext>,
    pub icd10_codes: BTreeSet<String>,
    pub keywords: BTreeSet<String>,
    /// Questions the tool answers, phrased the way a clinician would ask them.
    pub clinical_questions: Vec<String>,
}

impl HighLevelKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn specialties(mut self, values: impl IntoIterator<Item = Specialty>) -> Self {
        self.specialties.extend(values);
        self
    }

    pub fn conditions<'a>(mut self, values: impl IntoIterator<Item = &'a str>) -> Self {
        self.conditions
            .extend(values.into_iter().map(|v| v.trim().to_lowercase()));
        self
    }

    pub fn contexts(mut self, values: impl IntoIterator<Item = ClinicalContext>) -> Self {
        self.clinical_contexts.extend(values);
        self
    }

    pub fn icd10<'a>(mut self, codes: impl IntoIterator<Item = &'a str>) -> Self {
        self.icd10_codes
            .extend(codes.into_iter().map(|c| c.trim().to_uppercase()));
        self
    }

    pub fn keywords<'a>(mut self, values: impl IntoIterator<Item = &'a str>) -> Self {
        self.keywords
            .extend(values.into_iter().map(|v| v.trim().to_lowercase()));
        self
    }

    pub fn questions<'a>(mut self, values: impl IntoIterator<Item = &'a str>) -> Self {
        self.clinical_questions
            .extend(values.into_iter().map(str::to_string));
        self
    }

    /// Whether at least one indexable dimension carries a value.
    pub fn is_discoverable(&self) -> bool {
        !self.specialties.is_empty()
            || !self.conditions.is_empty()
            || !self.clinical_contexts.is_empty()
            || !self.icd10_codes.is_empty()
            || !self.keywords.is_empty()
    }

    /// Every indexable value of this key, ordered.
    pub fn dimension_values(&self) -> BTreeSet<DimensionValue> {
        let mut values = BTreeSet::new();
        values.extend(self.specialties.iter().copied().map(DimensionValue::Specialty));
        values.extend(self.conditions.iter().cloned().map(DimensionValue::Condition));
        values.extend(
            self.clinical_contexts
                .iter()
                .copied()
                .map(DimensionValue::ClinicalContext),
        );
        values.extend(self.icd10_codes.iter().cloned().map(DimensionValue::Icd10));
        values.extend(self.keywords.iter().cloned().map(DimensionValue::Keyword));
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specialty_parse_tolerates_formatting() {
        assert_eq!(Specialty::parse("critical_care"), Some(Specialty::CriticalCare));
        assert_eq!(Specialty::parse("Critical Care"), Some(Specialty::CriticalCare));
        assert_eq!(Specialty::parse(" critical-care "), Some(Specialty::CriticalCare));
        assert_eq!(Specialty::parse("astrology"), None);
    }

    #[test]
    fn test_all_is_lexically_ordered() {
        let names: Vec<_> = Specialty::ALL.iter().map(|s| s.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);

        let contexts: Vec<_> = ClinicalContext::ALL.iter().map(|c| c.as_str()).collect();
        let mut sorted = contexts.clone();
        sorted.sort_unstable();
        assert_eq!(contexts, sorted);
    }

    #[test]
    fn test_key_normalizes_values() {
        let key = HighLevelKey::new()
            .conditions(["Sepsis ", "sepsis"])
            .icd10(["a41.9"])
            .keywords(["SOFA"]);

        assert_eq!(key.conditions.len(), 1);
        assert!(key.conditions.contains("sepsis"));
        assert!(key.icd10_codes.contains("A41.9"));
        assert!(key.keywords.contains("sofa"));
    }

    #[test]
    fn test_questions_alone_are_not_discoverable() {
        let key = HighLevelKey::new().questions(["Is this patient septic?"]);
        assert!(!key.is_discoverable());
        assert!(HighLevelKey::new().keywords(["x"]).is_discoverable());
    }

    #[test]
    fn test_dimension_values_cover_every_dimension() {
        let key = HighLevelKey::new()
            .specialties([Specialty::Nephrology])
            .conditions(["ckd"])
            .contexts([ClinicalContext::Diagnosis])
            .icd10(["N18"])
            .keywords(["egfr"]);

        let values = key.dimension_values();
        assert_eq!(values.len(), 5);
        assert!(values.contains(&DimensionValue::Keyword("egfr".to_string())));
        assert!(values.contains(&DimensionValue::Specialty(Specialty::Nephrology)));
    }
}
