//! Parameter errors and warnings.
//!
//! Errors abort a calculation. Warnings are attached to an otherwise
//! successful result. Both serialize with a stable `code` so callers can
//! react without parsing messages.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A required parameter that no supplied key resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingField {
    pub canonical_name: String,
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub value_kind: &'static str,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.canonical_name, self.value_kind)?;
        if let Some(unit) = &self.unit {
            write!(f, ", unit: {}", unit)?;
        }
        if !self.aliases.is_empty() {
            write!(f, ", aliases: {}", self.aliases.join(", "))?;
        }
        write!(f, ")")
    }
}

/// A supplied key whose fuzzy match was refused because several parameters
/// were comparably close.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbiguousKey {
    pub key: String,
    /// Candidate canonical names, best first.
    pub candidates: Vec<String>,
}

fn describe_missing(missing: &[MissingField]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe_ambiguous(ambiguous: &[AmbiguousKey]) -> String {
    ambiguous
        .iter()
        .map(|a| format!("'{}' could mean any of [{}]", a.key, a.candidates.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fatal problems with the supplied parameters.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterError {
    #[error("Missing required parameters for '{tool_id}': {}", describe_missing(.missing))]
    MissingParameter {
        tool_id: String,
        missing: Vec<MissingField>,
    },

    #[error(
        "Ambiguous parameters for '{tool_id}': {}. Use the exact canonical name. Missing required parameters: {}",
        describe_ambiguous(.ambiguous),
        describe_missing(.missing)
    )]
    AmbiguousParameter {
        tool_id: String,
        ambiguous: Vec<AmbiguousKey>,
        missing: Vec<MissingField>,
    },

    #[error("Parameter '{parameter}' has the wrong type: expected {expected}, received {received}")]
    TypeMismatch {
        parameter: String,
        expected: String,
        received: String,
    },

    #[error(
        "Parameter '{parameter}' = {value}{} is outside the physiologically possible range [{hard_min}, {hard_max}]",
        unit_suffix(.unit)
    )]
    HardRangeViolation {
        parameter: String,
        value: f64,
        hard_min: f64,
        hard_max: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },

    #[error("Cross-field rule violated: {description} (expected {expression}, got {left_value} vs {right_value})")]
    CrossFieldRuleViolation {
        expression: String,
        description: String,
        left_value: f64,
        right_value: f64,
    },
}

fn unit_suffix(unit: &Option<String>) -> String {
    unit.as_ref().map(|u| format!(" {}", u)).unwrap_or_default()
}

impl ParameterError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingParameter { .. } => "MISSING_PARAMETER",
            Self::AmbiguousParameter { .. } => "AMBIGUOUS_PARAMETER",
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
            Self::HardRangeViolation { .. } => "HARD_RANGE_VIOLATION",
            Self::CrossFieldRuleViolation { .. } => "CROSS_FIELD_RULE_VIOLATION",
        }
    }

    pub fn type_mismatch(
        parameter: impl Into<String>,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            parameter: parameter.into(),
            expected: expected.into(),
            received: received.into(),
        }
    }
}

/// Non-fatal findings attached to a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterWarning {
    /// A supplied key matched no parameter and was ignored.
    UnrecognizedParameter {
        key: String,
        accepted: Vec<String>,
    },

    /// A second key resolved to a parameter that was already bound.
    DuplicateParameter {
        key: String,
        canonical_name: String,
        bound_from: String,
    },

    /// A key was bound through approximate matching.
    FuzzyMatched {
        key: String,
        canonical_name: String,
        similarity: f64,
    },

    /// A key was too close to several parameters to be bound.
    AmbiguousParameter {
        key: String,
        candidates: Vec<String>,
    },

    /// A value is possible but outside the typical clinical range.
    SoftRangeViolation {
        parameter: String,
        value: f64,
        soft_min: f64,
        soft_max: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
        literature_reference: String,
    },
}

impl ParameterWarning {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnrecognizedParameter { .. } => "UNRECOGNIZED_PARAMETER",
            Self::DuplicateParameter { .. } => "DUPLICATE_PARAMETER",
            Self::FuzzyMatched { .. } => "FUZZY_MATCHED",
            Self::AmbiguousParameter { .. } => "AMBIGUOUS_PARAMETER",
            Self::SoftRangeViolation { .. } => "SOFT_RANGE_VIOLATION",
        }
    }
}

impl fmt::Display for ParameterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedParameter { key, accepted } => write!(
                f,
                "Unrecognized parameter '{}' was ignored. Accepted parameters: {}",
                key,
                accepted.join(", ")
            ),
            Self::DuplicateParameter {
                key,
                canonical_name,
                bound_from,
            } => write!(
                f,
                "Parameter '{}' also resolves to '{}', already supplied as '{}'; ignored",
                key, canonical_name, bound_from
            ),
            Self::FuzzyMatched {
                key,
                canonical_name,
                similarity,
            } => write!(
                f,
                "Interpreted '{}' as '{}' (similarity {:.2})",
                key, canonical_name, similarity
            ),
            Self::AmbiguousParameter { key, candidates } => write!(
                f,
                "Parameter '{}' was ignored because it could mean any of [{}]",
                key,
                candidates.join(", ")
            ),
            Self::SoftRangeViolation {
                parameter,
                value,
                soft_min,
                soft_max,
                unit,
                literature_reference,
            } => write!(
                f,
                "{} = {}{} is outside the typical range [{}, {}] ({}); calculation used the supplied value",
                parameter,
                value,
                unit_suffix(unit),
                soft_min,
                soft_max,
                literature_reference
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_message_names_every_field() {
        let err = ParameterError::MissingParameter {
            tool_id: "sofa_score".to_string(),
            missing: vec![
                MissingField {
                    canonical_name: "bilirubin".to_string(),
                    aliases: vec!["tbili".to_string()],
                    unit: Some("mg/dL".to_string()),
                    value_kind: "numeric",
                },
                MissingField {
                    canonical_name: "gcs_score".to_string(),
                    aliases: vec![],
                    unit: None,
                    value_kind: "numeric",
                },
            ],
        };

        let msg = err.to_string();
        assert!(msg.contains("bilirubin (numeric, unit: mg/dL, aliases: tbili)"));
        assert!(msg.contains("gcs_score (numeric)"));
    }

    #[test]
    fn test_ambiguity_error_names_keys_and_missing_fields() {
        let err = ParameterError::AmbiguousParameter {
            tool_id: "lipids".to_string(),
            ambiguous: vec![AmbiguousKey {
                key: "dl_cholesterol".to_string(),
                candidates: vec!["hdl_cholesterol".to_string(), "ldl_cholesterol".to_string()],
            }],
            missing: vec![MissingField {
                canonical_name: "triglycerides".to_string(),
                aliases: vec![],
                unit: Some("mg/dL".to_string()),
                value_kind: "numeric",
            }],
        };

        let msg = err.to_string();
        assert!(msg.contains("'dl_cholesterol' could mean any of [hdl_cholesterol, ldl_cholesterol]"));
        assert!(msg.contains("triglycerides (numeric, unit: mg/dL)"));

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "AMBIGUOUS_PARAMETER");
        assert_eq!(json["missing"][0]["canonical_name"], "triglycerides");
        assert_eq!(json["ambiguous"][0]["key"], "dl_cholesterol");
    }

    #[test]
    fn test_error_serializes_with_code() {
        let err = ParameterError::HardRangeViolation {
            parameter: "sodium".to_string(),
            value: 500.0,
            hard_min: 100.0,
            hard_max: 200.0,
            unit: Some("mEq/L".to_string()),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "HARD_RANGE_VIOLATION");
        assert_eq!(json["code"], err.code());
        assert_eq!(json["hard_max"], 200.0);
        assert!(err.to_string().contains("500 mEq/L"));
    }

    #[test]
    fn test_warning_codes_match_serialization() {
        let warning = ParameterWarning::FuzzyMatched {
            key: "hemoglobn".to_string(),
            canonical_name: "hemoglobin".to_string(),
            similarity: 0.9,
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["code"], warning.code());
        assert_eq!(warning.to_string(), "Interpreted 'hemoglobn' as 'hemoglobin' (similarity 0.90)");
    }
}
