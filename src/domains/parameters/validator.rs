//! Boundary Validator - generic checks over declared constraints.
//!
//! The validator knows nothing about individual calculators. It interprets
//! the `ParameterSpec`s and `CrossFieldRule`s a descriptor declares:
//!
//! - type/shape (fatal)
//! - hard range (fatal)
//! - soft range (warning, value used unchanged)
//! - cross-field rules (fatal, evaluated after every field passed)

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use super::error::{ParameterError, ParameterWarning};
use super::matcher::Binding;
use crate::domains::catalog::{BoundParams, CrossFieldRule, ParamValue, ParameterSpec, ValueKind};

const TRUE_WORDS: &[&str] = &["true", "yes", "y", "1"];
const FALSE_WORDS: &[&str] = &["false", "no", "n", "0"];

/// Values that passed per-field validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValidation {
    pub params: BoundParams,
    pub warnings: Vec<ParameterWarning>,
}

/// Interprets declared constraints against bound values.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryValidator;

impl BoundaryValidator {
    pub fn new() -> Self {
        Self
    }

    /// Type-check and range-check every bound value, in schema order.
    pub fn validate_fields(
        &self,
        specs: &[ParameterSpec],
        bindings: &BTreeMap<String, Binding>,
    ) -> Result<FieldValidation, ParameterError> {
        let mut validation = FieldValidation::default();

        for spec in specs {
            let Some(binding) = bindings.get(&spec.canonical_name) else {
                continue;
            };

            let value = coerce(spec, &binding.value)?;
            if let ParamValue::Number(n) = value {
                if let Some(warning) = check_range(spec, n)? {
                    validation.warnings.push(warning);
                }
            }
            validation.params.insert(spec.canonical_name.clone(), value);
        }

        Ok(validation)
    }

    /// Evaluate cross-field rules whose operands are both present.
    pub fn check_rules(
        &self,
        rules: &[CrossFieldRule],
        params: &BoundParams,
    ) -> Result<(), ParameterError> {
        for rule in rules {
            let (Some(ParamValue::Number(left)), Some(ParamValue::Number(right))) =
                (params.get(&rule.left), params.get(&rule.right))
            else {
                continue;
            };

            if !rule.comparison.holds(*left, *right) {
                debug!(rule = %rule.expression(), left, right, "Cross-field rule violated");
                return Err(ParameterError::CrossFieldRuleViolation {
                    expression: rule.expression(),
                    description: rule.description.clone(),
                    left_value: *left,
                    right_value: *right,
                });
            }
        }
        Ok(())
    }
}

/// Convert a raw JSON value into the kind the parameter declares.
pub fn coerce(spec: &ParameterSpec, raw: &Value) -> Result<ParamValue, ParameterError> {
    let name = &spec.canonical_name;
    match spec.value_kind {
        ValueKind::Numeric => {
            let number = match raw {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            match number {
                Some(n) if n.is_finite() => Ok(ParamValue::Number(n)),
                _ => Err(ParameterError::type_mismatch(
                    name,
                    match &spec.unit {
                        Some(unit) => format!("a finite number in {}", unit),
                        None => "a finite number".to_string(),
                    },
                    describe(raw),
                )),
            }
        }
        ValueKind::Enum => {
            let text = match raw {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            };
            text.and_then(|t| {
                spec.enum_values
                    .iter()
                    .find(|v| v.eq_ignore_ascii_case(&t))
                    .cloned()
            })
            .map(ParamValue::Choice)
            .ok_or_else(|| {
                ParameterError::type_mismatch(
                    name,
                    format!("one of [{}]", spec.enum_values.join(", ")),
                    describe(raw),
                )
            })
        }
        ValueKind::Boolean => {
            let flag = match raw {
                Value::Bool(b) => Some(*b),
                Value::Number(n) => match n.as_f64() {
                    Some(v) if v == 1.0 => Some(true),
                    Some(v) if v == 0.0 => Some(false),
                    _ => None,
                },
                Value::String(s) => {
                    let s = s.trim().to_lowercase();
                    if TRUE_WORDS.contains(&s.as_str()) {
                        Some(true)
                    } else if FALSE_WORDS.contains(&s.as_str()) {
                        Some(false)
                    } else {
                        None
                    }
                }
                _ => None,
            };
            flag.map(ParamValue::Flag).ok_or_else(|| {
                ParameterError::type_mismatch(name, "a boolean (true/false, yes/no, 1/0)", describe(raw))
            })
        }
    }
}

/// Hard range is fatal; soft range yields a warning.
fn check_range(spec: &ParameterSpec, value: f64) -> Result<Option<ParameterWarning>, ParameterError> {
    let Some(boundary) = &spec.boundary else {
        return Ok(None);
    };

    if !boundary.within_hard(value) {
        return Err(ParameterError::HardRangeViolation {
            parameter: spec.canonical_name.clone(),
            value,
            hard_min: boundary.hard_min,
            hard_max: boundary.hard_max,
            unit: spec.unit.clone(),
        });
    }

    if !boundary.within_soft(value) {
        return Ok(Some(ParameterWarning::SoftRangeViolation {
            parameter: spec.canonical_name.clone(),
            value,
            soft_min: boundary.soft_min,
            soft_max: boundary.soft_max,
            unit: spec.unit.clone(),
            literature_reference: boundary.literature_reference.clone(),
        }));
    }

    Ok(None)
}

fn describe(raw: &Value) -> String {
    match raw {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string \"{}\"", s),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}
