//! Parameter Matcher - binds caller-supplied keys to canonical parameters.
//!
//! Resolution for each supplied key, first success wins:
//!
//! 1. exact canonical name
//! 2. case-insensitive canonical name or alias
//! 3. `name + "_" + unit_token` with the unit suffix stripped, then 1-2
//! 4. fuzzy similarity against every parameter; a key closest to one that is
//!    already bound is reported as a duplicate
//!
//! Steps 1-3 run for every key before any fuzzy matching, and keys are always
//! visited in lexical order, so the outcome never depends on map iteration
//! order.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use super::error::{AmbiguousKey, MissingField, ParameterError, ParameterWarning};
use super::similarity::{self, Candidate, FuzzyDecision, FuzzyThresholds};
use crate::domains::catalog::ParameterSpec;

/// Spelling variants for common units beyond their mechanical snake_case form.
const UNIT_SYNONYMS: &[(&str, &[&str])] = &[
    ("years", &["yrs", "yr", "y"]),
    ("%", &["pct", "percent"]),
    ("mEq/L", &["mmol_l", "mmoll"]),
    ("x10^3/uL", &["k_ul", "10_9_l", "thousand"]),
    ("beats/min", &["bpm"]),
    ("°C", &["celsius", "degc"]),
];

/// Suffix tokens a caller may append to a parameter name for `unit`.
///
/// `mg/dL` yields `mg_dl` and `mgdl`; known units add their usual spellings.
pub fn unit_tokens(unit: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    let mut snake = String::new();
    for c in unit.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            snake.push(c);
        } else if !snake.ends_with('_') {
            snake.push('_');
        }
    }
    let snake = snake.trim_matches('_').to_string();

    if !snake.is_empty() {
        let compact = snake.replace('_', "");
        tokens.push(snake);
        tokens.push(compact);
    }

    for (known, synonyms) in UNIT_SYNONYMS {
        if known.eq_ignore_ascii_case(unit) {
            tokens.extend(synonyms.iter().map(|s| s.to_string()));
        }
    }

    tokens.sort();
    tokens.dedup();
    tokens
}

/// How a supplied key was resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    Alias,
    UnitSuffix { unit_token: String },
    Fuzzy { similarity: f64 },
}

/// A supplied key bound to a canonical parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub supplied_key: String,
    pub value: Value,
    pub method: MatchMethod,
}

/// Everything the matcher learned about one input map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    /// Canonical name to binding.
    pub bindings: BTreeMap<String, Binding>,
    pub warnings: Vec<ParameterWarning>,
    /// Required parameters left unbound, in schema order.
    pub missing: Vec<MissingField>,
    pub ambiguous: Vec<AmbiguousKey>,
}

impl MatchOutcome {
    /// The fatal error for unbound required parameters, if any.
    ///
    /// Ambiguous keys that could have supplied a missing parameter are
    /// reported as ambiguity rather than absence, since the caller did try.
    /// The full missing list travels with either error.
    pub fn unbound_error(&self, tool_id: &str) -> Option<ParameterError> {
        if self.missing.is_empty() {
            return None;
        }

        let culprits: Vec<AmbiguousKey> = self
            .ambiguous
            .iter()
            .filter(|a| {
                a.candidates
                    .iter()
                    .any(|c| self.missing.iter().any(|m| &m.canonical_name == c))
            })
            .cloned()
            .collect();

        Some(if culprits.is_empty() {
            ParameterError::MissingParameter {
                tool_id: tool_id.to_string(),
                missing: self.missing.clone(),
            }
        } else {
            ParameterError::AmbiguousParameter {
                tool_id: tool_id.to_string(),
                ambiguous: culprits,
                missing: self.missing.clone(),
            }
        })
    }
}

/// Resolves caller keys against a tool's parameter schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterMatcher {
    thresholds: FuzzyThresholds,
}

impl ParameterMatcher {
    /// Bind `supplied` onto `specs`.
    pub fn bind(&self, specs: &[ParameterSpec], supplied: &Map<String, Value>) -> MatchOutcome {
        let mut outcome = MatchOutcome::default();

        let mut keys: Vec<(&String, &Value)> = supplied.iter().collect();
        keys.sort_by(|a, b| a.0.cmp(b.0));

        let mut pending = Vec::new();
        for (key, value) in keys {
            match resolve_deterministic(specs, key) {
                Some((spec, method)) => bind_key(&mut outcome, spec, key, value, method),
                None => pending.push((key, value)),
            }
        }

        for (key, value) in pending {
            match self.thresholds.decide(&rank(key, specs)) {
                FuzzyDecision::Accept(candidate) => {
                    let Some(spec) = specs
                        .iter()
                        .find(|s| s.canonical_name == candidate.canonical_name)
                    else {
                        continue;
                    };
                    // The closest parameter wins even when it is already bound.
                    if !outcome.bindings.contains_key(&spec.canonical_name) {
                        debug!(
                            key = %key,
                            canonical = %candidate.canonical_name,
                            similarity = candidate.similarity,
                            "Fuzzy-matched parameter"
                        );
                        outcome.warnings.push(ParameterWarning::FuzzyMatched {
                            key: key.clone(),
                            canonical_name: candidate.canonical_name.clone(),
                            similarity: candidate.similarity,
                        });
                    }
                    bind_key(
                        &mut outcome,
                        spec,
                        key,
                        value,
                        MatchMethod::Fuzzy {
                            similarity: candidate.similarity,
                        },
                    );
                }
                FuzzyDecision::Ambiguous(candidates) => {
                    let candidates: Vec<String> =
                        candidates.into_iter().map(|c| c.canonical_name).collect();
                    debug!(key = %key, ?candidates, "Refused ambiguous parameter");
                    outcome.warnings.push(ParameterWarning::AmbiguousParameter {
                        key: key.clone(),
                        candidates: candidates.clone(),
                    });
                    outcome.ambiguous.push(AmbiguousKey {
                        key: key.clone(),
                        candidates,
                    });
                }
                FuzzyDecision::NoMatch => {
                    outcome.warnings.push(ParameterWarning::UnrecognizedParameter {
                        key: key.clone(),
                        accepted: specs.iter().map(|s| s.canonical_name.clone()).collect(),
                    });
                }
            }
        }

        outcome.missing = specs
            .iter()
            .filter(|s| s.required && !outcome.bindings.contains_key(&s.canonical_name))
            .map(|s| MissingField {
                canonical_name: s.canonical_name.clone(),
                aliases: s.aliases.clone(),
                unit: s.unit.clone(),
                value_kind: s.value_kind.as_str(),
            })
            .collect();

        outcome
    }
}

fn bind_key(
    outcome: &mut MatchOutcome,
    spec: &ParameterSpec,
    key: &str,
    value: &Value,
    method: MatchMethod,
) {
    if let Some(existing) = outcome.bindings.get(&spec.canonical_name) {
        outcome.warnings.push(ParameterWarning::DuplicateParameter {
            key: key.to_string(),
            canonical_name: spec.canonical_name.clone(),
            bound_from: existing.supplied_key.clone(),
        });
        return;
    }

    outcome.bindings.insert(
        spec.canonical_name.clone(),
        Binding {
            supplied_key: key.to_string(),
            value: value.clone(),
            method,
        },
    );
}

/// Steps 1-3: exact, case-insensitive alias, unit-suffix stripping.
fn resolve_deterministic<'a>(
    specs: &'a [ParameterSpec],
    key: &str,
) -> Option<(&'a ParameterSpec, MatchMethod)> {
    if let Some(spec) = specs.iter().find(|s| s.canonical_name == key) {
        return Some((spec, MatchMethod::Exact));
    }

    if let Some(spec) = specs.iter().find(|s| s.answers_to(key)) {
        return Some((spec, MatchMethod::Alias));
    }

    let lowered = key.to_lowercase();
    specs.iter().find_map(|spec| {
        let unit = spec.unit.as_deref()?;
        unit_tokens(unit).into_iter().find_map(|token| {
            let stem = lowered.strip_suffix(token.as_str())?.strip_suffix('_')?;
            spec.answers_to(stem)
                .then(|| (spec, MatchMethod::UnitSuffix { unit_token: token.clone() }))
        })
    })
}

/// Best similarity per parameter, best first, ties broken by canonical name.
fn rank(key: &str, specs: &[ParameterSpec]) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = specs
        .iter()
        .filter_map(|spec| {
            spec.names()
                .map(|name| (name, similarity::similarity(key, name)))
                .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(a.0)))
                .map(|(name, score)| Candidate {
                    canonical_name: spec.canonical_name.clone(),
                    matched_name: name.to_string(),
                    similarity: score,
                })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.canonical_name.cmp(&b.canonical_name))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn schema() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::numeric("serum_creatinine", "mg/dL").aliases(&["cr", "creatinine", "scr"]),
            ParameterSpec::numeric("age", "years"),
            ParameterSpec::choice("sex", &["male", "female"]).aliases(&["gender"]),
            ParameterSpec::numeric("hemoglobin", "g/dL").optional(),
        ]
    }

    fn supplied(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_unit_tokens() {
        assert_eq!(unit_tokens("mg/dL"), vec!["mg_dl", "mgdl"]);
        assert!(unit_tokens("years").contains(&"yrs".to_string()));
        assert!(unit_tokens("°C").contains(&"c".to_string()));
        assert!(unit_tokens("%").contains(&"pct".to_string()));
    }

    #[test]
    fn test_exact_names_bind() {
        let outcome = ParameterMatcher::default().bind(
            &schema(),
            &supplied(json!({"serum_creatinine": 1.2, "age": 65, "sex": "female"})),
        );
        assert_eq!(outcome.bindings.len(), 3);
        assert!(outcome.warnings.is_empty());
        assert!(outcome.missing.is_empty());
        assert_eq!(outcome.bindings["age"].method, MatchMethod::Exact);
    }

    #[test]
    fn test_aliases_bind_case_insensitively() {
        let outcome = ParameterMatcher::default().bind(
            &schema(),
            &supplied(json!({"Cr": 1.2, "AGE": 65, "Gender": "female"})),
        );
        assert_eq!(outcome.bindings["serum_creatinine"].supplied_key, "Cr");
        assert_eq!(outcome.bindings["serum_creatinine"].method, MatchMethod::Alias);
        assert_eq!(outcome.bindings["sex"].method, MatchMethod::Alias);
        assert!(outcome.missing.is_empty());
    }

    #[test]
    fn test_unit_suffix_is_stripped() {
        let outcome = ParameterMatcher::default().bind(
            &schema(),
            &supplied(json!({"age_years": 65, "cr_mg_dl": 1.2, "sex": "male"})),
        );
        assert_eq!(
            outcome.bindings["age"].method,
            MatchMethod::UnitSuffix { unit_token: "years".to_string() }
        );
        assert_eq!(outcome.bindings["serum_creatinine"].supplied_key, "cr_mg_dl");
        assert!(outcome.missing.is_empty());
    }

    #[test]
    fn test_typo_fuzzy_matches_with_warning() {
        let outcome = ParameterMatcher::default().bind(
            &schema(),
            &supplied(json!({"serum_creatinin": 1.2, "age": 65, "sex": "male", "hemoglobn": 13})),
        );
        assert!(matches!(
            outcome.bindings["hemoglobin"].method,
            MatchMethod::Fuzzy { .. }
        ));
        assert!(matches!(
            outcome.bindings["serum_creatinine"].method,
            MatchMethod::Fuzzy { .. }
        ));
        assert_eq!(
            outcome
                .warnings
                .iter()
                .filter(|w| w.code() == "FUZZY_MATCHED")
                .count(),
            2
        );
    }

    #[test]
    fn test_stage_is_not_age() {
        let outcome = ParameterMatcher::default().bind(
            &schema(),
            &supplied(json!({"stage": 3, "cr": 1.0, "sex": "male"})),
        );
        assert!(!outcome.bindings.contains_key("age"));
        assert!(matches!(
            &outcome.warnings[0],
            ParameterWarning::UnrecognizedParameter { key, .. } if key == "stage"
        ));
        assert_eq!(outcome.missing.len(), 1);
        assert_eq!(outcome.missing[0].canonical_name, "age");
    }

    #[test]
    fn test_two_close_parameters_are_ambiguous() {
        let specs = vec![
            ParameterSpec::numeric("hdl_cholesterol", "mg/dL"),
            ParameterSpec::numeric("ldl_cholesterol", "mg/dL"),
        ];
        let outcome =
            ParameterMatcher::default().bind(&specs, &supplied(json!({"dl_cholesterol": 120})));

        assert!(outcome.bindings.is_empty());
        assert_eq!(outcome.ambiguous.len(), 1);
        assert_eq!(
            outcome.ambiguous[0].candidates,
            vec!["hdl_cholesterol", "ldl_cholesterol"]
        );
        assert!(matches!(
            outcome.unbound_error("lipids"),
            Some(ParameterError::AmbiguousParameter { ambiguous, .. })
                if ambiguous[0].key == "dl_cholesterol"
        ));
    }

    #[test]
    fn test_ambiguity_error_keeps_other_missing_fields() {
        let specs = vec![
            ParameterSpec::numeric("hdl_cholesterol", "mg/dL"),
            ParameterSpec::numeric("ldl_cholesterol", "mg/dL"),
            ParameterSpec::numeric("triglycerides", "mg/dL"),
        ];
        let outcome =
            ParameterMatcher::default().bind(&specs, &supplied(json!({"dl_cholesterol": 50})));

        let Some(ParameterError::AmbiguousParameter { ambiguous, missing, .. }) =
            outcome.unbound_error("lipids")
        else {
            panic!("expected an ambiguity error");
        };
        assert_eq!(ambiguous.len(), 1);
        let names: Vec<_> = missing.iter().map(|m| m.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["hdl_cholesterol", "ldl_cholesterol", "triglycerides"]);
    }

    #[test]
    fn test_typo_of_bound_parameter_does_not_fill_its_neighbour() {
        let specs = vec![
            ParameterSpec::numeric("hdl_cholesterol", "mg/dL"),
            ParameterSpec::numeric("ldl_cholesterol", "mg/dL"),
            ParameterSpec::numeric("triglycerides", "mg/dL"),
        ];
        let outcome = ParameterMatcher::default().bind(
            &specs,
            &supplied(json!({"hdl_cholesterol": 50, "hdl_cholesterl": 55, "triglycerides": 100})),
        );

        assert!(!outcome.bindings.contains_key("ldl_cholesterol"));
        assert_eq!(outcome.bindings["hdl_cholesterol"].supplied_key, "hdl_cholesterol");
        assert_eq!(outcome.missing.len(), 1);
        assert_eq!(outcome.missing[0].canonical_name, "ldl_cholesterol");
        assert!(outcome.warnings.iter().any(|w| matches!(
            w,
            ParameterWarning::DuplicateParameter { key, .. }
                | ParameterWarning::AmbiguousParameter { key, .. } if key == "hdl_cholesterl"
        )));
    }

    #[test]
    fn test_fuzzy_hit_on_bound_parameter_is_duplicate() {
        let outcome = ParameterMatcher::default().bind(
            &schema(),
            &supplied(json!({"serum_creatinine": 1.2, "serum_creatinin": 1.4, "age": 65, "sex": "male"})),
        );

        assert_eq!(outcome.bindings["serum_creatinine"].supplied_key, "serum_creatinine");
        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(
            &outcome.warnings[0],
            ParameterWarning::DuplicateParameter { key, bound_from, .. }
                if key == "serum_creatinin" && bound_from == "serum_creatinine"
        ));
    }

    #[test]
    fn test_missing_lists_aliases() {
        let outcome = ParameterMatcher::default().bind(&schema(), &supplied(json!({"age": 50})));
        let names: Vec<_> = outcome.missing.iter().map(|m| m.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["serum_creatinine", "sex"]);
        assert_eq!(outcome.missing[0].aliases, vec!["cr", "creatinine", "scr"]);
        assert!(matches!(
            outcome.unbound_error("ckd_epi_2021"),
            Some(ParameterError::MissingParameter { .. })
        ));
    }

    #[test]
    fn test_duplicate_resolution_warns() {
        let outcome = ParameterMatcher::default().bind(
            &schema(),
            &supplied(json!({"cr": 1.1, "creatinine": 1.3, "age": 40, "sex": "male"})),
        );
        assert_eq!(outcome.bindings["serum_creatinine"].supplied_key, "cr");
        assert!(matches!(
            &outcome.warnings[0],
            ParameterWarning::DuplicateParameter { key, bound_from, .. }
                if key == "creatinine" && bound_from == "cr"
        ));
    }

    proptest! {
        #[test]
        fn prop_binding_is_deterministic(
            keys in proptest::collection::vec("[a-z_]{1,16}", 0..6)
        ) {
            let map: Map<String, Value> = keys.iter().map(|k| (k.clone(), json!(1))).collect();
            let matcher = ParameterMatcher::default();
            prop_assert_eq!(matcher.bind(&schema(), &map), matcher.bind(&schema(), &map));
        }
    }
}
