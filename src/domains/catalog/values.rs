//! Validated parameter values handed to a calculator.

use serde::Serialize;
use std::collections::BTreeMap;

use super::definition::CalculatorError;

/// A single value after type checking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    /// An enum value in its canonical spelling.
    Choice(String),
    Flag(bool),
}

impl ParamValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "numeric",
            Self::Choice(_) => "enum",
            Self::Flag(_) => "boolean",
        }
    }
}

/// Canonical parameter name to validated value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BoundParams(BTreeMap<String, ParamValue>);

impl BoundParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    pub fn number(&self, name: &str) -> Result<f64, CalculatorError> {
        self.optional_number(name)?
            .ok_or_else(|| CalculatorError::missing_input(name))
    }

    pub fn optional_number(&self, name: &str) -> Result<Option<f64>, CalculatorError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(ParamValue::Number(n)) => Ok(Some(*n)),
            Some(other) => Err(CalculatorError::wrong_kind(name, "numeric", other.kind_name())),
        }
    }

    pub fn choice(&self, name: &str) -> Result<&str, CalculatorError> {
        self.optional_choice(name)?
            .ok_or_else(|| CalculatorError::missing_input(name))
    }

    pub fn optional_choice(&self, name: &str) -> Result<Option<&str>, CalculatorError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(ParamValue::Choice(c)) => Ok(Some(c.as_str())),
            Some(other) => Err(CalculatorError::wrong_kind(name, "enum", other.kind_name())),
        }
    }

    pub fn flag(&self, name: &str) -> Result<bool, CalculatorError> {
        match self.0.get(name) {
            None => Err(CalculatorError::missing_input(name)),
            Some(ParamValue::Flag(b)) => Ok(*b),
            Some(other) => Err(CalculatorError::wrong_kind(name, "boolean", other.kind_name())),
        }
    }

    /// An optional flag, `default` when absent.
    pub fn flag_or(&self, name: &str, default: bool) -> Result<bool, CalculatorError> {
        if self.contains(name) {
            self.flag(name)
        } else {
            Ok(default)
        }
    }
}

impl FromIterator<(String, ParamValue)> for BoundParams {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
