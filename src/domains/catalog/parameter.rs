//! Parameter schemas, clinical boundaries and cross-field rules.

use serde::Serialize;

/// The shape a parameter value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Numeric,
    Enum,
    Boolean,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Enum => "enum",
            Self::Boolean => "boolean",
        }
    }
}

/// Two-tier range for a numeric parameter.
///
/// Values outside `[hard_min, hard_max]` are physiologically impossible and
/// rejected. Values inside the hard range but outside `[soft_min, soft_max]`
/// are unusual and only produce a warning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundarySpec {
    pub hard_min: f64,
    pub hard_max: f64,
    pub soft_min: f64,
    pub soft_max: f64,
    pub literature_reference: String,
}

impl BoundarySpec {
    pub fn new(hard: (f64, f64), soft: (f64, f64), literature_reference: impl Into<String>) -> Self {
        Self {
            hard_min: hard.0,
            hard_max: hard.1,
            soft_min: soft.0,
            soft_max: soft.1,
            literature_reference: literature_reference.into(),
        }
    }

    /// `hard_min <= soft_min <= soft_max <= hard_max`, all finite.
    pub fn is_consistent(&self) -> bool {
        [self.hard_min, self.hard_max, self.soft_min, self.soft_max]
            .iter()
            .all(|v| v.is_finite())
            && self.hard_min <= self.soft_min
            && self.soft_min <= self.soft_max
            && self.soft_max <= self.hard_max
    }

    pub fn within_hard(&self, value: f64) -> bool {
        value >= self.hard_min && value <= self.hard_max
    }

    pub fn within_soft(&self, value: f64) -> bool {
        value >= self.soft_min && value <= self.soft_max
    }
}

/// Schema of a single calculator input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub canonical_name: String,
    /// Alternate accepted names, stored lowercase.
    pub aliases: Vec<String>,
    pub value_kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary: Option<BoundarySpec>,
    pub description: String,
}

impl ParameterSpec {
    fn new(canonical_name: &str, value_kind: ValueKind) -> Self {
        Self {
            canonical_name: canonical_name.to_string(),
            aliases: Vec::new(),
            value_kind,
            unit: None,
            required: true,
            enum_values: Vec::new(),
            boundary: None,
            description: String::new(),
        }
    }

    /// A required numeric parameter measured in `unit`.
    pub fn numeric(canonical_name: &str, unit: &str) -> Self {
        let mut spec = Self::new(canonical_name, ValueKind::Numeric);
        if !unit.is_empty() {
            spec.unit = Some(unit.to_string());
        }
        spec
    }

    /// A required parameter restricted to `values`.
    pub fn choice(canonical_name: &str, values: &[&str]) -> Self {
        let mut spec = Self::new(canonical_name, ValueKind::Enum);
        spec.enum_values = values.iter().map(|v| v.to_string()).collect();
        spec
    }

    /// A required yes/no parameter.
    pub fn flag(canonical_name: &str) -> Self {
        Self::new(canonical_name, ValueKind::Boolean)
    }

    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases
            .extend(aliases.iter().map(|a| a.trim().to_lowercase()));
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn bounded(mut self, boundary: BoundarySpec) -> Self {
        self.boundary = Some(boundary);
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// The canonical name followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical_name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Whether `key` names this parameter, ignoring case.
    pub fn answers_to(&self, key: &str) -> bool {
        self.names().any(|name| name.eq_ignore_ascii_case(key))
    }
}

/// Relational operator used by cross-field rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparison {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
        }
    }

    pub fn holds(&self, left: f64, right: f64) -> bool {
        match self {
            Self::GreaterThan => left > right,
            Self::GreaterOrEqual => left >= right,
            Self::LessThan => left < right,
            Self::LessOrEqual => left <= right,
        }
    }
}

/// Relational invariant between two numeric parameters of one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossFieldRule {
    pub left: String,
    pub comparison: Comparison,
    pub right: String,
    pub description: String,
}

impl CrossFieldRule {
    pub fn new(left: &str, comparison: Comparison, right: &str, description: &str) -> Self {
        Self {
            left: left.to_string(),
            comparison,
            right: right.to_string(),
            description: description.to_string(),
        }
    }

    /// Rendered as `left > right`.
    pub fn expression(&self) -> String {
        format!("{} {} {}", self.left, self.comparison.symbol(), self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_consistency() {
        assert!(BoundarySpec::new((0.0, 10.0), (2.0, 8.0), "ref").is_consistent());
        assert!(BoundarySpec::new((0.0, 10.0), (0.0, 10.0), "ref").is_consistent());
        assert!(!BoundarySpec::new((0.0, 10.0), (2.0, 12.0), "ref").is_consistent());
        assert!(!BoundarySpec::new((5.0, 1.0), (2.0, 3.0), "ref").is_consistent());
        assert!(!BoundarySpec::new((0.0, f64::INFINITY), (2.0, 3.0), "ref").is_consistent());
    }

    #[test]
    fn test_boundary_ranges_are_inclusive() {
        let b = BoundarySpec::new((100.0, 200.0), (135.0, 145.0), "ref");
        assert!(b.within_hard(100.0));
        assert!(b.within_hard(200.0));
        assert!(!b.within_hard(200.001));
        assert!(b.within_soft(145.0));
        assert!(!b.within_soft(145.001));
    }

    #[test]
    fn test_aliases_are_lowercased() {
        let spec = ParameterSpec::numeric("serum_creatinine", "mg/dL").aliases(&["Cr", "SCr"]);
        assert_eq!(spec.aliases, vec!["cr", "scr"]);
        assert!(spec.answers_to("CR"));
        assert!(spec.answers_to("Serum_Creatinine"));
        assert!(!spec.answers_to("creat"));
    }

    #[test]
    fn test_builders() {
        let spec = ParameterSpec::choice("sex", &["male", "female"]).optional();
        assert_eq!(spec.value_kind, ValueKind::Enum);
        assert!(!spec.required);
        assert_eq!(spec.enum_values.len(), 2);

        let flag = ParameterSpec::flag("confusion");
        assert_eq!(flag.value_kind, ValueKind::Boolean);
        assert!(flag.unit.is_none());
    }

    #[test]
    fn test_comparison() {
        let rule = CrossFieldRule::new(
            "systolic_bp",
            Comparison::GreaterThan,
            "diastolic_bp",
            "Systolic pressure must exceed diastolic pressure",
        );
        assert_eq!(rule.expression(), "systolic_bp > diastolic_bp");
        assert!(rule.comparison.holds(120.0, 80.0));
        assert!(!rule.comparison.holds(80.0, 80.0));
        assert!(Comparison::LessOrEqual.holds(80.0, 80.0));
    }
}
