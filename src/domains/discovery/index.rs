//! Discovery Index - inverted index over the registry.
//!
//! Built once from `ToolRegistry::all()` and read-only afterwards. It holds:
//!
//! - every discovery value mapped to the ordered set of tool ids carrying it
//! - every tool's full set of discovery values (for related-tool queries)
//! - one pre-lowercased search document per tool (for keyword search)

use std::collections::{BTreeMap, BTreeSet};

use crate::domains::catalog::{DimensionValue, ToolRegistry};

/// Search weights, summed per query token.
pub const TOOL_ID_WEIGHT: u32 = 100;
pub const NAME_WEIGHT: u32 = 40;
pub const KEYWORD_WEIGHT: u32 = 25;
pub const CONDITION_WEIGHT: u32 = 15;
pub const PURPOSE_WEIGHT: u32 = 5;

/// Lowercase and split on anything that is not alphanumeric.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn token_set<'a>(phrases: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    phrases.into_iter().flat_map(|p| tokenize(p)).collect()
}

/// Pre-tokenized text of one tool.
#[derive(Debug, Clone, Default)]
struct SearchDocument {
    tool_id: String,
    name: BTreeSet<String>,
    keywords: BTreeSet<String>,
    /// Conditions and clinical questions.
    conditions: BTreeSet<String>,
    purpose: String,
}

impl SearchDocument {
    fn score(&self, query: &str, tokens: &BTreeSet<String>) -> u32 {
        let mut score = 0;

        let as_id = query.trim().to_lowercase().replace([' ', '-'], "_");
        if as_id == self.tool_id {
            score += TOOL_ID_WEIGHT;
        }

        for token in tokens {
            if self.name.contains(token) {
                score += NAME_WEIGHT;
            }
            if self.keywords.contains(token) {
                score += KEYWORD_WEIGHT;
            }
            if self.conditions.contains(token) {
                score += CONDITION_WEIGHT;
            }
            if self.purpose.contains(token.as_str()) {
                score += PURPOSE_WEIGHT;
            }
        }

        score
    }
}

/// Inverted index over every tool's high-level key.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryIndex {
    by_value: BTreeMap<DimensionValue, BTreeSet<String>>,
    values_by_tool: BTreeMap<String, BTreeSet<DimensionValue>>,
    documents: Vec<SearchDocument>,
}

impl DiscoveryIndex {
    /// Index every tool in `registry`.
    pub fn build(registry: &ToolRegistry) -> Self {
        let mut index = Self::default();

        for tool in registry.all() {
            let key = &tool.high_level_key;
            let values = key.dimension_values();

            for value in &values {
                index
                    .by_value
                    .entry(value.clone())
                    .or_default()
                    .insert(tool.tool_id.clone());
            }
            index.values_by_tool.insert(tool.tool_id.clone(), values);

            index.documents.push(SearchDocument {
                tool_id: tool.tool_id.clone(),
                name: token_set([&tool.name]),
                keywords: token_set(&key.keywords),
                conditions: token_set(key.conditions.iter().chain(&key.clinical_questions)),
                purpose: tool.purpose.to_lowercase(),
            });
        }

        index
    }

    /// Tool ids carrying `value`, ordered.
    pub fn tools_with(&self, value: &DimensionValue) -> impl Iterator<Item = &str> {
        self.by_value
            .get(value)
            .into_iter()
            .flat_map(|ids| ids.iter().map(String::as_str))
    }

    /// Every indexed value with its tool ids, ordered by value.
    pub fn entries(&self) -> impl Iterator<Item = (&DimensionValue, &BTreeSet<String>)> {
        self.by_value.iter()
    }

    /// Every tool id with its discovery values, ordered by tool id.
    pub fn tools(&self) -> impl Iterator<Item = (&str, &BTreeSet<DimensionValue>)> {
        self.values_by_tool.iter().map(|(id, v)| (id.as_str(), v))
    }

    /// Score every tool against `query`; zero scores are dropped.
    ///
    /// Ordered by descending score, then tool id.
    pub fn search(&self, query: &str) -> Vec<(&str, u32)> {
        let tokens: BTreeSet<String> = tokenize(query).into_iter().collect();

        let mut hits: Vec<(&str, u32)> = self
            .documents
            .iter()
            .map(|doc| (doc.tool_id.as_str(), doc.score(query, &tokens)))
            .filter(|(_, score)| *score > 0)
            .collect();

        hits.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::catalog::{
        BoundParams, CalculatorError, CalculatorOutput, HighLevelKey, Interpretation, Reference,
        Severity, Specialty, ToolDescriptor,
    };

    fn noop(_: &BoundParams) -> Result<CalculatorOutput, CalculatorError> {
        Ok(CalculatorOutput::new(0.0, "", Interpretation::new(Severity::Normal, "")))
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::from_descriptors([
            ToolDescriptor::new("alpha_score", "Alpha Score", "Scores alpha in sepsis", noop)
                .with_key(
                    HighLevelKey::new()
                        .specialties([Specialty::CriticalCare])
                        .keywords(["sepsis"]),
                )
                .with_references(vec![Reference::new("ref")]),
            ToolDescriptor::new("beta_index", "Beta Index", "Beta things", noop)
                .with_key(
                    HighLevelKey::new()
                        .specialties([Specialty::CriticalCare, Specialty::Nephrology])
                        .conditions(["sepsis"]),
                )
                .with_references(vec![Reference::new("ref")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("CURB-65 score"), vec!["curb", "65", "score"]);
        assert!(tokenize("  --  ").is_empty());
    }

    #[test]
    fn test_inverted_lookup() {
        let index = DiscoveryIndex::build(&registry());
        let ids: Vec<_> = index
            .tools_with(&DimensionValue::Specialty(Specialty::CriticalCare))
            .collect();
        assert_eq!(ids, vec!["alpha_score", "beta_index"]);
        assert_eq!(
            index
                .tools_with(&DimensionValue::Specialty(Specialty::Cardiology))
                .count(),
            0
        );
    }

    #[test]
    fn test_search_weights() {
        let index = DiscoveryIndex::build(&registry());
        let hits = index.search("sepsis");
        // keyword + purpose beats condition
        assert_eq!(hits, vec![("alpha_score", 30), ("beta_index", 15)]);

        let hits = index.search("alpha score");
        assert_eq!(hits[0], ("alpha_score", 100 + 40 + 40 + 5 + 5));
    }

    #[test]
    fn test_search_without_hits() {
        let index = DiscoveryIndex::build(&registry());
        assert!(index.search("zebra").is_empty());
        assert!(index.search("").is_empty());
    }
}
