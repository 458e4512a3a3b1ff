//! Discovery Engine - answers "which tool do I need?" queries.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::error::DiscoveryError;
use super::index::DiscoveryIndex;
use super::response::{
    DimensionCount, DimensionListing, DiscoveryResponse, NextStep, RelatedTool,
    RelatedToolsResponse, ToolSchema, ToolSummary,
};
use crate::domains::catalog::{
    ClinicalContext, DimensionValue, Specialty, ToolDescriptor, ToolRegistry,
};

/// Default number of tools returned by keyword search.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;
/// Default number of related tools returned.
pub const DEFAULT_RELATED_LIMIT: usize = 10;

/// The dimension a `discover` query runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverBy {
    Specialty,
    Context,
    Condition,
    Icd10,
    Keyword,
}

impl DiscoverBy {
    pub const ALL: [DiscoverBy; 5] = [
        DiscoverBy::Specialty,
        DiscoverBy::Context,
        DiscoverBy::Condition,
        DiscoverBy::Icd10,
        DiscoverBy::Keyword,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Specialty => "specialty",
            Self::Context => "context",
            Self::Condition => "condition",
            Self::Icd10 => "icd10",
            Self::Keyword => "keyword",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DiscoveryError> {
        let normalized = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|by| by.as_str() == normalized)
            .ok_or_else(|| DiscoveryError::UnknownDimension(value.to_string()))
    }
}

/// Read-only query service over the registry and its index.
#[derive(Debug, Clone)]
pub struct DiscoveryEngine {
    registry: Arc<ToolRegistry>,
    index: Arc<DiscoveryIndex>,
    search_limit: usize,
    related_limit: usize,
}

impl DiscoveryEngine {
    /// Build the index for `registry`.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        let index = Arc::new(DiscoveryIndex::build(&registry));
        Self {
            registry,
            index,
            search_limit: DEFAULT_SEARCH_LIMIT,
            related_limit: DEFAULT_RELATED_LIMIT,
        }
    }

    /// Override the default result limits.
    pub fn with_limits(mut self, search_limit: usize, related_limit: usize) -> Self {
        self.search_limit = search_limit.max(1);
        self.related_limit = related_limit.max(1);
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Dispatch a `discover` query along `by`.
    pub fn discover(
        &self,
        by: DiscoverBy,
        value: &str,
        limit: Option<usize>,
    ) -> Result<DiscoveryResponse, DiscoveryError> {
        match by {
            DiscoverBy::Specialty => self.by_specialty(value),
            DiscoverBy::Context => self.by_context(value),
            DiscoverBy::Condition => Ok(self.by_condition(value)),
            DiscoverBy::Icd10 => Ok(self.by_icd10(value)),
            DiscoverBy::Keyword => Ok(self.search(value, limit)),
        }
    }

    /// Tools in one specialty, ordered by tool id.
    #[instrument(skip(self))]
    pub fn by_specialty(&self, value: &str) -> Result<DiscoveryResponse, DiscoveryError> {
        let specialty = Specialty::parse(value).ok_or_else(|| {
            DiscoveryError::unknown_value("specialty", value, Specialty::valid_options())
        })?;
        let tools = self.summaries_for(&DimensionValue::Specialty(specialty));
        Ok(DiscoveryResponse::new("specialty", value, tools.len(), tools))
    }

    /// Tools used in one clinical context, ordered by tool id.
    #[instrument(skip(self))]
    pub fn by_context(&self, value: &str) -> Result<DiscoveryResponse, DiscoveryError> {
        let context = ClinicalContext::parse(value).ok_or_else(|| {
            DiscoveryError::unknown_value("context", value, ClinicalContext::valid_options())
        })?;
        let tools = self.summaries_for(&DimensionValue::ClinicalContext(context));
        Ok(DiscoveryResponse::new("context", value, tools.len(), tools))
    }

    /// Tools tagged with a condition, case-insensitively.
    pub fn by_condition(&self, value: &str) -> DiscoveryResponse {
        let condition = value.trim().to_lowercase();
        let tools = self.summaries_for(&DimensionValue::Condition(condition));
        DiscoveryResponse::new("condition", value, tools.len(), tools)
    }

    /// Tools tagged with an ICD-10 code.
    ///
    /// A code without a subcategory (`N18`) also matches every tagged code
    /// below it (`N18.3`).
    pub fn by_icd10(&self, code: &str) -> DiscoveryResponse {
        let normalized = code.trim().to_uppercase();
        let category = format!("{}.", normalized);

        let mut tool_ids: Vec<&str> = self
            .index
            .entries()
            .filter_map(|(value, ids)| match value {
                DimensionValue::Icd10(tagged)
                    if *tagged == normalized || tagged.starts_with(&category) =>
                {
                    Some(ids)
                }
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect();
        tool_ids.sort_unstable();
        tool_ids.dedup();

        let tools: Vec<ToolSummary> = tool_ids
            .into_iter()
            .filter_map(|id| self.descriptor(id))
            .map(ToolSummary::of)
            .collect();
        DiscoveryResponse::new("icd10", code, tools.len(), tools)
    }

    /// Weighted keyword search.
    #[instrument(skip(self))]
    pub fn search(&self, query: &str, limit: Option<usize>) -> DiscoveryResponse {
        let hits = self.index.search(query);
        let count = hits.len();
        let limit = limit.unwrap_or(self.search_limit);

        let tools: Vec<ToolSummary> = hits
            .into_iter()
            .take(limit)
            .filter_map(|(id, score)| self.descriptor(id).map(|t| ToolSummary::scored(t, score)))
            .collect();

        debug!(count, returned = tools.len(), "Keyword search finished");
        DiscoveryResponse::new("keyword", query, count, tools)
    }

    /// Specialties present in the catalog with tool counts.
    pub fn list_specialties(&self) -> DimensionListing {
        let values = self.count_values(|value| match value {
            DimensionValue::Specialty(s) => Some(s.as_str()),
            _ => None,
        });
        DimensionListing::new("specialties", "specialty", values)
    }

    /// Clinical contexts present in the catalog with tool counts.
    pub fn list_contexts(&self) -> DimensionListing {
        let values = self.count_values(|value| match value {
            DimensionValue::ClinicalContext(c) => Some(c.as_str()),
            _ => None,
        });
        DimensionListing::new("clinical_contexts", "context", values)
    }

    /// Other tools sharing at least one discovery value with `tool_id`.
    ///
    /// Ranked by number of shared values, then tool id.
    #[instrument(skip(self))]
    pub fn get_related_tools(
        &self,
        tool_id: &str,
        limit: Option<usize>,
    ) -> Result<RelatedToolsResponse, DiscoveryError> {
        let own = self.registry.get(tool_id)?.high_level_key.dimension_values();

        let mut related: Vec<RelatedTool> = self
            .index
            .tools()
            .filter(|(other, _)| *other != tool_id)
            .filter_map(|(other, values)| {
                let shared: Vec<DimensionValue> = own.intersection(values).cloned().collect();
                if shared.is_empty() {
                    return None;
                }
                let descriptor = self.descriptor(other)?;
                Some(RelatedTool {
                    summary: ToolSummary::of(descriptor),
                    shared_count: shared.len(),
                    shared_values: shared,
                })
            })
            .collect();

        related.sort_by(|a, b| {
            b.shared_count
                .cmp(&a.shared_count)
                .then_with(|| a.summary.tool_id.cmp(&b.summary.tool_id))
        });

        let count = related.len();
        related.truncate(limit.unwrap_or(self.related_limit));

        let next_step = match related.first() {
            Some(best) => NextStep::get_tool_schema(&best.summary.tool_id),
            None => NextStep::list_specialties(),
        };

        Ok(RelatedToolsResponse {
            tool_id: tool_id.to_string(),
            count,
            related,
            next_step,
        })
    }

    /// Full parameter schema of one tool.
    pub fn tool_schema(&self, tool_id: &str) -> Result<ToolSchema, DiscoveryError> {
        Ok(ToolSchema::of(self.registry.get(tool_id)?))
    }

    fn descriptor(&self, tool_id: &str) -> Option<&ToolDescriptor> {
        self.registry.get(tool_id).ok()
    }

    fn summaries_for(&self, value: &DimensionValue) -> Vec<ToolSummary> {
        let ids: Vec<&str> = self.index.tools_with(value).collect();
        ids.into_iter()
            .filter_map(|id| self.descriptor(id))
            .map(ToolSummary::of)
            .collect()
    }

    fn count_values<F>(&self, select: F) -> Vec<DimensionCount>
    where
        F: Fn(&DimensionValue) -> Option<&'static str>,
    {
        let counts: BTreeMap<&'static str, usize> = self
            .index
            .entries()
            .filter_map(|(value, ids)| select(value).map(|name| (name, ids.len())))
            .collect();

        counts
            .into_iter()
            .map(|(value, tool_count)| DimensionCount {
                value: value.to_string(),
                tool_count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn engine() -> DiscoveryEngine {
        DiscoveryEngine::new(Arc::new(ToolRegistry::builtin().unwrap()))
    }

    fn ids(response: &DiscoveryResponse) -> Vec<&str> {
        response.tools.iter().map(|t| t.tool_id.as_str()).collect()
    }

    #[test]
    fn test_by_specialty_tolerates_formatting() {
        let engine = engine();
        let a = engine.by_specialty("critical_care").unwrap();
        let b = engine.by_specialty("Critical Care").unwrap();
        assert_eq!(ids(&a), ids(&b));
        assert!(ids(&a).contains(&"sofa_score"));

        let mut sorted = ids(&a);
        sorted.sort_unstable();
        assert_eq!(ids(&a), sorted);
    }

    #[test]
    fn test_unknown_specialty_lists_options() {
        let err = engine().by_specialty("astrology").unwrap_err();
        match err {
            DiscoveryError::UnknownDimensionValue { valid_options, .. } => {
                assert!(valid_options.contains(&"nephrology".to_string()));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_sepsis_search_ranks_core_scores_first() {
        let response = engine().search("sepsis", None);
        let top: Vec<_> = ids(&response).into_iter().take(3).collect();
        assert_eq!(top, vec!["news2_score", "qsofa_score", "sofa_score"]);
        assert!(ids(&response).contains(&"mean_arterial_pressure"));
        assert_eq!(response.query, "sepsis");
        assert_eq!(response.count, response.tools.len());
    }

    #[test]
    fn test_empty_search_points_to_specialties() {
        let response = engine().search("xylophone", None);
        assert_eq!(response.count, 0);
        assert!(response.tools.is_empty());
        assert_eq!(response.next_step.action, "list_specialties");
    }

    #[test]
    fn test_search_limit_keeps_total_count() {
        let response = engine().search("sepsis", Some(1));
        assert_eq!(response.tools.len(), 1);
        assert!(response.count > 1);
    }

    #[test]
    fn test_icd10_prefix() {
        let engine = engine();
        let response = engine.by_icd10("n18");
        assert!(ids(&response).contains(&"ckd_epi_2021"));
        assert!(engine.by_icd10("Z99.9").tools.is_empty());
    }

    #[test]
    fn test_icd10_echoes_query_as_given() {
        let response = engine().by_icd10(" n18 ");
        assert_eq!(response.query, " n18 ");
        assert!(ids(&response).contains(&"ckd_epi_2021"));
    }

    #[test]
    fn test_condition_lookup_is_open() {
        let engine = engine();
        assert!(ids(&engine.by_condition("Sepsis")).contains(&"qsofa_score"));
        assert!(engine.by_condition("dragon pox").tools.is_empty());
    }

    #[test]
    fn test_listings_count_tools() {
        let listing = engine().list_specialties();
        let critical = listing
            .values
            .iter()
            .find(|v| v.value == "critical_care")
            .unwrap();
        assert!(critical.tool_count >= 3);
        assert_eq!(listing.count, listing.values.len());
        assert!(engine().list_contexts().values.iter().any(|v| v.value == "triage"));
    }

    #[test]
    fn test_related_tools() {
        let engine = engine();
        let response = engine.get_related_tools("sofa_score", None).unwrap();
        assert!(response.related.iter().all(|r| r.summary.tool_id != "sofa_score"));
        assert!(response.related.iter().all(|r| r.shared_count > 0));
        let counts: Vec<_> = response.related.iter().map(|r| r.shared_count).collect();
        let mut sorted = counts.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(counts, sorted);

        assert!(matches!(
            engine.get_related_tools("nope", None),
            Err(DiscoveryError::Catalog(_))
        ));
    }

    #[test]
    fn test_tool_schema() {
        let schema = engine().tool_schema("mean_arterial_pressure").unwrap();
        assert_eq!(schema.parameters.len(), 2);
        assert_eq!(schema.cross_field_rules.len(), 1);
        assert_eq!(schema.next_step.action, "calculate");
    }

    #[test]
    fn test_discover_by_parse() {
        assert_eq!(DiscoverBy::parse("Keyword").unwrap(), DiscoverBy::Keyword);
        assert!(DiscoverBy::parse("color").is_err());
    }
}
