//! Calculate Use Case - matcher, validator, formula, result.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::error::CalculationError;
use super::result::{BatchItem, BatchItemResult, CalculationResult, ResolvedParameter};
use crate::domains::catalog::ToolRegistry;
use crate::domains::parameters::{BoundaryValidator, ParameterMatcher};

/// Default upper bound on batch size.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 50;

/// Runs calculations against an immutable registry.
#[derive(Debug, Clone)]
pub struct CalculateUseCase {
    registry: Arc<ToolRegistry>,
    matcher: ParameterMatcher,
    validator: BoundaryValidator,
    max_batch_size: usize,
}

impl CalculateUseCase {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            matcher: ParameterMatcher::default(),
            validator: BoundaryValidator::new(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size.max(1);
        self
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Run one calculation.
    ///
    /// Fatal errors are reported in this order: type and hard-range errors on
    /// supplied values, then missing or ambiguous parameters, then cross-field
    /// rules.
    #[instrument(skip(self, raw_params), fields(keys = raw_params.len()))]
    pub fn execute(
        &self,
        tool_id: &str,
        raw_params: &Map<String, Value>,
    ) -> Result<CalculationResult, CalculationError> {
        let tool = self.registry.get(tool_id)?;

        let outcome = self.matcher.bind(&tool.parameter_specs, raw_params);
        let fields = self
            .validator
            .validate_fields(&tool.parameter_specs, &outcome.bindings)?;
        if let Some(err) = outcome.unbound_error(tool_id) {
            debug!(code = err.code(), "Parameters unresolved");
            return Err(err.into());
        }
        self.validator
            .check_rules(&tool.cross_field_rules, &fields.params)?;

        let output = tool.calculate(&fields.params).map_err(|err| {
            warn!(error = %err, "Calculator failed");
            CalculationError::internal(tool_id, err.to_string())
        })?;

        if !output.value.is_finite() {
            warn!(value = output.value, "Calculator produced a non-finite value");
            return Err(CalculationError::internal(
                tool_id,
                format!("result is not a finite number ({})", output.value),
            ));
        }
        if let Some((name, value)) = output.components.iter().find(|(_, v)| !v.is_finite()) {
            return Err(CalculationError::internal(
                tool_id,
                format!("component '{}' is not a finite number ({})", name, value),
            ));
        }

        let mut warnings = outcome.warnings;
        warnings.extend(fields.warnings);

        let resolved_parameters = tool
            .parameter_specs
            .iter()
            .filter_map(|spec| {
                outcome
                    .bindings
                    .get(&spec.canonical_name)
                    .map(|binding| ResolvedParameter {
                        canonical_name: spec.canonical_name.clone(),
                        supplied_key: binding.supplied_key.clone(),
                        method: binding.method.clone(),
                    })
            })
            .collect();

        debug!(value = output.value, warnings = warnings.len(), "Calculation finished");

        Ok(CalculationResult {
            tool_id: tool.tool_id.clone(),
            tool_name: tool.name.clone(),
            value: output.value,
            unit: output.unit,
            interpretation: output.interpretation,
            components: output.components,
            references: tool.references.clone(),
            warnings,
            resolved_parameters,
        })
    }

    /// Run every item independently, preserving order.
    ///
    /// Only an empty or oversized batch fails as a whole.
    #[instrument(skip(self, items), fields(size = items.len()))]
    pub fn execute_batch(&self, items: &[BatchItem]) -> Result<Vec<BatchItemResult>, CalculationError> {
        if items.is_empty() {
            return Err(CalculationError::EmptyBatch);
        }
        if items.len() > self.max_batch_size {
            warn!(max = self.max_batch_size, "Rejected oversized batch");
            return Err(CalculationError::BatchTooLarge {
                size: items.len(),
                max: self.max_batch_size,
            });
        }

        let results: Vec<BatchItemResult> = items
            .iter()
            .enumerate()
            .map(|(index, item)| BatchItemResult {
                index,
                tool_id: item.tool_id.clone(),
                outcome: self.execute(&item.tool_id, &item.params),
            })
            .collect();

        let failed = results.iter().filter(|r| !r.is_ok()).count();
        info!(succeeded = results.len() - failed, failed, "Batch finished");
        Ok(results)
    }
}
