//! Shared state handed to every tool route.

use std::sync::Arc;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::domains::calculation::CalculateUseCase;
use crate::domains::catalog::ToolRegistry;
use crate::domains::discovery::DiscoveryEngine;

/// The registry plus the two services built on top of it.
///
/// Built once at startup and shared read-only through `Arc`.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub discovery: DiscoveryEngine,
    pub calculation: CalculateUseCase,
}

impl ToolContext {
    /// Wire both services to `registry`, applying the configured limits.
    pub fn new(registry: Arc<ToolRegistry>, config: &Config) -> Self {
        let discovery = DiscoveryEngine::new(registry.clone()).with_limits(
            config.discovery.default_limit,
            config.discovery.related_limit,
        );
        let calculation =
            CalculateUseCase::new(registry).with_max_batch_size(config.calculation.max_batch_size);
        Self {
            discovery,
            calculation,
        }
    }

    /// Context over the built-in calculator catalog.
    pub fn builtin(config: &Config) -> Result<Self> {
        let registry = Arc::new(ToolRegistry::builtin()?);
        Ok(Self::new(registry, config))
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        self.discovery.registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_context_applies_limits() {
        let mut config = Config::default();
        config.calculation.max_batch_size = 3;
        let ctx = ToolContext::builtin(&config).unwrap();
        assert_eq!(ctx.calculation.max_batch_size(), 3);
        assert!(ctx.registry().contains("ckd_epi_2021"));
    }
}
