//! Configuration management for the MCP server.
//!
//! Configuration comes from defaults, overridden by `MEDCALC_*` environment
//! variables. A `.env` file in the working directory is loaded first.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

use crate::domains::calculation::DEFAULT_MAX_BATCH_SIZE;
use crate::domains::discovery::{DEFAULT_RELATED_LIMIT, DEFAULT_SEARCH_LIMIT};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Calculation limits.
    pub calculation: CalculationConfig,

    /// Discovery result limits.
    pub discovery: DiscoveryConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for the calculate use case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationConfig {
    /// Largest accepted `calculate_batch` request.
    pub max_batch_size: usize,
}

/// Configuration for the discovery engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Results returned by keyword search when the caller gives no limit.
    pub default_limit: usize,

    /// Results returned by `get_related_tools` when the caller gives no limit.
    pub related_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "medcalc-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            calculation: CalculationConfig {
                max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            },
            discovery: DiscoveryConfig {
                default_limit: DEFAULT_SEARCH_LIMIT,
                related_limit: DEFAULT_RELATED_LIMIT,
            },
        }
    }
}

/// Parse `var` as a positive number, keeping `default` when unset or invalid.
pub(crate) fn env_number<T>(var: &str, default: T) -> T
where
    T: FromStr + PartialOrd + Default + Copy + std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) if value > T::default() => value,
            _ => {
                warn!("Ignoring invalid {}={:?}, using {}", var, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Recognized variables: `MEDCALC_SERVER_NAME`, `MEDCALC_LOG_LEVEL`,
    /// `MEDCALC_LOG_TIMESTAMPS`, `MEDCALC_MAX_BATCH_SIZE`,
    /// `MEDCALC_DISCOVERY_LIMIT`, `MEDCALC_RELATED_LIMIT`, plus the transport
    /// variables read by [`TransportConfig::from_env`].
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MEDCALC_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MEDCALC_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("MEDCALC_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = timestamps.to_lowercase() != "false" && timestamps != "0";
        }

        config.transport = TransportConfig::from_env();

        config.calculation.max_batch_size =
            env_number("MEDCALC_MAX_BATCH_SIZE", config.calculation.max_batch_size);
        config.discovery.default_limit =
            env_number("MEDCALC_DISCOVERY_LIMIT", config.discovery.default_limit);
        config.discovery.related_limit =
            env_number("MEDCALC_RELATED_LIMIT", config.discovery.related_limit);

        config
    }
}
