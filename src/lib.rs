//! Clinical calculator catalog served over the Model Context Protocol.
//!
//! Callers who do not know tool ids or exact parameter names can find a
//! calculator by specialty, clinical context, condition, ICD-10 code or
//! keyword, inspect its schema, and run it with loosely named inputs. Values
//! are validated against literature-backed hard and soft ranges before any
//! formula runs.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server and its transports
//! - **domains**: business logic organized by bounded contexts
//!   - **catalog**: tool descriptors and the immutable `ToolRegistry`
//!   - **calculators**: the built-in formulas
//!   - **parameters**: name matching and boundary validation
//!   - **discovery**: the index and query engine
//!   - **calculation**: the calculate use case, single and batch
//!   - **tools**: MCP tool adapters over the services above
//!
//! # Example
//!
//! ```rust,no_run
//! use medcalc_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
