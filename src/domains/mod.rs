//! Domains module containing business logic organized by bounded contexts.
//!
//! - **catalog**: tool descriptors and the immutable registry
//! - **calculators**: the built-in calculator definitions
//! - **parameters**: parameter matching and boundary validation
//! - **discovery**: the discovery index and engine
//! - **calculation**: the calculate use case
//! - **tools**: MCP tool adapters over the domains above

pub mod calculation;
pub mod calculators;
pub mod catalog;
pub mod discovery;
pub mod parameters;
pub mod tools;
