//! Domains module containing business logic organized by bounded contexts.
//!
//! - **providers**: clients for the upstream web APIs (geocoding, weather,
//!   IP location, flight search)
//! - **tools**: MCP tools that expose the providers to clients

pub mod providers;
pub mod tools;
