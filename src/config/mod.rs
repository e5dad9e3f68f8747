//! Configuration model for the orchestrator.
//!
//! This module defines the Config struct that represents `sdlc.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, and validation of config values.
//! There is no global settings object: a Config value is handed to the engine.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::Config;
pub use types::ModelConfig;
