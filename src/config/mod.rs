//! Configuration model for tintforge.
//!
//! This module defines the Config struct that represents `tintforge.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, and validation of config values,
//! including every color scheme.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::Config;
pub use types::{RecolorSettings, RecolorStrategy, StylingSettings, VariantSettings};
