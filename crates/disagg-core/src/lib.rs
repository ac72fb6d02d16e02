//! Core types, traits, errors, config, and tracing for the disaggregation engine.
//!
//! Everything the engine and the storage layer agree on lives here: the
//! site/curve/realization data model, bin edges and result keys, the source
//! and ground-motion traits, the error enums, and layered configuration.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;
