//! Configuration system for the disaggregation engine.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod binning_config;
pub mod calculation_config;
pub mod disagg_config;
pub mod execution_config;

pub use binning_config::BinningConfig;
pub use calculation_config::CalculationConfig;
pub use disagg_config::{CliOverrides, DisaggConfig};
pub use execution_config::{ExecutionConfig, ExecutionMode};
