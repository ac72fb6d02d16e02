//! Error handling for the disaggregation engine.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod disagg_error;
pub mod error_code;
pub mod storage_error;

pub use config_error::ConfigError;
pub use disagg_error::{BinAxis, DisaggError};
pub use error_code::DisaggErrorCode;
pub use storage_error::StorageError;
