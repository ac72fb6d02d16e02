//! Stable error codes for callers that cross a process or language boundary.

/// Every error enum implements this to expose a structured code string.
pub trait DisaggErrorCode {
    /// Returns the error code string (e.g., "POE_TOO_BIG").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const POE_TOO_BIG: &str = "POE_TOO_BIG";
pub const BIN_RANGE_VIOLATION: &str = "BIN_RANGE_VIOLATION";
pub const SHAPE_MISMATCH: &str = "SHAPE_MISMATCH";
pub const UNKNOWN_GSIM: &str = "UNKNOWN_GSIM";
pub const GSIM_ERROR: &str = "GSIM_ERROR";
pub const SOURCE_ERROR: &str = "SOURCE_ERROR";
pub const INVALID_INPUT: &str = "INVALID_INPUT";
pub const EXECUTOR_ERROR: &str = "EXECUTOR_ERROR";
pub const INCONSISTENT_VIEWS: &str = "INCONSISTENT_VIEWS";
pub const CANCELLED: &str = "CANCELLED";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
