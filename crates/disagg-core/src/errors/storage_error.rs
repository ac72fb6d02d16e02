//! Storage errors.

use super::error_code::{self, DisaggErrorCode};

/// Errors raised by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration to v{version} failed: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Not found: {what}")]
    NotFound { what: String },
}

impl DisaggErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
