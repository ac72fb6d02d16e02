//! Disaggregation errors.

use std::fmt;

use super::error_code::{self, DisaggErrorCode};
use super::{ConfigError, StorageError};

/// One axis of the joint disaggregation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinAxis {
    Magnitude,
    Distance,
    Longitude,
    Latitude,
    Epsilon,
    TectonicRegion,
}

impl fmt::Display for BinAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Magnitude => "magnitude",
            Self::Distance => "distance",
            Self::Longitude => "longitude",
            Self::Latitude => "latitude",
            Self::Epsilon => "epsilon",
            Self::TectonicRegion => "tectonic region",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while computing a disaggregation.
#[derive(Debug, thiserror::Error)]
pub enum DisaggError {
    #[error(
        "You are trying to disaggregate for poe={poe}. However the source model #{source_model}, \
         '{source_model_name}', produces at most probabilities of {max_poe} for rlz=#{rlz}, \
         IMT={imt}. The disaggregation PoE is too big or your model is wrong, producing too small PoEs."
    )]
    ConfigurationInfeasible {
        source_model: usize,
        source_model_name: String,
        poe: f64,
        rlz: usize,
        imt: String,
        max_poe: f64,
    },

    #[error("{axis} value {value} for site {site_id} is outside the bin edges [{low}, {high}]")]
    BinRangeViolation {
        site_id: u32,
        axis: BinAxis,
        value: f64,
        low: f64,
        high: f64,
    },

    #[error("Shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("No ground-motion model registered as '{name}'")]
    UnknownGsim { name: String },

    #[error("Ground-motion model {gsim} failed: {message}")]
    Gsim { gsim: String, message: String },

    #[error("Source {source_id} failed: {message}")]
    Source { source_id: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Executor error: {0}")]
    Executor(String),

    #[error("Aggregate PoE differs across PMF views for {name}: {poe_agg:?}")]
    InconsistentViews { name: String, poe_agg: Vec<f64> },

    #[error("Disaggregation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DisaggErrorCode for DisaggError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigurationInfeasible { .. } => error_code::POE_TOO_BIG,
            Self::BinRangeViolation { .. } => error_code::BIN_RANGE_VIOLATION,
            Self::ShapeMismatch { .. } => error_code::SHAPE_MISMATCH,
            Self::UnknownGsim { .. } => error_code::UNKNOWN_GSIM,
            Self::Gsim { .. } => error_code::GSIM_ERROR,
            Self::Source { .. } => error_code::SOURCE_ERROR,
            Self::InvalidInput(_) => error_code::INVALID_INPUT,
            Self::Executor(_) => error_code::EXECUTOR_ERROR,
            Self::InconsistentViews { .. } => error_code::INCONSISTENT_VIEWS,
            Self::Cancelled => error_code::CANCELLED,
            Self::Config(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
        }
    }
}
