//! Execution configuration: scheduling mode, concurrency, partition weights.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_POINT_SOURCE_WEIGHT, DEFAULT_SANITY_TOLERANCE};

/// How partition tasks are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Worker thread pool; results are consumed in completion order.
    #[default]
    Parallel,
    /// Every task runs on the controller thread.
    Sequential,
}

impl std::str::FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parallel" => Ok(Self::Parallel),
            "sequential" => Ok(Self::Sequential),
            other => Err(format!("unknown execution mode '{other}'")),
        }
    }
}

/// Configuration for task scheduling.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Execution mode. Default: parallel.
    pub mode: Option<ExecutionMode>,
    /// Worker threads (0 or unset = rayon default).
    pub threads: Option<usize>,
    /// Target number of tasks across all source groups. Default: 2 × threads.
    pub concurrent_tasks: Option<usize>,
    /// Weight multiplier applied to point-source ruptures. Default: 0.1.
    pub point_source_weight: Option<f64>,
    /// PMF views to compute, by name (e.g. "Mag_Dist"). Empty = all.
    pub pmf_views: Vec<String>,
    /// Tolerance of the cross-view aggregate PoE check. Default: 1e-6.
    pub sanity_tolerance: Option<f64>,
    /// Fail the run when the cross-view check does not hold. Default: false.
    pub strict_sanity_check: Option<bool>,
}

impl ExecutionConfig {
    pub fn effective_mode(&self) -> ExecutionMode {
        self.mode.unwrap_or_default()
    }

    pub fn effective_point_source_weight(&self) -> f64 {
        self.point_source_weight.unwrap_or(DEFAULT_POINT_SOURCE_WEIGHT)
    }

    pub fn effective_sanity_tolerance(&self) -> f64 {
        self.sanity_tolerance.unwrap_or(DEFAULT_SANITY_TOLERANCE)
    }

    pub fn effective_strict_sanity_check(&self) -> bool {
        self.strict_sanity_check.unwrap_or(false)
    }
}
