//! Calculation parameters: thresholds, levels, truncation, distances.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_INVESTIGATION_TIME, DEFAULT_MAXIMUM_DISTANCE, DEFAULT_TRUNCATION_LEVEL,
};

/// Parameters of the disaggregation request.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CalculationConfig {
    /// Truncation level of the ground-motion distribution. Default: 3.
    pub truncation_level: Option<f64>,
    /// Maximum source-to-site integration distance in km. Default: 200.
    pub maximum_distance: Option<f64>,
    /// Investigation time in years. Default: 50.
    pub investigation_time: Option<f64>,
    /// Requested probabilities of exceedance.
    pub poes_disagg: Vec<f64>,
    /// Fixed intensity levels per IMT; when set, levels are not interpolated.
    pub iml_disagg: BTreeMap<String, f64>,
    /// Intensity measure types to disaggregate.
    pub intensity_measure_types: Vec<String>,
}

impl CalculationConfig {
    pub fn effective_truncation_level(&self) -> f64 {
        self.truncation_level.unwrap_or(DEFAULT_TRUNCATION_LEVEL)
    }

    pub fn effective_maximum_distance(&self) -> f64 {
        self.maximum_distance.unwrap_or(DEFAULT_MAXIMUM_DISTANCE)
    }

    pub fn effective_investigation_time(&self) -> f64 {
        self.investigation_time.unwrap_or(DEFAULT_INVESTIGATION_TIME)
    }

    /// The thresholds a quartet can carry: every requested PoE, or a single
    /// `None` when only fixed levels were configured.
    pub fn thresholds(&self) -> Vec<Option<f64>> {
        if self.poes_disagg.is_empty() {
            vec![None]
        } else {
            self.poes_disagg.iter().copied().map(Some).collect()
        }
    }

    /// Intensity measure types, falling back to the keys of `iml_disagg`.
    pub fn imts(&self) -> Vec<String> {
        if self.intensity_measure_types.is_empty() {
            self.iml_disagg.keys().cloned().collect()
        } else {
            self.intensity_measure_types.clone()
        }
    }
}
