//! Bin width configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COORDINATE_BIN_WIDTH, DEFAULT_DISTANCE_BIN_WIDTH, DEFAULT_MAG_BIN_WIDTH,
    DEFAULT_NUM_EPSILON_BINS,
};

/// Widths of the disaggregation bins.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BinningConfig {
    /// Magnitude bin width. Default: 0.5.
    pub mag_bin_width: Option<f64>,
    /// Distance bin width in km. Default: 10.
    pub distance_bin_width: Option<f64>,
    /// Longitude/latitude bin width in degrees. Default: 0.5.
    pub coordinate_bin_width: Option<f64>,
    /// Number of epsilon bins. Default: 3.
    pub num_epsilon_bins: Option<usize>,
}

impl BinningConfig {
    pub fn effective_mag_bin_width(&self) -> f64 {
        self.mag_bin_width.unwrap_or(DEFAULT_MAG_BIN_WIDTH)
    }

    pub fn effective_distance_bin_width(&self) -> f64 {
        self.distance_bin_width.unwrap_or(DEFAULT_DISTANCE_BIN_WIDTH)
    }

    pub fn effective_coordinate_bin_width(&self) -> f64 {
        self.coordinate_bin_width.unwrap_or(DEFAULT_COORDINATE_BIN_WIDTH)
    }

    pub fn effective_num_epsilon_bins(&self) -> usize {
        self.num_epsilon_bins.unwrap_or(DEFAULT_NUM_EPSILON_BINS)
    }
}
