//! Per-site bin edges of the disaggregation matrix.

use serde::{Deserialize, Serialize};

use crate::errors::{BinAxis, DisaggError};

/// Magnitude, distance, longitude, latitude and epsilon edges for one site.
///
/// Every sequence is strictly increasing with at least two edges. The
/// tectonic-region axis is global and carried separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinEdges {
    pub mag: Vec<f64>,
    pub dist: Vec<f64>,
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
    pub eps: Vec<f64>,
}

impl BinEdges {
    /// Number of bins along each of the five numeric axes.
    pub fn num_bins(&self) -> [usize; 5] {
        [
            self.mag.len().saturating_sub(1),
            self.dist.len().saturating_sub(1),
            self.lon.len().saturating_sub(1),
            self.lat.len().saturating_sub(1),
            self.eps.len().saturating_sub(1),
        ]
    }

    /// Shape of the joint matrix for `num_trts` tectonic region types.
    pub fn shape(&self, num_trts: usize) -> [usize; 6] {
        let [m, d, lo, la, e] = self.num_bins();
        [m, d, lo, la, e, num_trts]
    }

    /// Check the strictly-increasing invariant on every axis.
    pub fn validate(&self) -> Result<(), DisaggError> {
        for (axis, edges) in [
            (BinAxis::Magnitude, &self.mag),
            (BinAxis::Distance, &self.dist),
            (BinAxis::Longitude, &self.lon),
            (BinAxis::Latitude, &self.lat),
            (BinAxis::Epsilon, &self.eps),
        ] {
            if edges.len() < 2 {
                return Err(DisaggError::InvalidInput(format!(
                    "{axis} edges need at least two values, got {}",
                    edges.len()
                )));
            }
            if edges.windows(2).any(|w| !(w[0] < w[1])) {
                return Err(DisaggError::InvalidInput(format!(
                    "{axis} edges are not strictly increasing: {edges:?}"
                )));
            }
        }
        Ok(())
    }
}
