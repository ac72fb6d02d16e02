//! Hazard curves: per (site, realization), (level, PoE) pairs per IMT.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::collections::FxHashMap;
use crate::errors::DisaggError;

/// Intensity levels (increasing) and their probabilities of exceedance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoints {
    pub levels: Vec<f64>,
    pub poes: Vec<f64>,
}

impl CurvePoints {
    pub fn new(levels: Vec<f64>, poes: Vec<f64>) -> Result<Self, DisaggError> {
        if levels.len() != poes.len() || levels.is_empty() {
            return Err(DisaggError::InvalidInput(format!(
                "hazard curve needs as many PoEs as levels (got {} levels, {} poes)",
                levels.len(),
                poes.len()
            )));
        }
        if levels.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DisaggError::InvalidInput(
                "hazard curve levels must be strictly increasing".to_string(),
            ));
        }
        if poes.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err(DisaggError::InvalidInput(
                "hazard curve PoEs must be in [0, 1]".to_string(),
            ));
        }
        Ok(Self { levels, poes })
    }

    pub fn max_poe(&self) -> f64 {
        self.poes.iter().copied().fold(0.0, f64::max)
    }

    pub fn is_all_zero(&self) -> bool {
        self.poes.iter().all(|&p| p == 0.0)
    }

    /// Level at which the curve reaches `poe`.
    ///
    /// The curve is walked in increasing-PoE order (i.e. from the highest
    /// level down) and linearly interpolated; values outside the PoE range
    /// are clamped to the end levels.
    pub fn interpolate_level(&self, poe: f64) -> f64 {
        let xp: Vec<f64> = self.poes.iter().rev().copied().collect();
        let fp: Vec<f64> = self.levels.iter().rev().copied().collect();
        let n = xp.len();
        if poe <= xp[0] {
            return fp[0];
        }
        if poe >= xp[n - 1] {
            return fp[n - 1];
        }
        // First index with xp[j] > poe; xp[j - 1] <= poe.
        let j = xp.partition_point(|&x| x <= poe);
        let (x0, x1, y0, y1) = (xp[j - 1], xp[j], fp[j - 1], fp[j]);
        if x1 == x0 {
            return y0;
        }
        y0 + (poe - x0) * (y1 - y0) / (x1 - x0)
    }
}

/// One hazard curve per IMT for a (site, realization) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HazardCurve {
    pub by_imt: BTreeMap<String, CurvePoints>,
}

impl HazardCurve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_imt(mut self, imt: &str, levels: Vec<f64>, poes: Vec<f64>) -> Result<Self, DisaggError> {
        self.by_imt.insert(imt.to_string(), CurvePoints::new(levels, poes)?);
        Ok(self)
    }

    pub fn get(&self, imt: &str) -> Option<&CurvePoints> {
        self.by_imt.get(imt)
    }

    /// Maximum PoE for `imt`, 0 when the IMT is missing.
    pub fn max_poe(&self, imt: &str) -> f64 {
        self.get(imt).map_or(0.0, CurvePoints::max_poe)
    }

    pub fn is_all_zero(&self) -> bool {
        self.by_imt.values().all(CurvePoints::is_all_zero)
    }
}

/// All hazard curves of a calculation, keyed by (site id, realization ordinal).
#[derive(Debug, Clone, Default)]
pub struct HazardCurves {
    curves: FxHashMap<(u32, usize), HazardCurve>,
}

impl HazardCurves {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, site_id: u32, rlz_id: usize, curve: HazardCurve) {
        self.curves.insert((site_id, rlz_id), curve);
    }

    pub fn get(&self, site_id: u32, rlz_id: usize) -> Option<&HazardCurve> {
        self.curves.get(&(site_id, rlz_id))
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Maximum PoE for (`rlz_id`, `imt`) over all sites.
    pub fn max_poe(&self, rlz_id: usize, imt: &str) -> f64 {
        self.curves
            .iter()
            .filter(|((_, r), _)| *r == rlz_id)
            .map(|(_, c)| c.max_poe(imt))
            .fold(0.0, f64::max)
    }
}
