//! The capability the engine needs from a ground-motion model.

use std::fmt;

use crate::errors::DisaggError;
use crate::types::Point;

/// Rupture/site parameters handed to a ground-motion model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuptureContext {
    pub magnitude: f64,
    /// Joyner-Boore distance in km.
    pub rjb: f64,
    /// Rupture distance in km.
    pub rrup: f64,
    /// Surface node closest to the site.
    pub closest: Point,
}

/// Ground-motion prediction equation.
pub trait GroundMotionModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Conditional probability of exceeding `iml` for each epsilon bin
    /// delimited by `eps_edges`, given the rupture context. Returns
    /// `eps_edges.len() - 1` values.
    fn disaggregate_poe(
        &self,
        ctx: &RuptureContext,
        imt: &str,
        iml: f64,
        truncation_level: f64,
        eps_edges: &[f64],
    ) -> Result<Vec<f64>, DisaggError>;
}
