//! A lognormal ground-motion model with per-IMT coefficients.
//!
//! `ln(Y) = c0 + c1 * M - c2 * ln(rrup + c3)`, with a constant standard
//! deviation `sigma` in natural-log units. Good enough to exercise the
//! engine end to end; not calibrated against any region.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use disagg_core::errors::DisaggError;
use disagg_core::traits::{GroundMotionModel, RuptureContext};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GmpeCoefficients {
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub sigma: f64,
}

#[derive(Debug, Clone)]
pub struct SimpleLognormalGsim {
    name: String,
    coefficients: BTreeMap<String, GmpeCoefficients>,
    std_normal: Normal,
}

impl SimpleLognormalGsim {
    pub fn new(
        name: impl Into<String>,
        coefficients: BTreeMap<String, GmpeCoefficients>,
    ) -> Result<Self, DisaggError> {
        let name = name.into();
        if let Some((imt, _)) = coefficients.iter().find(|(_, c)| !(c.sigma > 0.0)) {
            return Err(DisaggError::Gsim {
                gsim: name,
                message: format!("sigma for {imt} must be positive"),
            });
        }
        let std_normal = Normal::new(0.0, 1.0).map_err(|e| DisaggError::Gsim {
            gsim: name.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            name,
            coefficients,
            std_normal,
        })
    }

    /// Mean of `ln(Y)` and its standard deviation.
    pub fn mean_and_stddev(&self, ctx: &RuptureContext, imt: &str) -> Result<(f64, f64), DisaggError> {
        let c = self.coefficients.get(imt).ok_or_else(|| DisaggError::Gsim {
            gsim: self.name.clone(),
            message: format!("no coefficients for {imt}"),
        })?;
        let mean = c.c0 + c.c1 * ctx.magnitude - c.c2 * (ctx.rrup + c.c3).ln();
        Ok((mean, c.sigma))
    }
}

impl GroundMotionModel for SimpleLognormalGsim {
    fn name(&self) -> &str {
        &self.name
    }

    fn disaggregate_poe(
        &self,
        ctx: &RuptureContext,
        imt: &str,
        iml: f64,
        truncation_level: f64,
        eps_edges: &[f64],
    ) -> Result<Vec<f64>, DisaggError> {
        if !(iml > 0.0) {
            return Err(DisaggError::Gsim {
                gsim: self.name.clone(),
                message: format!("intensity level must be positive, got {iml}"),
            });
        }
        let (mean, sigma) = self.mean_and_stddev(ctx, imt)?;
        let eps_threshold = (iml.ln() - mean) / sigma;
        let norm = self.std_normal.cdf(truncation_level) - self.std_normal.cdf(-truncation_level);

        // Probability mass of each epsilon bin lying above the threshold.
        Ok(eps_edges
            .windows(2)
            .map(|w| {
                let lower = w[0].max(eps_threshold);
                if lower >= w[1] {
                    0.0
                } else {
                    (self.std_normal.cdf(w[1]) - self.std_normal.cdf(lower)) / norm
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use disagg_core::types::Point;

    use super::*;

    fn gsim() -> SimpleLognormalGsim {
        SimpleLognormalGsim::new(
            "Simple",
            BTreeMap::from([(
                "PGA".to_string(),
                GmpeCoefficients { c0: -3.5, c1: 0.9, c2: 1.1, c3: 10.0, sigma: 0.6 },
            )]),
        )
        .unwrap()
    }

    fn ctx(rrup: f64) -> RuptureContext {
        RuptureContext { magnitude: 6.5, rjb: rrup, rrup, closest: Point::new(0.0, 0.0) }
    }

    #[test]
    fn bins_sum_to_total_exceedance() {
        let g = gsim();
        let edges = [-3.0, -1.0, 1.0, 3.0];
        let poes = g.disaggregate_poe(&ctx(20.0), "PGA", 0.1, 3.0, &edges).unwrap();
        assert_eq!(poes.len(), 3);
        let total: f64 = poes.iter().sum();
        assert!(total > 0.0 && total <= 1.0 + 1e-12);

        let (mean, sigma) = g.mean_and_stddev(&ctx(20.0), "PGA").unwrap();
        let n = Normal::new(0.0, 1.0).unwrap();
        let eps = ((0.1f64).ln() - mean) / sigma;
        let expected = ((n.cdf(3.0) - n.cdf(eps.max(-3.0))) / (n.cdf(3.0) - n.cdf(-3.0))).max(0.0);
        assert!((total - expected).abs() < 1e-12);
    }

    #[test]
    fn poe_decreases_with_distance() {
        let g = gsim();
        let edges = [-3.0, 3.0];
        let near = g.disaggregate_poe(&ctx(5.0), "PGA", 0.2, 3.0, &edges).unwrap()[0];
        let far = g.disaggregate_poe(&ctx(150.0), "PGA", 0.2, 3.0, &edges).unwrap()[0];
        assert!(near > far);
    }

    #[test]
    fn unknown_imt_is_an_error() {
        let err = gsim().disaggregate_poe(&ctx(5.0), "PGV", 0.2, 3.0, &[-3.0, 3.0]).unwrap_err();
        assert!(matches!(err, DisaggError::Gsim { .. }));
    }
}
