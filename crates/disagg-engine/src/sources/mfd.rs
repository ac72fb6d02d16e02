//! Magnitude-frequency distributions.

use serde::{Deserialize, Serialize};

use disagg_core::errors::DisaggError;

/// Annual occurrence rates per magnitude bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mfd {
    /// Explicit rates for bins centred at `min_mag + i * bin_width`.
    Discrete {
        min_mag: f64,
        bin_width: f64,
        rates: Vec<f64>,
    },
    /// Gutenberg-Richter `log10(N) = a - b * M` truncated to `[min_mag, max_mag]`.
    TruncatedGr {
        a_val: f64,
        b_val: f64,
        min_mag: f64,
        max_mag: f64,
        bin_width: f64,
    },
}

impl Mfd {
    pub fn validate(&self) -> Result<(), DisaggError> {
        match self {
            Self::Discrete { bin_width, rates, .. } => {
                if !(*bin_width > 0.0) || rates.is_empty() {
                    return Err(DisaggError::InvalidInput(
                        "discrete MFD needs a positive bin width and at least one rate".to_string(),
                    ));
                }
                if rates.iter().any(|r| !(*r >= 0.0)) {
                    return Err(DisaggError::InvalidInput("MFD rates must be non-negative".to_string()));
                }
            }
            Self::TruncatedGr { min_mag, max_mag, bin_width, .. } => {
                if !(*bin_width > 0.0) || !(max_mag > min_mag) {
                    return Err(DisaggError::InvalidInput(format!(
                        "truncated GR needs min_mag < max_mag and a positive bin width \
                         (got {min_mag}..{max_mag}, width {bin_width})"
                    )));
                }
            }
        }
        Ok(())
    }

    /// (magnitude, annual rate) pairs in increasing magnitude.
    pub fn rates(&self) -> Vec<(f64, f64)> {
        match self {
            Self::Discrete { min_mag, bin_width, rates } => rates
                .iter()
                .enumerate()
                .map(|(i, &r)| (min_mag + i as f64 * bin_width, r))
                .collect(),
            Self::TruncatedGr { a_val, b_val, min_mag, max_mag, bin_width } => {
                let n = ((max_mag - min_mag) / bin_width).round().max(1.0) as usize;
                (0..n)
                    .map(|i| {
                        let mag = min_mag + (i as f64 + 0.5) * bin_width;
                        let lo = 10f64.powf(a_val - b_val * (mag - bin_width / 2.0));
                        let hi = 10f64.powf(a_val - b_val * (mag + bin_width / 2.0));
                        (mag, lo - hi)
                    })
                    .collect()
            }
        }
    }

    /// (min, max) magnitude of the bins.
    pub fn magnitude_range(&self) -> (f64, f64) {
        let rates = self.rates();
        match (rates.first(), rates.last()) {
            (Some(first), Some(last)) => (first.0, last.0),
            _ => (0.0, 0.0),
        }
    }

    pub fn num_bins(&self) -> usize {
        match self {
            Self::Discrete { rates, .. } => rates.len(),
            Self::TruncatedGr { min_mag, max_mag, bin_width, .. } => {
                ((max_mag - min_mag) / bin_width).round().max(1.0) as usize
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_gr_total_rate() {
        let mfd = Mfd::TruncatedGr { a_val: 3.0, b_val: 1.0, min_mag: 5.0, max_mag: 7.0, bin_width: 0.5 };
        mfd.validate().unwrap();
        let rates = mfd.rates();
        assert_eq!(rates.len(), 4);
        assert!((rates[0].0 - 5.25).abs() < 1e-12);
        let total: f64 = rates.iter().map(|(_, r)| r).sum();
        let expected = 10f64.powf(3.0 - 5.0) - 10f64.powf(3.0 - 7.0);
        assert!((total - expected).abs() < 1e-12);
        assert!(rates.windows(2).all(|w| w[0].1 > w[1].1));
    }

    #[test]
    fn discrete_rates() {
        let mfd = Mfd::Discrete { min_mag: 6.0, bin_width: 0.5, rates: vec![0.01, 0.002] };
        assert_eq!(mfd.rates(), vec![(6.0, 0.01), (6.5, 0.002)]);
        assert_eq!(mfd.magnitude_range(), (6.0, 6.5));
        assert!(Mfd::Discrete { min_mag: 6.0, bin_width: 0.5, rates: vec![-1.0] }.validate().is_err());
    }
}
