//! Point sources: every rupture sits at the hypocentre.

use std::sync::Arc;

use disagg_core::errors::DisaggError;
use disagg_core::traits::SeismicSource;
use disagg_core::types::{Point, Rupture};

use super::Mfd;

#[derive(Debug, Clone, PartialEq)]
pub struct PointSource {
    id: String,
    trt: String,
    hypocenter: Point,
    mfd: Mfd,
}

impl PointSource {
    pub fn new(
        id: impl Into<String>,
        trt: impl Into<String>,
        hypocenter: Point,
        mfd: Mfd,
    ) -> Result<Self, DisaggError> {
        let id = id.into();
        mfd.validate().map_err(|e| DisaggError::Source {
            source_id: id.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            id,
            trt: trt.into(),
            hypocenter,
            mfd,
        })
    }
}

impl SeismicSource for PointSource {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn tectonic_region_type(&self) -> &str {
        &self.trt
    }

    fn magnitude_range(&self) -> (f64, f64) {
        self.mfd.magnitude_range()
    }

    fn num_ruptures(&self) -> usize {
        self.mfd.num_bins()
    }

    fn is_point_source(&self) -> bool {
        true
    }

    fn min_distance(&self, site: &Point) -> f64 {
        self.hypocenter.distance_to(site)
    }

    fn iter_ruptures(&self) -> Box<dyn Iterator<Item = Rupture> + '_> {
        let hypo = self.hypocenter;
        Box::new(
            self.mfd
                .rates()
                .into_iter()
                .filter(|(_, rate)| *rate > 0.0)
                .map(move |(mag, rate)| Rupture::new(mag, rate, [hypo])),
        )
    }

    fn split(self: Arc<Self>) -> Vec<Arc<dyn SeismicSource>> {
        vec![self as Arc<dyn SeismicSource>]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ruptures_are_restartable() {
        let src = PointSource::new(
            "p1",
            "Active Shallow Crust",
            Point::with_depth(0.0, 0.0, 10.0),
            Mfd::Discrete { min_mag: 5.0, bin_width: 0.5, rates: vec![0.01, 0.0, 0.001] },
        )
        .unwrap();
        assert_eq!(src.iter_ruptures().count(), 2);
        assert_eq!(src.iter_ruptures().count(), 2);
        assert!((src.weight(0.1) - 0.3).abs() < 1e-12);
        assert_eq!(src.weight(1.0), 3.0);
    }
}
