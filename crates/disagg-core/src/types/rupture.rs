//! Probabilistic ruptures produced by seismic sources.

use super::collections::SmallVec4;
use super::geo::Point;

/// A rupture with its annual occurrence rate and surface nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Rupture {
    pub magnitude: f64,
    /// Annual occurrence rate.
    pub occurrence_rate: f64,
    pub surface: SmallVec4<Point>,
}

impl Rupture {
    pub fn new(magnitude: f64, occurrence_rate: f64, surface: impl IntoIterator<Item = Point>) -> Self {
        Self {
            magnitude,
            occurrence_rate,
            surface: surface.into_iter().collect(),
        }
    }

    /// Joyner-Boore distance to `site` and the surface node realizing it.
    pub fn closest_point(&self, site: &Point) -> Option<(f64, Point)> {
        self.surface
            .iter()
            .map(|p| (p.distance_to(site), *p))
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }

    /// Poissonian probability of no exceedance over `time_span` years,
    /// given the conditional probability of exceedance `poe`.
    pub fn probability_of_no_exceedance(&self, poe: f64, time_span: f64) -> f64 {
        (-self.occurrence_rate * time_span * poe).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pne_is_one_for_zero_poe() {
        let rup = Rupture::new(6.0, 0.01, [Point::new(0.0, 0.0)]);
        assert_eq!(rup.probability_of_no_exceedance(0.0, 50.0), 1.0);
        let pne = rup.probability_of_no_exceedance(1.0, 50.0);
        assert!((pne - (-0.5f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn closest_point_picks_nearest_node() {
        let rup = Rupture::new(
            6.0,
            0.01,
            [Point::with_depth(1.0, 0.0, 5.0), Point::with_depth(0.2, 0.0, 10.0)],
        );
        let (d, p) = rup.closest_point(&Point::new(0.0, 0.0)).unwrap();
        assert_eq!(p.lon, 0.2);
        assert!(d > 22.0 && d < 23.0);
    }
}
