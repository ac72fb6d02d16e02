//! The capability the engine needs from a seismic source.

use std::fmt;
use std::sync::Arc;

use crate::types::{Point, Rupture};

/// A structure generating seismicity.
///
/// Implementations must be cheap to iterate more than once: `iter_ruptures`
/// restarts from the first rupture on every call.
pub trait SeismicSource: Send + Sync + fmt::Debug {
    fn source_id(&self) -> &str;

    fn tectonic_region_type(&self) -> &str;

    /// (min, max) magnitude of the ruptures this source can produce.
    fn magnitude_range(&self) -> (f64, f64);

    fn num_ruptures(&self) -> usize;

    /// Point-like sources are weighted with `point_source_weight` when
    /// partitioning work.
    fn is_point_source(&self) -> bool {
        false
    }

    /// Relative computational cost of the source.
    fn weight(&self, point_source_weight: f64) -> f64 {
        let n = self.num_ruptures() as f64;
        if self.is_point_source() {
            n * point_source_weight
        } else {
            n
        }
    }

    /// Lower bound of the horizontal distance (km) from any rupture to `site`.
    fn min_distance(&self, site: &Point) -> f64;

    fn iter_ruptures(&self) -> Box<dyn Iterator<Item = Rupture> + '_>;

    /// Elementary parts of this source; a source that cannot be split
    /// returns itself.
    fn split(self: Arc<Self>) -> Vec<Arc<dyn SeismicSource>>;
}
