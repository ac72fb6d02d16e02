//! Area sources: seismicity spread evenly over a grid of point locations.

use std::sync::Arc;

use disagg_core::errors::DisaggError;
use disagg_core::traits::SeismicSource;
use disagg_core::types::{Point, Rupture};

use super::{Mfd, PointSource};

#[derive(Debug, Clone, PartialEq)]
pub struct AreaSource {
    id: String,
    trt: String,
    nodes: Vec<Point>,
    mfd: Mfd,
}

impl AreaSource {
    /// Source whose rates are shared evenly by `nodes`.
    pub fn new(
        id: impl Into<String>,
        trt: impl Into<String>,
        nodes: Vec<Point>,
        mfd: Mfd,
    ) -> Result<Self, DisaggError> {
        let id = id.into();
        if nodes.is_empty() {
            return Err(DisaggError::Source {
                source_id: id,
                message: "area source has no nodes".to_string(),
            });
        }
        mfd.validate().map_err(|e| DisaggError::Source {
            source_id: id.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            id,
            trt: trt.into(),
            nodes,
            mfd,
        })
    }

    /// Regular grid covering `[west, east] x [south, north]` every `spacing`
    /// degrees, all nodes at `depth` km.
    pub fn from_bounds(
        id: impl Into<String>,
        trt: impl Into<String>,
        (west, south): (f64, f64),
        (east, north): (f64, f64),
        spacing: f64,
        depth: f64,
        mfd: Mfd,
    ) -> Result<Self, DisaggError> {
        let id = id.into();
        if !(spacing > 0.0) || east < west || north < south {
            return Err(DisaggError::Source {
                source_id: id,
                message: format!("invalid area bounds or spacing {spacing}"),
            });
        }
        // Tolerate rounding so that a bound on the grid gets its node.
        let nx = ((east - west) / spacing + 1e-9).floor() as usize + 1;
        let ny = ((north - south) / spacing + 1e-9).floor() as usize + 1;
        let nodes = (0..ny)
            .flat_map(|j| {
                (0..nx).map(move |i| {
                    Point::with_depth(west + i as f64 * spacing, south + j as f64 * spacing, depth)
                })
            })
            .collect();
        Self::new(id, trt, nodes, mfd)
    }

    pub fn nodes(&self) -> &[Point] {
        &self.nodes
    }

    fn node_share(&self) -> f64 {
        1.0 / self.nodes.len() as f64
    }
}

impl SeismicSource for AreaSource {
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
        self.nodes.len() * self.mfd.num_bins()
    }

    fn min_distance(&self, site: &Point) -> f64 {
        self.nodes
            .iter()
            .map(|p| p.distance_to(site))
            .fold(f64::INFINITY, f64::min)
    }

    fn iter_ruptures(&self) -> Box<dyn Iterator<Item = Rupture> + '_> {
        let rates: Vec<(f64, f64)> = self.mfd.rates().into_iter().filter(|(_, r)| *r > 0.0).collect();
        let share = self.node_share();
        Box::new(self.nodes.iter().flat_map(move |node| {
            rates
                .clone()
                .into_iter()
                .map(move |(mag, rate)| Rupture::new(mag, rate * share, [*node]))
        }))
    }

    /// One point source per node, each carrying its share of the rates.
    fn split(self: Arc<Self>) -> Vec<Arc<dyn SeismicSource>> {
        let share = self.node_share();
        let mfd = Mfd::Discrete {
            min_mag: self.mfd.magnitude_range().0,
            bin_width: match &self.mfd {
                Mfd::Discrete { bin_width, .. } | Mfd::TruncatedGr { bin_width, .. } => *bin_width,
            },
            rates: self.mfd.rates().into_iter().map(|(_, r)| r * share).collect(),
        };
        let points: Result<Vec<PointSource>, DisaggError> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| PointSource::new(format!("{}:{i}", self.id), self.trt.clone(), *node, mfd.clone()))
            .collect();
        match points {
            Ok(points) => points
                .into_iter()
                .map(|p| Arc::new(p) as Arc<dyn SeismicSource>)
                .collect(),
            Err(e) => {
                tracing::warn!(source_id = %self.id, error = %e, "cannot split area source, keeping it whole");
                vec![self as Arc<dyn SeismicSource>]
            }
        }
    }
}
