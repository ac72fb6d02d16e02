//! Result keys, PMF views and persisted disaggregation records.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ndarray::ArrayD;

use super::bins::BinEdges;

/// A marginalization of the joint (mag, dist, lon, lat, eps, trt) matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PmfKind {
    Mag,
    Dist,
    Trt,
    MagDist,
    MagDistEps,
    LonLat,
    MagLonLat,
    LonLatTrt,
}

impl PmfKind {
    pub const ALL: [PmfKind; 8] = [
        PmfKind::Mag,
        PmfKind::Dist,
        PmfKind::Trt,
        PmfKind::MagDist,
        PmfKind::MagDistEps,
        PmfKind::LonLat,
        PmfKind::MagLonLat,
        PmfKind::LonLatTrt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Mag => "Mag",
            Self::Dist => "Dist",
            Self::Trt => "TRT",
            Self::MagDist => "Mag_Dist",
            Self::MagDistEps => "Mag_Dist_Eps",
            Self::LonLat => "Lon_Lat",
            Self::MagLonLat => "Mag_Lon_Lat",
            Self::LonLatTrt => "Lon_Lat_TRT",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Axes of the joint matrix kept by this view, in increasing order.
    /// Axis order: 0 mag, 1 dist, 2 lon, 3 lat, 4 eps, 5 trt.
    pub fn axes(self) -> &'static [usize] {
        match self {
            Self::Mag => &[0],
            Self::Dist => &[1],
            Self::Trt => &[5],
            Self::MagDist => &[0, 1],
            Self::MagDistEps => &[0, 1, 4],
            Self::LonLat => &[2, 3],
            Self::MagLonLat => &[0, 2, 3],
            Self::LonLatTrt => &[2, 3, 5],
        }
    }
}

/// Identifies one final disaggregation matrix.
///
/// Floating fields compare by total order so keys can live in ordered and
/// hashed maps.
#[derive(Debug, Clone)]
pub struct ResultKey {
    pub site_id: u32,
    pub rlz_id: usize,
    pub poe: Option<f64>,
    pub imt: String,
    pub iml: f64,
    pub trts: Arc<[String]>,
}

impl ResultKey {
    fn cmp_fields(&self, other: &Self) -> Ordering {
        self.site_id
            .cmp(&other.site_id)
            .then(self.rlz_id.cmp(&other.rlz_id))
            .then_with(|| match (self.poe, other.poe) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            })
            .then_with(|| self.imt.cmp(&other.imt))
            .then_with(|| self.iml.total_cmp(&other.iml))
            .then_with(|| self.trts.cmp(&other.trts))
    }
}

impl PartialEq for ResultKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_fields(other) == Ordering::Equal
    }
}

impl Eq for ResultKey {}

impl PartialOrd for ResultKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResultKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_fields(other)
    }
}

impl Hash for ResultKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.site_id.hash(state);
        self.rlz_id.hash(state);
        self.poe.map(f64::to_bits).hash(state);
        self.imt.hash(state);
        self.iml.to_bits().hash(state);
        self.trts.hash(state);
    }
}

/// PMF arrays for one result key, one per configured view.
#[derive(Debug, Clone, PartialEq)]
pub struct DisaggMatrix {
    views: Vec<(PmfKind, ArrayD<f64>)>,
}

impl DisaggMatrix {
    pub fn new(views: Vec<(PmfKind, ArrayD<f64>)>) -> Self {
        Self { views }
    }

    pub fn views(&self) -> &[(PmfKind, ArrayD<f64>)] {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut [(PmfKind, ArrayD<f64>)] {
        &mut self.views
    }

    pub fn get(&self, kind: PmfKind) -> Option<&ArrayD<f64>> {
        self.views.iter().find(|(k, _)| *k == kind).map(|(_, a)| a)
    }

    /// `1 - Π(1 - p)` over every cell of each view, in view order.
    pub fn poe_agg(&self) -> Vec<f64> {
        self.views
            .iter()
            .map(|(_, a)| 1.0 - a.iter().fold(1.0, |acc, p| acc * (1.0 - p)))
            .collect()
    }
}

/// Everything persisted for one result key.
#[derive(Debug, Clone, PartialEq)]
pub struct DisaggRecord {
    /// `disagg/[poe-<poe>-]rlz-<rlz>-<imt>-<lon>-<lat>`
    pub name: String,
    pub site_id: u32,
    pub lon: f64,
    pub lat: f64,
    pub rlz_id: usize,
    pub imt: String,
    pub iml: f64,
    pub poe: Option<f64>,
    pub investigation_time: f64,
    pub trts: Vec<String>,
    pub edges: BinEdges,
    pub pmfs: Vec<(String, ArrayD<f64>)>,
    pub poe_agg: Vec<f64>,
}
