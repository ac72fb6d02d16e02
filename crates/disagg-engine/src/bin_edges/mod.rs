//! Bin-edge construction: global magnitude and epsilon edges, per-site
//! distance, longitude and latitude edges.

pub mod bounding_box;

pub use bounding_box::{BoundingBox, SiteEdges};

use rayon::prelude::*;

use disagg_core::config::BinningConfig;
use disagg_core::types::{BinEdges, FxHashMap, Site, SiteCollection, SourceModel};

/// Edges `width * floor(lo / width)` through `width * ceil(hi / width)`.
///
/// The result always brackets `[lo, hi]` and has at least two edges: a
/// degenerate range yields one bin, and a range shrunk by rounding is
/// widened by one bin on the offending side.
pub fn aligned_edges(lo: f64, hi: f64, width: f64) -> Vec<f64> {
    let mut first = (lo / width).floor() as i64;
    let mut last = (hi / width).ceil() as i64;
    if last <= first {
        last = first + 1;
    }
    if first as f64 * width > lo {
        first -= 1;
    }
    if (last as f64 * width) < hi {
        last += 1;
    }
    (first..=last).map(|i| i as f64 * width).collect()
}

/// Magnitude edges shared by every site.
pub fn mag_edges(min_mag: f64, max_mag: f64, width: f64) -> Vec<f64> {
    aligned_edges(min_mag, max_mag, width)
}

/// `num_bins` equal epsilon bins over `[-truncation_level, truncation_level]`.
pub fn eps_edges(truncation_level: f64, num_bins: usize) -> Vec<f64> {
    let n = num_bins.max(1);
    let mut edges: Vec<f64> = (0..=n)
        .map(|i| -truncation_level + 2.0 * truncation_level * i as f64 / n as f64)
        .collect();
    edges[n] = truncation_level;
    edges
}

/// Scan every rupture of every source model and build one bounding box per
/// site from the ruptures within the site's integration distance.
pub fn compute_bounding_boxes(
    source_models: &[SourceModel],
    sites: &SiteCollection,
) -> Vec<BoundingBox> {
    let sites: Vec<&Site> = sites.iter().collect();
    sites
        .par_iter()
        .map(|site| {
            let mut bb = BoundingBox::new(site.id);
            let sources = source_models
                .iter()
                .flat_map(|sm| sm.groups.iter())
                .flat_map(|grp| grp.sources.iter());
            for src in sources {
                if src.min_distance(&site.location) > site.max_distance {
                    continue;
                }
                for rup in src.iter_ruptures() {
                    if let Some((dist, closest)) = rup.closest_point(&site.location) {
                        if dist <= site.max_distance {
                            bb.update(dist, closest.lon, closest.lat);
                        }
                    }
                }
            }
            bb
        })
        .collect()
}

/// Per-site edges, keyed by site id. Sites whose box is empty are left out
/// and logged.
pub fn build_bin_edges(
    boxes: &[BoundingBox],
    mag: &[f64],
    eps: &[f64],
    binning: &BinningConfig,
) -> FxHashMap<u32, BinEdges> {
    let dist_width = binning.effective_distance_bin_width();
    let coord_width = binning.effective_coordinate_bin_width();
    let mut out = FxHashMap::default();
    for bb in boxes {
        match bb.bins_edges(dist_width, coord_width) {
            Some(site_edges) => {
                out.insert(
                    bb.site_id,
                    BinEdges {
                        mag: mag.to_vec(),
                        dist: site_edges.dist,
                        lon: site_edges.lon,
                        lat: site_edges.lat,
                        eps: eps.to_vec(),
                    },
                );
            }
            None => {
                tracing::info!(
                    site_id = bb.site_id,
                    "site is farther than the integration distance from every source, skipping"
                );
            }
        }
    }
    out
}
