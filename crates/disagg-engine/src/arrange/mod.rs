//! Arranges per-rupture bin data into dense PMF matrices.

pub mod pmf;

pub use pmf::{pmf_view, pmf_views};

use ndarray::{ArrayD, IxDyn};

use disagg_core::errors::{BinAxis, DisaggError};
use disagg_core::types::{BinEdges, DisaggMatrix, PmfKind};

use crate::collector::SiteBinData;

/// Index of the bin of `edges` holding `value`.
///
/// Bins are half-open except the last one, which also holds its upper edge.
/// Values outside the edges (NaN included) are an error.
pub fn bin_index(value: f64, edges: &[f64], axis: BinAxis, site_id: u32) -> Result<usize, DisaggError> {
    let n = edges.len();
    let out_of_range = || DisaggError::BinRangeViolation {
        site_id,
        axis,
        value,
        low: edges.first().copied().unwrap_or(f64::NAN),
        high: edges.last().copied().unwrap_or(f64::NAN),
    };
    if n < 2 {
        return Err(out_of_range());
    }
    let (low, high) = (edges[0], edges[n - 1]);
    if !(value >= low && value <= high) {
        return Err(out_of_range());
    }
    if value == high {
        return Ok(n - 2);
    }
    Ok(edges.partition_point(|&e| e <= value) - 1)
}

/// Moves a longitude onto the frame of `lon_edges`, which reach 180 or
/// beyond when the site's box crosses the antimeridian. -180 and 180 are
/// the same meridian, so a last edge of exactly 180 still takes -180.
fn to_edges_frame(lon: f64, lon_edges: &[f64]) -> f64 {
    match (lon_edges.first(), lon_edges.last()) {
        (Some(&first), Some(&last)) if lon < first && lon + 360.0 <= last => lon + 360.0,
        _ => lon,
    }
}

/// Joint (mag, dist, lon, lat, eps, trt) matrix of one quartet at one site.
///
/// `pnes` holds one row of epsilon-bin PNEs per rupture of `data`. Each
/// cell ends up as `1 - Π pne` over the ruptures falling in it.
pub fn arrange_joint(
    site_id: u32,
    data: &SiteBinData,
    pnes: &[f64],
    edges: &BinEdges,
    num_trts: usize,
) -> Result<ArrayD<f64>, DisaggError> {
    let shape = edges.shape(num_trts);
    let num_eps = shape[4];
    let num_ruptures = data.len();
    if pnes.len() != num_ruptures * num_eps {
        return Err(DisaggError::ShapeMismatch {
            what: format!("PNEs of site {site_id}"),
            expected: vec![num_ruptures, num_eps],
            actual: vec![pnes.len()],
        });
    }

    let mut joint = ArrayD::<f64>::ones(IxDyn(&shape));
    for r in 0..num_ruptures {
        let m = bin_index(data.mags[r], &edges.mag, BinAxis::Magnitude, site_id)?;
        let d = bin_index(data.dists[r], &edges.dist, BinAxis::Distance, site_id)?;
        let lon = to_edges_frame(data.lons[r], &edges.lon);
        let lo = bin_index(lon, &edges.lon, BinAxis::Longitude, site_id)?;
        let la = bin_index(data.lats[r], &edges.lat, BinAxis::Latitude, site_id)?;
        let t = data.trts[r];
        if t >= num_trts {
            return Err(DisaggError::BinRangeViolation {
                site_id,
                axis: BinAxis::TectonicRegion,
                value: t as f64,
                low: 0.0,
                high: num_trts as f64,
            });
        }
        for (e, &pne) in pnes[r * num_eps..(r + 1) * num_eps].iter().enumerate() {
            joint[[m, d, lo, la, e, t].as_slice()] *= pne;
        }
    }
    joint.mapv_inplace(|pne| 1.0 - pne);
    Ok(joint)
}

/// Arrange `data` and compute the requested PMF views.
pub fn arrange_in_bins(
    site_id: u32,
    data: &SiteBinData,
    pnes: &[f64],
    edges: &BinEdges,
    num_trts: usize,
    views: &[PmfKind],
) -> Result<DisaggMatrix, DisaggError> {
    let joint = arrange_joint(site_id, data, pnes, edges, num_trts)?;
    Ok(DisaggMatrix::new(pmf_views(views, &joint)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges() -> BinEdges {
        BinEdges {
            mag: vec![5.0, 6.0, 7.0],
            dist: vec![0.0, 10.0, 20.0],
            lon: vec![179.5, 180.0, 180.5],
            lat: vec![0.0, 0.5],
            eps: vec![-3.0, 3.0],
        }
    }

    #[test]
    fn last_edge_belongs_to_last_bin() {
        let e = [0.0, 10.0, 20.0];
        assert_eq!(bin_index(0.0, &e, BinAxis::Distance, 0).unwrap(), 0);
        assert_eq!(bin_index(10.0, &e, BinAxis::Distance, 0).unwrap(), 1);
        assert_eq!(bin_index(20.0, &e, BinAxis::Distance, 0).unwrap(), 1);
    }

    #[test]
    fn out_of_range_is_an_error() {
        let e = [0.0, 10.0];
        for v in [-0.1, 10.1, f64::NAN] {
            let err = bin_index(v, &e, BinAxis::Distance, 7).unwrap_err();
            assert!(matches!(err, DisaggError::BinRangeViolation { site_id: 7, axis: BinAxis::Distance, .. }));
        }
    }

    #[test]
    fn two_ruptures_in_one_cell() {
        let mut data = SiteBinData::default();
        data.push(5.5, 5.0, 179.7, 0.2, 0);
        data.push(5.6, 6.0, 179.8, 0.3, 0);
        let joint = arrange_joint(0, &data, &[0.9, 0.8], &edges(), 1).unwrap();
        assert!((joint[[0, 0, 0, 0, 0, 0].as_slice()] - 0.28).abs() < 1e-12);
        assert_eq!(joint.iter().filter(|&&v| v != 0.0).count(), 1);
    }

    #[test]
    fn negative_longitudes_land_on_the_shifted_frame() {
        let mut data = SiteBinData::default();
        data.push(6.5, 15.0, -179.8, 0.1, 0);
        let joint = arrange_joint(0, &data, &[0.5], &edges(), 1).unwrap();
        assert!((joint[[1, 1, 1, 0, 0, 0].as_slice()] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn minus_180_lands_on_a_last_edge_of_180() {
        let mut e = edges();
        e.lon = vec![179.5, 180.0];
        let mut data = SiteBinData::default();
        data.push(5.5, 5.0, -180.0, 0.2, 0);
        data.push(5.5, 5.0, 179.9, 0.2, 0);
        let joint = arrange_joint(0, &data, &[0.5, 0.5], &e, 1).unwrap();
        assert!((joint[[0, 0, 0, 0, 0, 0].as_slice()] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn western_longitude_off_the_shifted_frame_is_an_error() {
        let mut data = SiteBinData::default();
        data.push(5.5, 5.0, -179.0, 0.2, 0);
        let err = arrange_joint(0, &data, &[0.5], &edges(), 1).unwrap_err();
        assert!(matches!(err, DisaggError::BinRangeViolation { axis: BinAxis::Longitude, .. }));
    }

    #[test]
    fn rupture_outside_the_edges_is_not_dropped() {
        let mut data = SiteBinData::default();
        data.push(7.5, 5.0, 179.7, 0.2, 0);
        let err = arrange_joint(0, &data, &[0.9], &edges(), 1).unwrap_err();
        assert!(matches!(err, DisaggError::BinRangeViolation { axis: BinAxis::Magnitude, .. }));
    }
}
