//! Per-site bounding box of the ruptures within integration distance.

/// Extent of the contributing ruptures around one site.
///
/// Non-negative and negative longitudes are tracked apart so that the box
/// can be placed on a continuous frame afterwards, whatever order the
/// ruptures arrive in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub site_id: u32,
    min_dist: f64,
    max_dist: f64,
    east_side: Option<(f64, f64)>,
    west_side: Option<(f64, f64)>,
    south: f64,
    north: f64,
}

/// Edges of the site-specific axes.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteEdges {
    pub dist: Vec<f64>,
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
}

impl BoundingBox {
    pub fn new(site_id: u32) -> Self {
        Self {
            site_id,
            min_dist: f64::INFINITY,
            max_dist: f64::NEG_INFINITY,
            east_side: None,
            west_side: None,
            south: f64::INFINITY,
            north: f64::NEG_INFINITY,
        }
    }

    /// Extend the box with one rupture at distance `dist` whose closest
    /// point is (`lon`, `lat`).
    pub fn update(&mut self, dist: f64, lon: f64, lat: f64) {
        self.min_dist = self.min_dist.min(dist);
        self.max_dist = self.max_dist.max(dist);
        let side = if lon >= 0.0 {
            &mut self.east_side
        } else {
            &mut self.west_side
        };
        *side = Some(match *side {
            Some((lo, hi)) => (lo.min(lon), hi.max(lon)),
            None => (lon, lon),
        });
        self.south = self.south.min(lat);
        self.north = self.north.max(lat);
    }

    /// True when no rupture was ever added.
    pub fn is_empty(&self) -> bool {
        self.east_side.is_none() && self.west_side.is_none()
    }

    /// (min, max) distance, `None` when empty.
    pub fn distance_range(&self) -> Option<(f64, f64)> {
        (!self.is_empty()).then_some((self.min_dist, self.max_dist))
    }

    /// (west, east) on a continuous frame; `east` exceeds 180 when the box
    /// crosses the antimeridian.
    pub fn longitude_range(&self) -> Option<(f64, f64)> {
        match (self.west_side, self.east_side) {
            (None, None) => None,
            (Some(w), None) => Some(w),
            (None, Some(e)) => Some(e),
            (Some((neg_lo, neg_hi)), Some((pos_lo, pos_hi))) => {
                if pos_hi - neg_lo <= 180.0 {
                    Some((neg_lo, pos_hi))
                } else {
                    Some((pos_lo, neg_hi + 360.0))
                }
            }
        }
    }

    pub fn latitude_range(&self) -> Option<(f64, f64)> {
        (!self.is_empty()).then_some((self.south, self.north))
    }

    /// Distance, longitude and latitude edges at the given widths.
    pub fn bins_edges(&self, dist_width: f64, coord_width: f64) -> Option<SiteEdges> {
        let (min_dist, max_dist) = self.distance_range()?;
        let (west, east) = self.longitude_range()?;
        let (south, north) = self.latitude_range()?;
        Some(SiteEdges {
            dist: super::aligned_edges(min_dist.max(0.0), max_dist, dist_width),
            lon: super::aligned_edges(west, east, coord_width),
            lat: super::aligned_edges(south, north, coord_width),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_has_no_edges() {
        let bb = BoundingBox::new(3);
        assert!(bb.is_empty());
        assert!(bb.bins_edges(10.0, 0.5).is_none());
    }

    #[test]
    fn plain_box() {
        let mut bb = BoundingBox::new(0);
        bb.update(12.0, 10.2, 45.1);
        bb.update(37.0, 10.9, 44.6);
        let edges = bb.bins_edges(10.0, 0.5).unwrap();
        assert_eq!(edges.dist, vec![10.0, 20.0, 30.0, 40.0]);
        assert_eq!(edges.lon, vec![10.0, 10.5, 11.0]);
        assert_eq!(edges.lat, vec![44.5, 45.0, 45.5]);
    }

    #[test]
    fn antimeridian_is_shifted_regardless_of_order() {
        let mut a = BoundingBox::new(0);
        a.update(5.0, 179.6, 0.0);
        a.update(5.0, -179.7, 0.0);
        let mut b = BoundingBox::new(0);
        b.update(5.0, -179.7, 0.0);
        b.update(5.0, 179.6, 0.0);
        assert_eq!(a.longitude_range(), b.longitude_range());
        let (west, east) = a.longitude_range().unwrap();
        assert_eq!(west, 179.6);
        assert!((east - 180.3).abs() < 1e-9);
    }

    #[test]
    fn greenwich_is_not_shifted() {
        let mut bb = BoundingBox::new(0);
        bb.update(5.0, -0.4, 51.0);
        bb.update(5.0, 0.3, 51.0);
        assert_eq!(bb.longitude_range(), Some((-0.4, 0.3)));
    }
}
