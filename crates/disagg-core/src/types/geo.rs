//! Geographic helpers: points and great-circle distances.

use serde::{Deserialize, Serialize};

use crate::constants::EARTH_RADIUS_KM;

/// A location on the Earth surface, with depth in km (positive down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
    #[serde(default)]
    pub depth: f64,
}

impl Point {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat, depth: 0.0 }
    }

    pub fn with_depth(lon: f64, lat: f64, depth: f64) -> Self {
        Self { lon, lat, depth }
    }

    /// Horizontal great-circle distance to `other` in km.
    pub fn distance_to(&self, other: &Point) -> f64 {
        geodetic_distance(self.lon, self.lat, other.lon, other.lat)
    }
}

/// Haversine distance in km between two (lon, lat) pairs in degrees.
pub fn geodetic_distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (lat1, lat2) = (lat1.to_radians(), lat2.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}
