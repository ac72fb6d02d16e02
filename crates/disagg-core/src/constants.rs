//! Shared constants and compiled defaults.

/// Default magnitude bin width.
pub const DEFAULT_MAG_BIN_WIDTH: f64 = 0.5;

/// Default distance bin width in km.
pub const DEFAULT_DISTANCE_BIN_WIDTH: f64 = 10.0;

/// Default longitude/latitude bin width in degrees.
pub const DEFAULT_COORDINATE_BIN_WIDTH: f64 = 0.5;

/// Default number of epsilon bins.
pub const DEFAULT_NUM_EPSILON_BINS: usize = 3;

/// Default truncation level of the ground-motion distribution, in standard deviations.
pub const DEFAULT_TRUNCATION_LEVEL: f64 = 3.0;

/// Default maximum source-to-site integration distance in km.
pub const DEFAULT_MAXIMUM_DISTANCE: f64 = 200.0;

/// Default investigation time in years.
pub const DEFAULT_INVESTIGATION_TIME: f64 = 50.0;

/// Default weight multiplier for point-source ruptures.
pub const DEFAULT_POINT_SOURCE_WEIGHT: f64 = 0.1;

/// Default tolerance of the cross-view aggregate PoE check.
pub const DEFAULT_SANITY_TOLERANCE: f64 = 1e-6;

/// Mean Earth radius in km.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
