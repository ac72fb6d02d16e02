//! Reference seismic sources.

pub mod area;
pub mod mfd;
pub mod point;

pub use area::AreaSource;
pub use mfd::Mfd;
pub use point::PointSource;
