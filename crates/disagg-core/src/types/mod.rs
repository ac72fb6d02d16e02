//! Data model shared by the engine and the storage layer.

pub mod bins;
pub mod collections;
pub mod curve;
pub mod geo;
pub mod quartet;
pub mod realization;
pub mod result;
pub mod rupture;
pub mod site;
pub mod source_model;

pub use bins::BinEdges;
pub use collections::FxHashMap;
pub use curve::{CurvePoints, HazardCurve, HazardCurves};
pub use geo::Point;
pub use quartet::Quartet;
pub use realization::{Realization, RealizationsAssoc};
pub use result::{DisaggMatrix, DisaggRecord, PmfKind, ResultKey};
pub use rupture::Rupture;
pub use site::{Site, SiteCollection};
pub use source_model::{SourceGroup, SourceModel};
