//! Re-exports of performance-oriented collection types.

pub use rustc_hash::FxHashMap;
pub use smallvec::SmallVec;

/// SmallVec sized for rupture surfaces (point ruptures have one node).
pub type SmallVec4<T> = SmallVec<[T; 4]>;
