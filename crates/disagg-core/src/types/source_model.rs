//! Source models and tectonic-region groups.

use std::sync::Arc;

use crate::traits::SeismicSource;

/// Sources sharing a tectonic region type (and so a ground-motion assignment).
#[derive(Debug, Clone)]
pub struct SourceGroup {
    pub id: usize,
    pub trt: String,
    pub sources: Vec<Arc<dyn SeismicSource>>,
}

impl SourceGroup {
    /// (min, max) magnitude over the group, `None` when empty.
    pub fn magnitude_range(&self) -> Option<(f64, f64)> {
        self.sources
            .iter()
            .map(|s| s.magnitude_range())
            .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
    }
}

/// One branch of the source-model logic tree.
#[derive(Debug, Clone)]
pub struct SourceModel {
    pub ordinal: usize,
    pub name: String,
    pub groups: Vec<SourceGroup>,
}
