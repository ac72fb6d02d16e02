//! Distance-based source filtering.

use std::sync::Arc;

use disagg_core::traits::SeismicSource;
use disagg_core::types::{Site, SiteCollection};

/// Keeps the sources within integration distance of at least one site.
#[derive(Debug, Clone, Copy)]
pub struct SourceFilter<'a> {
    sites: &'a SiteCollection,
}

impl<'a> SourceFilter<'a> {
    pub fn new(sites: &'a SiteCollection) -> Self {
        Self { sites }
    }

    /// Sites `source` may contribute to.
    pub fn sites_for<'s>(&'s self, source: &'s dyn SeismicSource) -> impl Iterator<Item = &'a Site> + 's {
        let sites: &'a SiteCollection = self.sites;
        sites
            .iter()
            .filter(move |site| source.min_distance(&site.location) <= site.max_distance)
    }

    pub fn affects(&self, source: &dyn SeismicSource) -> bool {
        self.sites_for(source).next().is_some()
    }

    pub fn filter(&self, sources: Vec<Arc<dyn SeismicSource>>) -> Vec<Arc<dyn SeismicSource>> {
        sources.into_iter().filter(|src| self.affects(src.as_ref())).collect()
    }
}
