//! Sites and site collections.

use serde::{Deserialize, Serialize};

use super::geo::Point;
use crate::errors::DisaggError;

/// A site where hazard was computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: u32,
    pub location: Point,
    /// Ruptures farther than this (km) do not contribute to the site.
    pub max_distance: f64,
}

impl Site {
    pub fn new(id: u32, lon: f64, lat: f64, max_distance: f64) -> Self {
        Self {
            id,
            location: Point::new(lon, lat),
            max_distance,
        }
    }
}

/// Ordered, immutable collection of sites with unique ids.
#[derive(Debug, Clone, Default)]
pub struct SiteCollection {
    sites: Vec<Site>,
}

impl SiteCollection {
    pub fn new(sites: Vec<Site>) -> Result<Self, DisaggError> {
        let mut ids: Vec<u32> = sites.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        if let Some(w) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(DisaggError::InvalidInput(format!("duplicate site id {}", w[0])));
        }
        for site in &sites {
            if !(site.max_distance.is_finite() && site.max_distance > 0.0) {
                return Err(DisaggError::InvalidInput(format!(
                    "site {} has a non-positive integration distance",
                    site.id
                )));
            }
        }
        Ok(Self { sites })
    }

    /// Build a collection from (lon, lat) pairs with a shared integration distance.
    pub fn from_locations(locations: &[(f64, f64)], max_distance: f64) -> Result<Self, DisaggError> {
        let sites = locations
            .iter()
            .enumerate()
            .map(|(i, &(lon, lat))| Site::new(i as u32, lon, lat, max_distance))
            .collect();
        Self::new(sites)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Site> {
        self.sites.iter()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Site> {
        self.sites.iter().find(|s| s.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.sites.iter().map(|s| s.id)
    }
}

impl<'a> IntoIterator for &'a SiteCollection {
    type Item = &'a Site;
    type IntoIter = std::slice::Iter<'a, Site>;

    fn into_iter(self) -> Self::IntoIter {
        self.sites.iter()
    }
}
