//! Builds rupture contexts for the ground-motion models of one source group.

use std::collections::BTreeMap;
use std::sync::Arc;

use disagg_core::errors::DisaggError;
use disagg_core::traits::{GroundMotionModel, RuptureContext};
use disagg_core::types::{Rupture, Site};

use crate::gsim::GsimRegistry;

/// Resolved ground-motion models of a group plus the distance filter.
#[derive(Debug)]
pub struct ContextMaker {
    trt: String,
    gsims: BTreeMap<String, Arc<dyn GroundMotionModel>>,
}

impl ContextMaker {
    /// Resolve every ground-motion model named in `rlzs_by_gsim`.
    pub fn new(
        trt: &str,
        rlzs_by_gsim: &BTreeMap<String, Vec<usize>>,
        registry: &GsimRegistry,
    ) -> Result<Self, DisaggError> {
        let gsims = rlzs_by_gsim
            .keys()
            .map(|name| Ok((name.clone(), registry.get(name)?)))
            .collect::<Result<_, DisaggError>>()?;
        Ok(Self {
            trt: trt.to_string(),
            gsims,
        })
    }

    pub fn trt(&self) -> &str {
        &self.trt
    }

    pub fn gsim(&self, name: &str) -> Result<&Arc<dyn GroundMotionModel>, DisaggError> {
        self.gsims.get(name).ok_or_else(|| DisaggError::UnknownGsim {
            name: name.to_string(),
        })
    }

    /// Context of `rupture` as seen from `site`, or `None` when the rupture
    /// is beyond the site's integration distance.
    pub fn make_context(&self, rupture: &Rupture, site: &Site) -> Option<RuptureContext> {
        let (rjb, closest) = rupture.closest_point(&site.location)?;
        if rjb > site.max_distance {
            return None;
        }
        let rrup = (rjb * rjb + closest.depth * closest.depth).sqrt();
        Some(RuptureContext {
            magnitude: rupture.magnitude,
            rjb,
            rrup,
            closest,
        })
    }
}
