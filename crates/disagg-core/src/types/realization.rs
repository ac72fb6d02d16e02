//! Logic-tree realizations and their association with ground-motion models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::DisaggError;

/// One end-branch of the logic tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Realization {
    pub ordinal: usize,
    pub source_model: usize,
    pub weight: f64,
    /// Ground-motion model name per tectonic region type.
    pub gsim_by_trt: BTreeMap<String, String>,
}

/// Lookup helpers over the realizations of a calculation.
#[derive(Debug, Clone, Default)]
pub struct RealizationsAssoc {
    realizations: Vec<Realization>,
}

impl RealizationsAssoc {
    pub fn new(realizations: Vec<Realization>) -> Self {
        Self { realizations }
    }

    pub fn realizations(&self) -> &[Realization] {
        &self.realizations
    }

    pub fn len(&self) -> usize {
        self.realizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.realizations.is_empty()
    }

    /// Realizations belonging to source model `sm_id`.
    pub fn rlzs_by_smodel(&self, sm_id: usize) -> impl Iterator<Item = &Realization> {
        self.realizations.iter().filter(move |r| r.source_model == sm_id)
    }

    /// Realization ordinals per ground-motion model for the group `trt` of
    /// source model `sm_id`.
    pub fn rlzs_by_gsim(&self, trt: &str, sm_id: usize) -> Result<BTreeMap<String, Vec<usize>>, DisaggError> {
        let mut out: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for rlz in self.rlzs_by_smodel(sm_id) {
            let gsim = rlz.gsim_by_trt.get(trt).ok_or_else(|| {
                DisaggError::InvalidInput(format!(
                    "realization #{} has no ground-motion model for '{trt}'",
                    rlz.ordinal
                ))
            })?;
            out.entry(gsim.clone()).or_default().push(rlz.ordinal);
        }
        Ok(out)
    }
}
