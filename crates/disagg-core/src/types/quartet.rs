//! Quartets: the unit of disaggregation work per site.

use serde::{Deserialize, Serialize};

/// (PoE threshold, ground-motion model, IMT, realization).
///
/// `poe` is `None` when the level comes from a fixed `iml_disagg` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quartet {
    pub poe: Option<f64>,
    pub gsim: String,
    pub imt: String,
    pub rlz_id: usize,
}
