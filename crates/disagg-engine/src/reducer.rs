//! Order-independent reduction of partial disaggregation results.

use std::collections::BTreeMap;

use ndarray::Zip;

use disagg_core::errors::DisaggError;
use disagg_core::types::{DisaggMatrix, ResultKey};

/// Output of one task.
#[derive(Debug, Clone, Default)]
pub struct PartialResult {
    pub task_no: usize,
    pub results: BTreeMap<ResultKey, DisaggMatrix>,
}

/// Merge `incoming` into `existing` with `1 - (1 - a)(1 - b)`, view by view.
///
/// Both matrices must carry the same views with the same shapes.
pub fn combine_into(existing: &mut DisaggMatrix, incoming: &DisaggMatrix, key: &ResultKey) -> Result<(), DisaggError> {
    if existing.views().len() != incoming.views().len() {
        return Err(DisaggError::ShapeMismatch {
            what: format!("number of PMF views for site {} rlz {}", key.site_id, key.rlz_id),
            expected: vec![existing.views().len()],
            actual: vec![incoming.views().len()],
        });
    }
    for ((kind, acc), (other_kind, add)) in existing.views_mut().iter_mut().zip(incoming.views()) {
        if kind != other_kind || acc.shape() != add.shape() {
            return Err(DisaggError::ShapeMismatch {
                what: format!("{} view for site {} rlz {}", kind.name(), key.site_id, key.rlz_id),
                expected: acc.shape().to_vec(),
                actual: add.shape().to_vec(),
            });
        }
        Zip::from(acc).and(add).for_each(|a, &b| *a = 1.0 - (1.0 - *a) * (1.0 - b));
    }
    Ok(())
}

/// Final results being built on the controller thread.
#[derive(Debug, Default)]
pub struct Accumulator {
    results: BTreeMap<ResultKey, DisaggMatrix>,
    tasks_merged: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one task's output into the accumulator.
    pub fn merge(&mut self, partial: PartialResult) -> Result<(), DisaggError> {
        for (key, matrix) in partial.results {
            match self.results.get_mut(&key) {
                Some(existing) => combine_into(existing, &matrix, &key)?,
                None => {
                    self.results.insert(key, matrix);
                }
            }
        }
        self.tasks_merged += 1;
        tracing::trace!(
            task_no = partial.task_no,
            tasks_merged = self.tasks_merged,
            keys = self.results.len(),
            "merged partial result"
        );
        Ok(())
    }

    pub fn tasks_merged(&self) -> usize {
        self.tasks_merged
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> &BTreeMap<ResultKey, DisaggMatrix> {
        &self.results
    }

    pub fn into_results(self) -> BTreeMap<ResultKey, DisaggMatrix> {
        self.results
    }
}
