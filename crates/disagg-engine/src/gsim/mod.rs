//! Ground-motion model registry and the reference lognormal model.

pub mod simple;

pub use simple::{GmpeCoefficients, SimpleLognormalGsim};

use std::sync::Arc;

use disagg_core::errors::DisaggError;
use disagg_core::traits::GroundMotionModel;
use disagg_core::types::FxHashMap;

/// Ground-motion models by name, as referenced by realizations.
#[derive(Debug, Clone, Default)]
pub struct GsimRegistry {
    by_name: FxHashMap<String, Arc<dyn GroundMotionModel>>,
}

impl GsimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `gsim` under its own name, replacing any previous entry.
    pub fn register(&mut self, gsim: Arc<dyn GroundMotionModel>) {
        self.by_name.insert(gsim.name().to_string(), gsim);
    }

    pub fn with(mut self, gsim: Arc<dyn GroundMotionModel>) -> Self {
        self.register(gsim);
        self
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn GroundMotionModel>, DisaggError> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| DisaggError::UnknownGsim {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
