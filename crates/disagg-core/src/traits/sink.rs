//! Destination of final disaggregation records.

use crate::errors::DisaggError;
use crate::types::DisaggRecord;

/// Persists disaggregation records. Called on the controller thread only.
pub trait DisaggResultSink {
    fn save(&mut self, record: &DisaggRecord) -> Result<(), DisaggError>;
}

/// Keeps records in memory; used by tests and small in-process runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<DisaggRecord>,
}

impl DisaggResultSink for MemorySink {
    fn save(&mut self, record: &DisaggRecord) -> Result<(), DisaggError> {
        self.records.push(record.clone());
        Ok(())
    }
}
