//! `DisaggResultSink` backed by SQLite, plus loading records back.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use disagg_core::config::DisaggConfig;
use disagg_core::errors::{DisaggError, StorageError};
use disagg_core::traits::DisaggResultSink;
use disagg_core::types::{BinEdges, DisaggRecord};

use crate::blob::{decode_array, encode_array};
use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::queries::results::{self, MatrixRow, ResultRow};
use crate::queries::runs;

/// Writes the records of one run. Each record is one transaction, so a
/// failed run keeps what was saved before the failure.
pub struct SqliteResultStore<'a> {
    db: &'a DatabaseManager,
    run_id: i64,
    saved: usize,
}

impl<'a> SqliteResultStore<'a> {
    /// Open a new run, recording the resolved configuration when given.
    pub fn begin(db: &'a DatabaseManager, config: Option<&DisaggConfig>) -> Result<Self, StorageError> {
        let config_toml = config
            .map(|c| {
                c.to_toml().map_err(|e| StorageError::Serialization {
                    message: e.to_string(),
                })
            })
            .transpose()?;
        let run_id = db.with_writer(|conn| {
            runs::insert_run_start(conn, unix_now(), config_toml.as_deref())
        })?;
        tracing::info!(run_id, "started disaggregation run");
        Ok(Self { db, run_id, saved: 0 })
    }

    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    /// Records saved so far.
    pub fn saved(&self) -> usize {
        self.saved
    }

    /// Mark the run completed and checkpoint the WAL.
    pub fn finish(self) -> Result<i64, StorageError> {
        self.close("completed", None)?;
        if self.db.path().is_some() {
            self.db.checkpoint()?;
        }
        tracing::info!(run_id = self.run_id, saved = self.saved, "completed disaggregation run");
        Ok(self.run_id)
    }

    /// Mark the run failed, keeping the records already saved.
    pub fn fail(self, error: &dyn fmt::Display) -> Result<i64, StorageError> {
        let message = error.to_string();
        self.close("failed", Some(&message))?;
        tracing::warn!(run_id = self.run_id, saved = self.saved, error = %message, "disaggregation run failed");
        Ok(self.run_id)
    }

    fn close(&self, status: &str, error: Option<&str>) -> Result<(), StorageError> {
        self.db.with_writer(|conn| {
            runs::update_run_complete(conn, self.run_id, unix_now(), self.saved as i64, status, error)
        })
    }

    fn write(&self, record: &DisaggRecord) -> Result<(), StorageError> {
        let row = ResultRow {
            id: 0,
            run_id: self.run_id,
            name: record.name.clone(),
            site_id: record.site_id,
            lon: record.lon,
            lat: record.lat,
            rlz_id: record.rlz_id as i64,
            imt: record.imt.clone(),
            iml: record.iml,
            poe: record.poe,
            investigation_time: record.investigation_time,
            trts_json: to_json(&record.trts)?,
            edges_json: to_json(&record.edges)?,
            poe_agg_json: to_json(&record.poe_agg)?,
        };
        let matrices = record
            .pmfs
            .iter()
            .map(|(pmf, array)| {
                let (shape, data) = encode_array(array);
                Ok(MatrixRow {
                    pmf: pmf.clone(),
                    shape_json: to_json(&shape)?,
                    data,
                })
            })
            .collect::<Result<Vec<_>, StorageError>>()?;

        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                let result_id = results::insert_result(tx, &row)?;
                for (ordinal, matrix) in matrices.iter().enumerate() {
                    results::insert_matrix(tx, result_id, ordinal, matrix)?;
                }
                Ok(())
            })
        })
    }
}

impl DisaggResultSink for SqliteResultStore<'_> {
    fn save(&mut self, record: &DisaggRecord) -> Result<(), DisaggError> {
        self.write(record)?;
        self.saved += 1;
        tracing::debug!(name = %record.name, views = record.pmfs.len(), "saved disaggregation record");
        Ok(())
    }
}

/// Every record of a run, in the order they were saved.
pub fn load_records(db: &DatabaseManager, run_id: i64) -> Result<Vec<DisaggRecord>, StorageError> {
    db.with_reader(|conn| {
        results::query_by_run(conn, run_id)?
            .into_iter()
            .map(|row| {
                let matrices = results::query_matrices(conn, row.id)?;
                record_from_rows(row, matrices)
            })
            .collect()
    })
}

/// The record named `name` in a run.
pub fn load_record(db: &DatabaseManager, run_id: i64, name: &str) -> Result<DisaggRecord, StorageError> {
    db.with_reader(|conn| {
        let row = results::get_by_name(conn, run_id, name)?.ok_or_else(|| StorageError::NotFound {
            what: format!("result '{name}' in run {run_id}"),
        })?;
        let matrices = results::query_matrices(conn, row.id)?;
        record_from_rows(row, matrices)
    })
}

fn record_from_rows(row: ResultRow, matrices: Vec<MatrixRow>) -> Result<DisaggRecord, StorageError> {
    let pmfs = matrices
        .into_iter()
        .map(|m| {
            let shape: Vec<usize> = from_json(&m.shape_json)?;
            Ok((m.pmf, decode_array(&shape, &m.data)?))
        })
        .collect::<Result<Vec<_>, StorageError>>()?;
    let edges: BinEdges = from_json(&row.edges_json)?;
    Ok(DisaggRecord {
        name: row.name,
        site_id: row.site_id,
        lon: row.lon,
        lat: row.lat,
        rlz_id: usize::try_from(row.rlz_id).map_err(|e| StorageError::Serialization {
            message: format!("realization id {}: {e}", row.rlz_id),
        })?,
        imt: row.imt,
        iml: row.iml,
        poe: row.poe,
        investigation_time: row.investigation_time,
        trts: from_json(&row.trts_json)?,
        edges,
        pmfs,
        poe_agg: from_json(&row.poe_agg_json)?,
    })
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::Serialization {
        message: e.to_string(),
    })
}

fn from_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, StorageError> {
    serde_json::from_str(text).map_err(|e| StorageError::Serialization {
        message: e.to_string(),
    })
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
