//! Queries for the disagg_run table.

use disagg_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// A calculation run.
#[derive(Debug, Clone)]
pub struct RunRow {
    pub id: i64,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub status: String,
    pub num_results: Option<i64>,
    pub error: Option<String>,
    pub config_toml: Option<String>,
}

const RUN_COLUMNS: &str =
    "id, started_at, completed_at, status, num_results, error, config_toml";

fn map_run(row: &Row<'_>) -> rusqlite::Result<RunRow> {
    Ok(RunRow {
        id: row.get(0)?,
        started_at: row.get(1)?,
        completed_at: row.get(2)?,
        status: row.get(3)?,
        num_results: row.get(4)?,
        error: row.get(5)?,
        config_toml: row.get(6)?,
    })
}

/// Insert a new run (status = 'running'). Returns the row id.
pub fn insert_run_start(
    conn: &Connection,
    started_at: i64,
    config_toml: Option<&str>,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO disagg_run (started_at, status, config_toml) VALUES (?1, 'running', ?2)",
        params![started_at, config_toml],
    )
    .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    Ok(conn.last_insert_rowid())
}

/// Close a run with its final status.
pub fn update_run_complete(
    conn: &Connection,
    id: i64,
    completed_at: i64,
    num_results: i64,
    status: &str,
    error: Option<&str>,
) -> Result<(), StorageError> {
    let updated = conn
        .execute(
            "UPDATE disagg_run SET completed_at = ?1, num_results = ?2, status = ?3, error = ?4
             WHERE id = ?5",
            params![completed_at, num_results, status, error, id],
        )
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    if updated == 0 {
        return Err(StorageError::NotFound { what: format!("run {id}") });
    }
    Ok(())
}

pub fn get_run(conn: &Connection, id: i64) -> Result<Option<RunRow>, StorageError> {
    conn.query_row(
        &format!("SELECT {RUN_COLUMNS} FROM disagg_run WHERE id = ?1"),
        params![id],
        map_run,
    )
    .optional()
    .map_err(|e| StorageError::SqliteError { message: e.to_string() })
}
