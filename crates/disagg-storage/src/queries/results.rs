//! Queries for disagg_result and disagg_matrix.

use disagg_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// A stored result key with its JSON metadata columns left encoded.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub id: i64,
    pub run_id: i64,
    pub name: String,
    pub site_id: u32,
    pub lon: f64,
    pub lat: f64,
    pub rlz_id: i64,
    pub imt: String,
    pub iml: f64,
    pub poe: Option<f64>,
    pub investigation_time: f64,
    pub trts_json: String,
    pub edges_json: String,
    pub poe_agg_json: String,
}

/// One PMF view of a stored result.
#[derive(Debug, Clone)]
pub struct MatrixRow {
    pub pmf: String,
    pub shape_json: String,
    pub data: Vec<u8>,
}

const RESULT_COLUMNS: &str = "id, run_id, name, site_id, lon, lat, rlz_id, imt, iml, poe,
    investigation_time, trts_json, edges_json, poe_agg_json";

fn map_result(row: &Row<'_>) -> rusqlite::Result<ResultRow> {
    Ok(ResultRow {
        id: row.get(0)?,
        run_id: row.get(1)?,
        name: row.get(2)?,
        site_id: row.get(3)?,
        lon: row.get(4)?,
        lat: row.get(5)?,
        rlz_id: row.get(6)?,
        imt: row.get(7)?,
        iml: row.get(8)?,
        poe: row.get(9)?,
        investigation_time: row.get(10)?,
        trts_json: row.get(11)?,
        edges_json: row.get(12)?,
        poe_agg_json: row.get(13)?,
    })
}

/// Insert a result row; `row.id` is ignored. Returns the new id.
pub fn insert_result(conn: &Connection, row: &ResultRow) -> Result<i64, StorageError> {
    conn.prepare_cached(
        "INSERT INTO disagg_result
            (run_id, name, site_id, lon, lat, rlz_id, imt, iml, poe,
             investigation_time, trts_json, edges_json, poe_agg_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            row.run_id,
            row.name,
            row.site_id,
            row.lon,
            row.lat,
            row.rlz_id,
            row.imt,
            row.iml,
            row.poe,
            row.investigation_time,
            row.trts_json,
            row.edges_json,
            row.poe_agg_json,
        ])
    })
    .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_matrix(
    conn: &Connection,
    result_id: i64,
    ordinal: usize,
    matrix: &MatrixRow,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO disagg_matrix (result_id, ordinal, pmf, shape_json, data)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            result_id,
            ordinal as i64,
            matrix.pmf,
            matrix.shape_json,
            matrix.data,
        ])
    })
    .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    Ok(())
}

/// Every result of a run, ordered by insertion.
pub fn query_by_run(conn: &Connection, run_id: i64) -> Result<Vec<ResultRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {RESULT_COLUMNS} FROM disagg_result WHERE run_id = ?1 ORDER BY id"
        ))
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    let rows = stmt
        .query_map(params![run_id], map_result)
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })
}

pub fn query_by_site(
    conn: &Connection,
    run_id: i64,
    site_id: u32,
) -> Result<Vec<ResultRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {RESULT_COLUMNS} FROM disagg_result
             WHERE run_id = ?1 AND site_id = ?2 ORDER BY id"
        ))
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    let rows = stmt
        .query_map(params![run_id, site_id], map_result)
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })
}

/// Look a result up by its name. Co-located sites share names; the first
/// one stored wins.
pub fn get_by_name(
    conn: &Connection,
    run_id: i64,
    name: &str,
) -> Result<Option<ResultRow>, StorageError> {
    conn.query_row(
        &format!(
            "SELECT {RESULT_COLUMNS} FROM disagg_result
             WHERE run_id = ?1 AND name = ?2 ORDER BY id LIMIT 1"
        ),
        params![run_id, name],
        map_result,
    )
    .optional()
    .map_err(|e| StorageError::SqliteError { message: e.to_string() })
}

/// PMF views of one result, in the order they were stored.
pub fn query_matrices(conn: &Connection, result_id: i64) -> Result<Vec<MatrixRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT pmf, shape_json, data FROM disagg_matrix
             WHERE result_id = ?1 ORDER BY ordinal",
        )
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    let rows = stmt
        .query_map(params![result_id], |row| {
            Ok(MatrixRow {
                pmf: row.get(0)?,
                shape_json: row.get(1)?,
                data: row.get(2)?,
            })
        })
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::SqliteError { message: e.to_string() })
}

pub fn count_by_run(conn: &Connection, run_id: i64) -> Result<i64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM disagg_result WHERE run_id = ?1",
        params![run_id],
        |row| row.get(0),
    )
    .map_err(|e| StorageError::SqliteError { message: e.to_string() })
}
