//! V001: Initial schema.
//! disagg_run, disagg_result, disagg_matrix.

pub const MIGRATION_SQL: &str = r#"
-- One row per calculation; results hang off it.
CREATE TABLE IF NOT EXISTS disagg_run (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at INTEGER NOT NULL,
    completed_at INTEGER,
    status TEXT NOT NULL,
    num_results INTEGER,
    error TEXT
) STRICT;

CREATE INDEX IF NOT EXISTS idx_disagg_run_started
    ON disagg_run(started_at);

-- One row per result key. Edges, TRT names and the per-view aggregate PoE
-- are JSON; poe is NULL for fixed-level requests.
CREATE TABLE IF NOT EXISTS disagg_result (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES disagg_run(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    site_id INTEGER NOT NULL,
    lon REAL NOT NULL,
    lat REAL NOT NULL,
    rlz_id INTEGER NOT NULL,
    imt TEXT NOT NULL,
    iml REAL NOT NULL,
    poe REAL,
    investigation_time REAL NOT NULL,
    trts_json TEXT NOT NULL,
    edges_json TEXT NOT NULL,
    poe_agg_json TEXT NOT NULL,
    UNIQUE(run_id, site_id, name)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_disagg_result_site
    ON disagg_result(run_id, site_id);
CREATE INDEX IF NOT EXISTS idx_disagg_result_name
    ON disagg_result(name);

-- One row per PMF view: little-endian f64 values in row-major order.
CREATE TABLE IF NOT EXISTS disagg_matrix (
    result_id INTEGER NOT NULL REFERENCES disagg_result(id) ON DELETE CASCADE,
    ordinal INTEGER NOT NULL,
    pmf TEXT NOT NULL,
    shape_json TEXT NOT NULL,
    data BLOB NOT NULL,
    PRIMARY KEY (result_id, pmf)
) STRICT;
"#;
