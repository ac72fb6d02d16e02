//! Round-trips disaggregation records through the SQLite result store.

use disagg_core::config::DisaggConfig;
use disagg_core::errors::{DisaggErrorCode, StorageError};
use disagg_core::traits::DisaggResultSink;
use disagg_core::types::{BinEdges, DisaggRecord};
use disagg_storage::connection::pragmas::verify_wal_mode;
use disagg_storage::queries::{results, runs};
use disagg_storage::store::{load_record, load_records};
use disagg_storage::{DatabaseManager, SqliteResultStore};
use ndarray::{ArrayD, IxDyn};

fn record(name: &str, site_id: u32, poe: Option<f64>) -> DisaggRecord {
    let mag_dist = ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![0.01, 0.02, 0.0, 0.03, 0.004, 0.1])
        .unwrap();
    let trt = ArrayD::from_shape_vec(IxDyn(&[2]), vec![0.12, 0.05]).unwrap();
    DisaggRecord {
        name: name.to_string(),
        site_id,
        lon: 10.5,
        lat: 45.25,
        rlz_id: 3,
        imt: "SA(1.0)".to_string(),
        iml: 0.123456789,
        poe,
        investigation_time: 50.0,
        trts: vec!["Active Shallow Crust".to_string(), "Stable Continental Region".to_string()],
        edges: BinEdges {
            mag: vec![5.0, 5.5, 6.0],
            dist: vec![0.0, 10.0, 20.0, 30.0],
            lon: vec![10.0, 11.0],
            lat: vec![45.0, 46.0],
            eps: vec![-3.0, 0.0, 3.0],
        },
        pmfs: vec![("Mag_Dist".to_string(), mag_dist), ("TRT".to_string(), trt)],
        poe_agg: vec![0.1634, 0.1634],
    }
}

#[test]
fn records_roundtrip_in_memory() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let mut store = SqliteResultStore::begin(&db, None).unwrap();
    let a = record("disagg/poe-0.1-rlz-3-SA(1.0)-10.5-45.25", 0, Some(0.1));
    let b = record("disagg/rlz-3-SA(1.0)-10.5-45.25", 1, None);
    store.save(&a).unwrap();
    store.save(&b).unwrap();
    assert_eq!(store.saved(), 2);
    let run_id = store.finish().unwrap();

    let loaded = load_records(&db, run_id).unwrap();
    assert_eq!(loaded, vec![a.clone(), b]);
    // View order survives, not just the set of views.
    assert_eq!(loaded[0].pmfs[0].0, "Mag_Dist");
    assert_eq!(loaded[0].pmfs[0].1.shape(), &[2, 3]);

    let single = load_record(&db, run_id, &a.name).unwrap();
    assert_eq!(single, a);
}

#[test]
fn missing_record_is_not_found() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let store = SqliteResultStore::begin(&db, None).unwrap();
    let run_id = store.finish().unwrap();
    let err = load_record(&db, run_id, "disagg/nope").unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
    assert_eq!(err.error_code(), "STORAGE_ERROR");
}

#[test]
fn run_lifecycle_is_recorded() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let mut config = DisaggConfig::default();
    config.calculation.poes_disagg = vec![0.1];

    let mut store = SqliteResultStore::begin(&db, Some(&config)).unwrap();
    let run_id = store.run_id();
    let running = db.with_reader(|conn| runs::get_run(conn, run_id)).unwrap().unwrap();
    assert_eq!(running.status, "running");
    assert!(running.completed_at.is_none());

    store.save(&record("disagg/a", 0, Some(0.1))).unwrap();
    store.finish().unwrap();

    let done = db.with_reader(|conn| runs::get_run(conn, run_id)).unwrap().unwrap();
    assert_eq!(done.status, "completed");
    assert_eq!(done.num_results, Some(1));
    assert!(done.completed_at.is_some());
    let stored = DisaggConfig::from_toml(done.config_toml.as_deref().unwrap()).unwrap();
    assert_eq!(stored.calculation.poes_disagg, vec![0.1]);
}

#[test]
fn failed_run_keeps_saved_records() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let mut store = SqliteResultStore::begin(&db, None).unwrap();
    store.save(&record("disagg/a", 0, Some(0.1))).unwrap();
    let run_id = store.fail(&"task 3 failed").unwrap();

    let run = db.with_reader(|conn| runs::get_run(conn, run_id)).unwrap().unwrap();
    assert_eq!(run.status, "failed");
    assert_eq!(run.error.as_deref(), Some("task 3 failed"));
    assert_eq!(run.num_results, Some(1));
    assert_eq!(db.with_reader(|conn| results::count_by_run(conn, run_id)).unwrap(), 1);
}

#[test]
fn duplicate_name_for_same_site_is_rejected_atomically() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let mut store = SqliteResultStore::begin(&db, None).unwrap();
    let r = record("disagg/a", 0, Some(0.1));
    store.save(&r).unwrap();
    assert!(store.save(&r).is_err());
    let run_id = store.run_id();
    assert_eq!(store.saved(), 1);

    // The failed insert left no orphan matrices behind.
    let matrices: i64 = db
        .with_reader(|conn| {
            conn.query_row("SELECT COUNT(*) FROM disagg_matrix", [], |row| row.get(0))
                .map_err(|e| StorageError::SqliteError { message: e.to_string() })
        })
        .unwrap();
    assert_eq!(matrices, 2);
    assert_eq!(db.with_reader(|conn| results::count_by_run(conn, run_id)).unwrap(), 1);
}

#[test]
fn on_disk_database_reads_through_the_pool() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("disagg.db");
    let r = record("disagg/a", 7, Some(0.02));

    let run_id = {
        let db = DatabaseManager::open(&path).unwrap();
        assert!(db.with_writer(|conn| verify_wal_mode(conn)).unwrap());
        let mut store = SqliteResultStore::begin(&db, None).unwrap();
        store.save(&r).unwrap();
        let run_id = store.finish().unwrap();
        let by_site = db.with_reader(|conn| results::query_by_site(conn, run_id, 7)).unwrap();
        assert_eq!(by_site.len(), 1);
        run_id
    };

    // Reopening runs no migration twice and sees the committed data.
    let db = DatabaseManager::open(&path).unwrap();
    assert_eq!(load_records(&db, run_id).unwrap(), vec![r]);
}
