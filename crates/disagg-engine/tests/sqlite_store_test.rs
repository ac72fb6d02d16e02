//! End to end: calculator output persisted to SQLite and read back.

mod common;

use disagg_core::config::ExecutionMode;
use disagg_core::traits::MemorySink;
use disagg_engine::DisaggregationCalculator;
use disagg_storage::store::load_records;
use disagg_storage::{DatabaseManager, SqliteResultStore};

#[test]
fn stored_records_match_the_in_memory_sink() {
    let config = common::config(ExecutionMode::Sequential);
    let calc = DisaggregationCalculator::new(config.clone()).unwrap();
    let inputs = common::inputs();

    let mut memory = MemorySink::default();
    calc.run_and_store(&inputs, &mut memory).unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let db = DatabaseManager::open(&dir.path().join("disagg.db")).unwrap();
    let mut store = SqliteResultStore::begin(&db, Some(&config)).unwrap();
    let output = calc.run_and_store(&inputs, &mut store).unwrap();
    assert_eq!(store.saved(), output.results.len());
    let run_id = store.finish().unwrap();

    let loaded = load_records(&db, run_id).unwrap();
    assert_eq!(loaded.len(), memory.records.len());
    for (stored, expected) in loaded.iter().zip(&memory.records) {
        assert_eq!(stored.name, expected.name);
        assert_eq!(stored.edges, expected.edges);
        assert_eq!(stored.trts, expected.trts);
        assert_eq!(stored.pmfs.len(), expected.pmfs.len());
        for ((name_a, a), (name_b, b)) in stored.pmfs.iter().zip(&expected.pmfs) {
            assert_eq!(name_a, name_b);
            assert_eq!(a.shape(), b.shape());
            for (x, y) in a.iter().zip(b.iter()) {
                assert!((x - y).abs() < 1e-12, "{name_a}: {x} vs {y}");
            }
        }
    }
}
