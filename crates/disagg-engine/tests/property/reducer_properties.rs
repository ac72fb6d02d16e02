use std::collections::BTreeMap;
use std::sync::Arc;

use ndarray::{ArrayD, IxDyn};
use proptest::prelude::*;

use disagg_core::types::{DisaggMatrix, PmfKind, ResultKey};
use disagg_engine::reducer::{Accumulator, PartialResult};

fn key() -> ResultKey {
    ResultKey {
        site_id: 0,
        rlz_id: 0,
        poe: Some(0.1),
        imt: "PGA".to_string(),
        iml: 0.2,
        trts: Arc::from(vec!["Active Shallow Crust".to_string()]),
    }
}

fn partial(task_no: usize, values: &[f64]) -> PartialResult {
    let array = ArrayD::from_shape_vec(IxDyn(&[values.len()]), values.to_vec()).unwrap();
    PartialResult {
        task_no,
        results: BTreeMap::from([(key(), DisaggMatrix::new(vec![(PmfKind::Mag, array)]))]),
    }
}

fn reduce<T: AsRef<[f64]>>(parts: &[T]) -> Vec<f64> {
    let mut acc = Accumulator::new();
    for (i, p) in parts.iter().enumerate() {
        acc.merge(partial(i, p.as_ref())).unwrap();
    }
    acc.results()[&key()].get(PmfKind::Mag).unwrap().iter().copied().collect()
}

fn arb_pmf() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..1.0, 4)
}

// ── Commutativity ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn merge_is_commutative(a in arb_pmf(), b in arb_pmf()) {
        let ab = reduce(&[&a, &b]);
        let ba = reduce(&[&b, &a]);
        for (x, y) in ab.iter().zip(&ba) {
            prop_assert!((x - y).abs() < 1e-12, "{} vs {}", x, y);
        }
    }
}

// ── Associativity ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn merge_is_associative(a in arb_pmf(), b in arb_pmf(), c in arb_pmf()) {
        let left = reduce(&[&reduce(&[&a, &b]), &c]);
        let right = reduce(&[&a, &reduce(&[&b, &c])]);
        for (x, y) in left.iter().zip(&right) {
            prop_assert!((x - y).abs() < 1e-12, "{} vs {}", x, y);
        }
    }
}

// ── Bounds ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn merged_values_stay_in_unit_interval(a in arb_pmf(), b in arb_pmf()) {
        let merged = reduce(&[&a, &b]);
        for ((m, x), y) in merged.iter().zip(&a).zip(&b) {
            prop_assert!(*m >= x.max(*y) - 1e-12);
            prop_assert!(*m <= 1.0);
        }
    }
}
