//! Partitioning and per-task collection.

mod common;

use disagg_core::config::ExecutionMode;
use disagg_engine::collector::{collect_bins_data, compute_disagg};
use disagg_engine::executor::{SequentialExecutor, TaskExecutor};
use disagg_engine::reducer::Accumulator;
use disagg_engine::DisaggregationCalculator;

fn plan() -> disagg_engine::TaskPlan {
    DisaggregationCalculator::new(common::config(ExecutionMode::Sequential))
        .unwrap()
        .plan(&common::inputs())
        .unwrap()
}

#[test]
fn tasks_hold_split_in_range_sources() {
    let plan = plan();
    assert!(!plan.tasks.is_empty());
    let mut total_sources = 0;
    for (i, task) in plan.tasks.iter().enumerate() {
        assert_eq!(task.task_no, i);
        assert!(!task.sources.is_empty());
        assert!(task.sources.iter().all(|s| s.is_point_source()));
        total_sources += task.sources.len();
    }
    // 5 x 4 area nodes plus the point source
    assert_eq!(total_sources, 21);
    assert!(plan.tasks.iter().any(|t| t.group_id == 0));
    assert!(plan.tasks.iter().any(|t| t.group_id == 1));
}

#[test]
fn collection_is_idempotent() {
    let plan = plan();
    for task in &plan.tasks {
        let first = compute_disagg(task.clone()).unwrap();
        let second = compute_disagg(task.clone()).unwrap();
        assert_eq!(first.results, second.results);
    }
}

#[test]
fn bin_data_is_column_aligned() {
    let plan = plan();
    let num_eps = plan.shared.params.eps_edges.len() - 1;
    for task in &plan.tasks {
        let bins = collect_bins_data(task).unwrap();
        assert!(bins.keys().all(|id| *id != 2));
        for data in bins.values() {
            assert!(!data.is_empty());
            assert_eq!(data.dists.len(), data.len());
            assert_eq!(data.trts.len(), data.len());
            assert_eq!(data.pnes.len(), task.quartets.len());
            for row in &data.pnes {
                assert_eq!(row.len(), data.len() * num_eps);
                assert!(row.iter().all(|p| (0.0..=1.0).contains(p)));
            }
        }
    }
}

#[test]
fn merging_partials_in_any_order_agrees() {
    let plan = plan();
    let partials: Vec<_> = plan.tasks.iter().map(|t| compute_disagg(t.clone()).unwrap()).collect();

    let mut forward = Accumulator::new();
    for p in partials.iter().cloned() {
        forward.merge(p).unwrap();
    }
    let mut backward = Accumulator::new();
    for p in partials.into_iter().rev() {
        backward.merge(p).unwrap();
    }
    common::assert_results_close(forward.results(), backward.results(), 1e-12);
}

#[test]
fn sequential_executor_stops_at_first_error() {
    let plan = plan();
    let mut seen = 0;
    let err = SequentialExecutor
        .execute(plan.tasks, &|_task| Err(disagg_core::errors::DisaggError::Executor("boom".to_string())), &mut |_| {
            seen += 1;
            Ok(())
        })
        .unwrap_err();
    assert_eq!(seen, 0);
    assert!(err.to_string().contains("boom"));
}
