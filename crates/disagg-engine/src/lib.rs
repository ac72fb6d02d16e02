//! Disaggregation engine.
//!
//! Builds per-site bin edges, rejects infeasible requests, partitions the
//! sources into weighted blocks, collects per-rupture bin data in parallel,
//! arranges it into dense PMF matrices and reduces the partial results on
//! the controller thread.

pub mod arrange;
pub mod bin_edges;
pub mod calculator;
pub mod collector;
pub mod context;
pub mod executor;
pub mod feasibility;
pub mod gsim;
pub mod levels;
pub mod partition;
pub mod reducer;
pub mod sources;
pub mod store;

pub use calculator::{DisaggInputs, DisaggOutput, DisaggregationCalculator, TaskPlan};
pub use executor::{ParallelExecutor, SequentialExecutor, TaskExecutor};
pub use reducer::Accumulator;
