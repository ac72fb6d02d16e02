//! Task execution strategies.
//!
//! Both executors hand every result to the controller callback on the
//! calling thread, so the accumulator is never shared between threads.

use crossbeam_channel::unbounded;

use disagg_core::config::ExecutionMode;
use disagg_core::errors::DisaggError;
use disagg_core::traits::{Cancellable, CancellationToken};

use crate::partition::DisaggTask;
use crate::reducer::PartialResult;

/// The work run for every task.
pub type TaskFn = dyn Fn(DisaggTask) -> Result<PartialResult, DisaggError> + Send + Sync;

/// Runs tasks and feeds their results to `on_result` as they complete.
pub trait TaskExecutor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Execute every task. The first task or callback error aborts the run
    /// and is returned; tasks not yet started are skipped.
    fn execute(
        &self,
        tasks: Vec<DisaggTask>,
        task_fn: &TaskFn,
        on_result: &mut dyn FnMut(PartialResult) -> Result<(), DisaggError>,
    ) -> Result<(), DisaggError>;
}

/// Runs every task on the calling thread, in order.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialExecutor;

impl TaskExecutor for SequentialExecutor {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn execute(
        &self,
        tasks: Vec<DisaggTask>,
        task_fn: &TaskFn,
        on_result: &mut dyn FnMut(PartialResult) -> Result<(), DisaggError>,
    ) -> Result<(), DisaggError> {
        for task in tasks {
            on_result(task_fn(task)?)?;
        }
        Ok(())
    }
}

/// Dispatches every task up front on a rayon pool and consumes results in
/// completion order.
#[derive(Debug)]
pub struct ParallelExecutor {
    pool: rayon::ThreadPool,
}

impl ParallelExecutor {
    /// Pool with `threads` workers, or rayon's default when unset or 0.
    pub fn new(threads: Option<usize>) -> Result<Self, DisaggError> {
        let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("disagg-worker-{i}"));
        if let Some(n) = threads.filter(|&n| n > 0) {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| DisaggError::Executor(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl TaskExecutor for ParallelExecutor {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn execute(
        &self,
        tasks: Vec<DisaggTask>,
        task_fn: &TaskFn,
        on_result: &mut dyn FnMut(PartialResult) -> Result<(), DisaggError>,
    ) -> Result<(), DisaggError> {
        let token = CancellationToken::new();
        let (tx, rx) = unbounded::<Result<PartialResult, DisaggError>>();
        let num_tasks = tasks.len();

        self.pool.in_place_scope(|scope| {
            for task in tasks {
                let tx = tx.clone();
                let token = token.clone();
                scope.spawn(move |_| {
                    if token.is_cancelled() {
                        let _ = tx.send(Err(DisaggError::Cancelled));
                        return;
                    }
                    let _ = tx.send(task_fn(task));
                });
            }
            drop(tx);

            let mut first_error: Option<DisaggError> = None;
            let mut received = 0usize;
            for outcome in rx.iter() {
                received += 1;
                if first_error.is_some() {
                    continue;
                }
                let merged = outcome.and_then(|partial| on_result(partial));
                if let Err(e) = merged {
                    tracing::error!(error = %e, received, num_tasks, "disaggregation task failed, cancelling");
                    token.cancel();
                    first_error = Some(e);
                }
            }
            tracing::debug!(received, num_tasks, "all task results received");
            first_error.map_or(Ok(()), Err)
        })
    }
}

/// The executor configured by `mode`.
pub fn executor_for(mode: ExecutionMode, threads: Option<usize>) -> Result<Box<dyn TaskExecutor>, DisaggError> {
    Ok(match mode {
        ExecutionMode::Sequential => Box::new(SequentialExecutor),
        ExecutionMode::Parallel => Box::new(ParallelExecutor::new(threads)?),
    })
}
