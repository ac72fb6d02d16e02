//! The disaggregation controller.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use disagg_core::config::DisaggConfig;
use disagg_core::errors::DisaggError;
use disagg_core::traits::DisaggResultSink;
use disagg_core::types::{
    BinEdges, DisaggMatrix, FxHashMap, HazardCurves, RealizationsAssoc, ResultKey, Site, SiteCollection,
    SourceModel,
};

use crate::bin_edges::{build_bin_edges, compute_bounding_boxes, eps_edges, mag_edges};
use crate::collector::compute_disagg;
use crate::context::ContextMaker;
use crate::executor::{executor_for, TaskExecutor};
use crate::feasibility::validate_poes;
use crate::gsim::GsimRegistry;
use crate::levels::{build_quartets, interpolate_levels};
use crate::partition::{CollectParams, DisaggTask, GroupInputs, Partitioner, SharedTaskInputs};
use crate::reducer::Accumulator;
use crate::store::save_results;

/// Everything a run reads.
#[derive(Debug, Clone)]
pub struct DisaggInputs {
    pub sites: SiteCollection,
    pub source_models: Vec<SourceModel>,
    pub realizations: RealizationsAssoc,
    pub gsims: GsimRegistry,
    pub curves: HazardCurves,
}

/// Final matrices plus what is needed to interpret them.
#[derive(Debug)]
pub struct DisaggOutput {
    pub results: BTreeMap<ResultKey, DisaggMatrix>,
    pub bin_edges: FxHashMap<u32, BinEdges>,
    pub trts: Arc<[String]>,
    /// Sites out of range of every source.
    pub skipped_sites: Vec<u32>,
    pub num_tasks: usize,
}

/// Tasks ready for execution plus the inputs they share.
#[derive(Debug)]
pub struct TaskPlan {
    pub tasks: Vec<DisaggTask>,
    pub shared: SharedTaskInputs,
    pub skipped_sites: Vec<u32>,
}

pub struct DisaggregationCalculator {
    config: DisaggConfig,
    executor: Box<dyn TaskExecutor>,
}

impl std::fmt::Debug for DisaggregationCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisaggregationCalculator")
            .field("config", &self.config)
            .field("executor", &self.executor.name())
            .finish()
    }
}

impl DisaggregationCalculator {
    /// Calculator using the executor selected by `execution.mode`.
    pub fn new(config: DisaggConfig) -> Result<Self, DisaggError> {
        let executor = executor_for(config.execution.effective_mode(), config.execution.threads)?;
        Self::with_executor(config, executor)
    }

    pub fn with_executor(config: DisaggConfig, executor: Box<dyn TaskExecutor>) -> Result<Self, DisaggError> {
        DisaggConfig::validate(&config)?;
        config.validate_request()?;
        Ok(Self { config, executor })
    }

    pub fn config(&self) -> &DisaggConfig {
        &self.config
    }

    fn concurrent_tasks(&self) -> usize {
        let exec = &self.config.execution;
        exec.concurrent_tasks.unwrap_or_else(|| {
            let threads = exec.threads.filter(|&n| n > 0).unwrap_or_else(rayon::current_num_threads);
            threads * 2
        })
    }

    /// Validate the request, build the bin edges and partition the
    /// sources. No task is created when a PoE threshold is unreachable.
    pub fn plan(&self, inputs: &DisaggInputs) -> Result<TaskPlan, DisaggError> {
        let calc = &self.config.calculation;
        let binning = &self.config.binning;
        let imts = calc.imts();

        validate_poes(
            &inputs.source_models,
            &inputs.realizations,
            &inputs.curves,
            &imts,
            &calc.poes_disagg,
        )?;
        log_zero_curves(inputs);

        let trts: Arc<[String]> = inputs
            .source_models
            .iter()
            .flat_map(|sm| sm.groups.iter().map(|g| g.trt.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let (min_mag, max_mag) = inputs
            .source_models
            .iter()
            .flat_map(|sm| sm.groups.iter())
            .filter_map(|g| g.magnitude_range())
            .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
            .ok_or_else(|| DisaggError::InvalidInput("the source models contain no sources".to_string()))?;

        let truncation_level = calc.effective_truncation_level();
        let mags = mag_edges(min_mag, max_mag, binning.effective_mag_bin_width());
        let eps = eps_edges(truncation_level, binning.effective_num_epsilon_bins());
        // No site integrates farther than the configured maximum distance.
        let max_distance = calc.effective_maximum_distance();
        let capped = SiteCollection::new(
            inputs
                .sites
                .iter()
                .map(|s| Site {
                    max_distance: s.max_distance.min(max_distance),
                    ..*s
                })
                .collect(),
        )?;
        let boxes = compute_bounding_boxes(&inputs.source_models, &capped);
        let bin_edges = build_bin_edges(&boxes, &mags, &eps, binning);
        let skipped_sites: Vec<u32> = capped.ids().filter(|id| !bin_edges.contains_key(id)).collect();

        let in_range: Vec<Site> = capped
            .iter()
            .filter(|s| bin_edges.contains_key(&s.id))
            .copied()
            .collect();
        let sites = Arc::new(SiteCollection::new(in_range)?);
        tracing::info!(
            sites = sites.len(),
            skipped = skipped_sites.len(),
            trts = trts.len(),
            mag_bins = mags.len() - 1,
            eps_bins = eps.len() - 1,
            "built disaggregation bin edges"
        );

        let thresholds = calc.thresholds();
        let mut groups = Vec::new();
        for sm in &inputs.source_models {
            for grp in &sm.groups {
                let rlzs_by_gsim = inputs.realizations.rlzs_by_gsim(&grp.trt, sm.ordinal)?;
                if rlzs_by_gsim.is_empty() {
                    continue;
                }
                let cmaker = ContextMaker::new(&grp.trt, &rlzs_by_gsim, &inputs.gsims)?;
                let quartets = build_quartets(&rlzs_by_gsim, &imts, &thresholds);
                let levels = interpolate_levels(&quartets, &sites, &inputs.curves, &calc.iml_disagg);
                groups.push(GroupInputs {
                    source_model: sm.ordinal,
                    group_id: grp.id,
                    sources: grp.sources.clone(),
                    cmaker: Arc::new(cmaker),
                    quartets: quartets.into(),
                    levels: Arc::new(levels),
                });
            }
        }

        let shared = SharedTaskInputs {
            sites,
            trts,
            bin_edges: Arc::new(bin_edges),
            params: Arc::new(CollectParams {
                truncation_level,
                investigation_time: calc.effective_investigation_time(),
                eps_edges: eps,
                iml_fixed: !calc.iml_disagg.is_empty(),
                views: self.config.pmf_views(),
            }),
        };
        let partitioner = Partitioner::new(
            self.concurrent_tasks(),
            self.config.execution.effective_point_source_weight(),
        );
        let tasks = partitioner.partition(groups, &shared);
        Ok(TaskPlan {
            tasks,
            shared,
            skipped_sites,
        })
    }

    /// Compute every disaggregation matrix.
    pub fn run(&self, inputs: &DisaggInputs) -> Result<DisaggOutput, DisaggError> {
        let started = Instant::now();
        let TaskPlan {
            tasks,
            shared,
            skipped_sites,
        } = self.plan(inputs)?;
        let num_tasks = tasks.len();

        let mut acc = Accumulator::new();
        self.executor
            .execute(tasks, &compute_disagg, &mut |partial| acc.merge(partial))?;

        tracing::info!(
            executor = self.executor.name(),
            tasks = num_tasks,
            results = acc.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "disaggregation finished"
        );
        let bin_edges = Arc::try_unwrap(shared.bin_edges).unwrap_or_else(|arc| (*arc).clone());
        Ok(DisaggOutput {
            results: acc.into_results(),
            bin_edges,
            trts: shared.trts,
            skipped_sites,
            num_tasks,
        })
    }

    /// Run and persist every result to `sink`.
    pub fn run_and_store(
        &self,
        inputs: &DisaggInputs,
        sink: &mut dyn DisaggResultSink,
    ) -> Result<DisaggOutput, DisaggError> {
        let output = self.run(inputs)?;
        save_results(
            &output.results,
            &output.bin_edges,
            &inputs.sites,
            self.config.calculation.effective_investigation_time(),
            &self.config.execution,
            sink,
        )?;
        Ok(output)
    }
}

fn log_zero_curves(inputs: &DisaggInputs) {
    for site in &inputs.sites {
        for rlz in inputs.realizations.realizations() {
            if let Some(curve) = inputs.curves.get(site.id, rlz.ordinal) {
                if curve.is_all_zero() {
                    tracing::info!(site_id = site.id, rlz = rlz.ordinal, "hazard curve is all zero, skipping");
                }
            }
        }
    }
}
