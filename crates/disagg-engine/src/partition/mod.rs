//! Work partitioning: one task per weighted block of in-range sources.

pub mod blocks;
pub mod filter;

pub use blocks::split_in_blocks;
pub use filter::SourceFilter;

use std::sync::Arc;

use disagg_core::traits::SeismicSource;
use disagg_core::types::{BinEdges, FxHashMap, PmfKind, Quartet, SiteCollection};

use crate::context::ContextMaker;
use crate::levels::SiteLevels;

/// Parameters every collection task needs, identical across tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectParams {
    pub truncation_level: f64,
    pub investigation_time: f64,
    pub eps_edges: Vec<f64>,
    /// Levels come from `iml_disagg` rather than from the curves.
    pub iml_fixed: bool,
    pub views: Vec<PmfKind>,
}

/// Inputs shared by all tasks of a run.
#[derive(Debug, Clone)]
pub struct SharedTaskInputs {
    pub sites: Arc<SiteCollection>,
    pub trts: Arc<[String]>,
    pub bin_edges: Arc<FxHashMap<u32, BinEdges>>,
    pub params: Arc<CollectParams>,
}

/// A source group ready to be partitioned.
#[derive(Debug, Clone)]
pub struct GroupInputs {
    pub source_model: usize,
    pub group_id: usize,
    pub sources: Vec<Arc<dyn SeismicSource>>,
    pub cmaker: Arc<ContextMaker>,
    pub quartets: Arc<[Quartet]>,
    pub levels: Arc<SiteLevels>,
}

/// One unit of parallel work.
#[derive(Debug, Clone)]
pub struct DisaggTask {
    pub task_no: usize,
    pub source_model: usize,
    pub group_id: usize,
    pub sources: Vec<Arc<dyn SeismicSource>>,
    pub cmaker: Arc<ContextMaker>,
    pub quartets: Arc<[Quartet]>,
    pub levels: Arc<SiteLevels>,
    pub shared: SharedTaskInputs,
}

/// Splits source groups into tasks.
#[derive(Debug, Clone, Copy)]
pub struct Partitioner {
    concurrent_tasks: usize,
    point_source_weight: f64,
}

impl Partitioner {
    pub fn new(concurrent_tasks: usize, point_source_weight: f64) -> Self {
        Self {
            concurrent_tasks: concurrent_tasks.max(1),
            point_source_weight,
        }
    }

    /// Split, filter and block every group.
    ///
    /// Each group gets `ceil(concurrent_tasks / effective_groups)` blocks,
    /// where effective groups are the ones left with in-range sources.
    pub fn partition(&self, groups: Vec<GroupInputs>, shared: &SharedTaskInputs) -> Vec<DisaggTask> {
        let filter = SourceFilter::new(&shared.sites);
        let groups: Vec<GroupInputs> = groups
            .into_iter()
            .map(|mut grp| {
                let split: Vec<Arc<dyn SeismicSource>> =
                    grp.sources.drain(..).flat_map(|src| src.split()).collect();
                grp.sources = filter.filter(split);
                grp
            })
            .filter(|grp| {
                if grp.sources.is_empty() {
                    tracing::debug!(
                        source_model = grp.source_model,
                        group_id = grp.group_id,
                        "no source of the group is within range of any site"
                    );
                }
                !grp.sources.is_empty()
            })
            .collect();

        if groups.is_empty() {
            return Vec::new();
        }
        let num_blocks = self.concurrent_tasks.div_ceil(groups.len());
        let psw = self.point_source_weight;

        let mut tasks = Vec::new();
        for grp in groups {
            let GroupInputs {
                source_model,
                group_id,
                sources,
                cmaker,
                quartets,
                levels,
            } = grp;
            for block in split_in_blocks(sources, num_blocks, |s| s.weight(psw)) {
                tasks.push(DisaggTask {
                    task_no: tasks.len(),
                    source_model,
                    group_id,
                    sources: block,
                    cmaker: Arc::clone(&cmaker),
                    quartets: Arc::clone(&quartets),
                    levels: Arc::clone(&levels),
                    shared: shared.clone(),
                });
            }
        }
        tracing::info!(
            tasks = tasks.len(),
            blocks_per_group = num_blocks,
            "partitioned sources into disaggregation tasks"
        );
        tasks
    }
}
