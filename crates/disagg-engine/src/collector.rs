//! Per-task bin-data collection and arrangement.
//!
//! A task turns its block of sources into raw per-rupture bin coordinates
//! and PNEs for every site in range, then arranges them into PMF matrices.
//! Nothing here touches shared mutable state, so a task can run on any
//! worker, in any order, any number of times.

use std::collections::BTreeMap;

use xxhash_rust::xxh3::xxh3_64;

use disagg_core::errors::DisaggError;
use disagg_core::traits::SeismicSource;
use disagg_core::types::{DisaggMatrix, FxHashMap, ResultKey, Site};

use crate::arrange::arrange_in_bins;
use crate::partition::{DisaggTask, SourceFilter};
use crate::reducer::{combine_into, PartialResult};

/// Column-wise bin data of the ruptures contributing to one site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteBinData {
    pub mags: Vec<f64>,
    pub dists: Vec<f64>,
    pub lons: Vec<f64>,
    pub lats: Vec<f64>,
    pub trts: Vec<usize>,
    /// Per quartet, `len() x num_eps` PNEs, one row per rupture.
    pub pnes: Vec<Vec<f64>>,
}

impl SiteBinData {
    pub fn with_quartets(num_quartets: usize) -> Self {
        Self {
            pnes: vec![Vec::new(); num_quartets],
            ..Self::default()
        }
    }

    /// Record the coordinates of one rupture; its PNEs go to `pnes`.
    pub fn push(&mut self, mag: f64, dist: f64, lon: f64, lat: f64, trt: usize) {
        self.mags.push(mag);
        self.dists.push(dist);
        self.lons.push(lon);
        self.lats.push(lat);
        self.trts.push(trt);
    }

    pub fn len(&self) -> usize {
        self.mags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mags.is_empty()
    }
}

fn source_error(src: &dyn SeismicSource, err: DisaggError) -> DisaggError {
    DisaggError::Source {
        source_id: src.source_id().to_string(),
        message: err.to_string(),
    }
}

/// Raw bin data per site for every quartet of the task.
///
/// Sites reached by no rupture of the block are absent. A quartet without a
/// level at a site gets PNEs of 1, i.e. no contribution.
pub fn collect_bins_data(task: &DisaggTask) -> Result<BTreeMap<u32, SiteBinData>, DisaggError> {
    let shared = &task.shared;
    let params = &shared.params;
    let num_eps = params.eps_edges.len().saturating_sub(1);
    let num_quartets = task.quartets.len();
    let filter = SourceFilter::new(&shared.sites);

    let mut out: BTreeMap<u32, SiteBinData> = BTreeMap::new();
    for src in &task.sources {
        let trt_idx = shared
            .trts
            .iter()
            .position(|t| t == src.tectonic_region_type())
            .ok_or_else(|| DisaggError::Source {
                source_id: src.source_id().to_string(),
                message: format!("unknown tectonic region type '{}'", src.tectonic_region_type()),
            })?;
        let sites: Vec<&Site> = filter
            .sites_for(src.as_ref())
            .filter(|site| shared.bin_edges.contains_key(&site.id))
            .collect();
        if sites.is_empty() {
            continue;
        }

        for rup in src.iter_ruptures() {
            for site in &sites {
                let Some(ctx) = task.cmaker.make_context(&rup, site) else {
                    continue;
                };
                let Some(levels) = task.levels.get(&site.id) else {
                    continue;
                };
                let data = out
                    .entry(site.id)
                    .or_insert_with(|| SiteBinData::with_quartets(num_quartets));
                data.push(rup.magnitude, ctx.rjb, ctx.closest.lon, ctx.closest.lat, trt_idx);

                // Quartets sharing (gsim, imt, level) share their PNEs.
                let mut memo: FxHashMap<(&str, &str, u64), Vec<f64>> = FxHashMap::default();
                for (qi, q) in task.quartets.iter().enumerate() {
                    let row = &mut data.pnes[qi];
                    let Some(iml) = levels.get(qi).copied().flatten() else {
                        row.extend(std::iter::repeat(1.0).take(num_eps));
                        continue;
                    };
                    let key = (q.gsim.as_str(), q.imt.as_str(), iml.to_bits());
                    if let Some(pnes) = memo.get(&key) {
                        row.extend_from_slice(pnes);
                        continue;
                    }
                    let gsim = task.cmaker.gsim(&q.gsim)?;
                    let poes = gsim
                        .disaggregate_poe(&ctx, &q.imt, iml, params.truncation_level, &params.eps_edges)
                        .map_err(|e| source_error(src.as_ref(), e))?;
                    if poes.len() != num_eps {
                        return Err(DisaggError::ShapeMismatch {
                            what: format!("epsilon PoEs from {}", q.gsim),
                            expected: vec![num_eps],
                            actual: vec![poes.len()],
                        });
                    }
                    let pnes: Vec<f64> = poes
                        .iter()
                        .map(|&poe| rup.probability_of_no_exceedance(poe, params.investigation_time))
                        .collect();
                    row.extend_from_slice(&pnes);
                    memo.insert(key, pnes);
                }
            }
        }
    }
    Ok(out)
}

/// Content fingerprint of a PNE array.
pub fn fingerprint(pnes: &[f64]) -> u64 {
    let bytes: Vec<u8> = pnes.iter().flat_map(|p| p.to_le_bytes()).collect();
    xxh3_64(&bytes)
}

/// Matrices already arranged at one site, keyed by PNE fingerprint.
///
/// Entries point back at the quartet whose PNEs produced them, so a hit is
/// only taken after comparing the arrays themselves.
#[derive(Debug, Default)]
pub struct ArrangementCache {
    buckets: FxHashMap<u64, Vec<(usize, DisaggMatrix)>>,
}

impl ArrangementCache {
    /// The matrix for quartet `qi` of `all_pnes`, arranged at most once per
    /// distinct PNE array.
    pub fn get_or_arrange<F>(&mut self, all_pnes: &[Vec<f64>], qi: usize, arrange: F) -> Result<DisaggMatrix, DisaggError>
    where
        F: FnOnce(&[f64]) -> Result<DisaggMatrix, DisaggError>,
    {
        self.get_or_arrange_at(fingerprint(&all_pnes[qi]), all_pnes, qi, arrange)
    }

    fn get_or_arrange_at<F>(
        &mut self,
        hash: u64,
        all_pnes: &[Vec<f64>],
        qi: usize,
        arrange: F,
    ) -> Result<DisaggMatrix, DisaggError>
    where
        F: FnOnce(&[f64]) -> Result<DisaggMatrix, DisaggError>,
    {
        let pnes = &all_pnes[qi];
        let bucket = self.buckets.entry(hash).or_default();
        if let Some((_, cached)) = bucket.iter().find(|(j, _)| all_pnes[*j] == *pnes) {
            return Ok(cached.clone());
        }
        let matrix = arrange(pnes)?;
        bucket.push((qi, matrix.clone()));
        Ok(matrix)
    }

    /// Number of distinct arrangements held.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }
}

/// Run one task: collect bin data and arrange it into PMF matrices.
///
/// With fixed levels, identical PNE arrays at a site are arranged once; a
/// fingerprint hit is only reused after an exact comparison.
pub fn compute_disagg(task: DisaggTask) -> Result<PartialResult, DisaggError> {
    let bins = collect_bins_data(&task)?;
    let shared = &task.shared;
    let params = &shared.params;
    let num_trts = shared.trts.len();

    let mut results: BTreeMap<ResultKey, DisaggMatrix> = BTreeMap::new();
    for (&site_id, data) in &bins {
        let (Some(edges), Some(levels)) = (shared.bin_edges.get(&site_id), task.levels.get(&site_id)) else {
            continue;
        };
        let arrange = |pnes: &[f64]| arrange_in_bins(site_id, data, pnes, edges, num_trts, &params.views);
        let mut cache = ArrangementCache::default();
        for (qi, q) in task.quartets.iter().enumerate() {
            let Some(iml) = levels.get(qi).copied().flatten() else {
                continue;
            };
            let matrix = if params.iml_fixed {
                cache.get_or_arrange(&data.pnes, qi, arrange)?
            } else {
                arrange(&data.pnes[qi])?
            };

            let key = ResultKey {
                site_id,
                rlz_id: q.rlz_id,
                poe: q.poe,
                imt: q.imt.clone(),
                iml,
                trts: shared.trts.clone(),
            };
            match results.get_mut(&key) {
                Some(existing) => combine_into(existing, &matrix, &key)?,
                None => {
                    results.insert(key, matrix);
                }
            }
        }
    }
    tracing::debug!(
        task_no = task.task_no,
        sources = task.sources.len(),
        sites = bins.len(),
        results = results.len(),
        "disaggregation task done"
    );
    Ok(PartialResult {
        task_no: task.task_no,
        results,
    })
}
