//! Turns final matrices into records, checks them and hands them to a sink.

use std::collections::BTreeMap;

use disagg_core::config::ExecutionConfig;
use disagg_core::errors::DisaggError;
use disagg_core::traits::DisaggResultSink;
use disagg_core::types::{BinEdges, DisaggMatrix, DisaggRecord, FxHashMap, ResultKey, Site, SiteCollection};

/// `disagg/[poe-<poe>-]rlz-<rlz>-<imt>-<lon>-<lat>`, numbers written the
/// way existing result archives name them: `1e-05`, `10.0`.
pub fn result_name(key: &ResultKey, site: &Site) -> String {
    let poe = key.poe.map(|p| format!("poe-{}-", name_number(p))).unwrap_or_default();
    format!(
        "disagg/{poe}rlz-{}-{}-{}-{}",
        key.rlz_id,
        key.imt,
        name_number(site.location.lon),
        name_number(site.location.lat)
    )
}

/// Shortest round-trip digits; exponent form below 1e-4 and from 1e16 up,
/// with a signed exponent of at least two digits.
fn name_number(x: f64) -> String {
    let magnitude = x.abs();
    if !x.is_finite() || x == 0.0 || (1e-4..1e16).contains(&magnitude) {
        let plain = x.to_string();
        return if x.is_finite() && !plain.contains('.') { format!("{plain}.0") } else { plain };
    }
    let sci = format!("{x:e}");
    match sci.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => sci,
    }
}

pub fn build_record(
    key: &ResultKey,
    matrix: &DisaggMatrix,
    site: &Site,
    edges: &BinEdges,
    investigation_time: f64,
) -> DisaggRecord {
    DisaggRecord {
        name: result_name(key, site),
        site_id: key.site_id,
        lon: site.location.lon,
        lat: site.location.lat,
        rlz_id: key.rlz_id,
        imt: key.imt.clone(),
        iml: key.iml,
        poe: key.poe,
        investigation_time,
        trts: key.trts.to_vec(),
        edges: edges.clone(),
        pmfs: matrix
            .views()
            .iter()
            .map(|(kind, array)| (kind.name().to_string(), array.clone()))
            .collect(),
        poe_agg: matrix.poe_agg(),
    }
}

/// The aggregate PoE must agree across views within `tolerance`.
///
/// A disagreement is logged, or returned as an error when `strict`.
pub fn check_poe_agg(record: &DisaggRecord, tolerance: f64, strict: bool) -> Result<(), DisaggError> {
    let (lo, hi) = record
        .poe_agg
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| (lo.min(p), hi.max(p)));
    if record.poe_agg.is_empty() || hi - lo <= tolerance {
        return Ok(());
    }
    if strict {
        return Err(DisaggError::InconsistentViews {
            name: record.name.clone(),
            poe_agg: record.poe_agg.clone(),
        });
    }
    tracing::warn!(name = %record.name, poe_agg = ?record.poe_agg, "aggregate PoE differs across PMF views");
    Ok(())
}

/// Build, check and save a record for every result. Returns how many were
/// saved.
pub fn save_results(
    results: &BTreeMap<ResultKey, DisaggMatrix>,
    bin_edges: &FxHashMap<u32, BinEdges>,
    sites: &SiteCollection,
    investigation_time: f64,
    execution: &ExecutionConfig,
    sink: &mut dyn DisaggResultSink,
) -> Result<usize, DisaggError> {
    let tolerance = execution.effective_sanity_tolerance();
    let strict = execution.effective_strict_sanity_check();
    let mut saved = 0;
    for (key, matrix) in results {
        let site = sites.get(key.site_id).ok_or_else(|| {
            DisaggError::InvalidInput(format!("result for unknown site {}", key.site_id))
        })?;
        let edges = bin_edges.get(&key.site_id).ok_or_else(|| {
            DisaggError::InvalidInput(format!("no bin edges for site {}", key.site_id))
        })?;
        let record = build_record(key, matrix, site, edges, investigation_time);
        check_poe_agg(&record, tolerance, strict)?;
        sink.save(&record)?;
        saved += 1;
    }
    tracing::info!(saved, "stored disaggregation results");
    Ok(saved)
}
