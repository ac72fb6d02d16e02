//! Rejects disaggregation requests whose PoE thresholds no hazard curve reaches.

use disagg_core::errors::DisaggError;
use disagg_core::types::{HazardCurves, RealizationsAssoc, SourceModel};

/// Check every (source model, realization, threshold, IMT) combination.
///
/// For each source model, over the realizations belonging to it, the
/// maximum PoE reached by any site's curve must be at least the requested
/// threshold. The first violation is returned with the offending values.
pub fn validate_poes(
    source_models: &[SourceModel],
    realizations: &RealizationsAssoc,
    curves: &HazardCurves,
    imts: &[String],
    poes: &[f64],
) -> Result<(), DisaggError> {
    if poes.is_empty() {
        return Ok(());
    }
    for sm in source_models {
        for rlz in realizations.rlzs_by_smodel(sm.ordinal) {
            for &poe in poes {
                for imt in imts {
                    let max_poe = curves.max_poe(rlz.ordinal, imt);
                    if poe > max_poe {
                        return Err(DisaggError::ConfigurationInfeasible {
                            source_model: sm.ordinal,
                            source_model_name: sm.name.clone(),
                            poe,
                            rlz: rlz.ordinal,
                            imt: imt.clone(),
                            max_poe,
                        });
                    }
                }
            }
        }
    }
    tracing::debug!(
        source_models = source_models.len(),
        realizations = realizations.len(),
        "disaggregation PoEs are reachable"
    );
    Ok(())
}
