//! Quartets and the intensity levels they are disaggregated at.

use std::collections::BTreeMap;

use disagg_core::types::{FxHashMap, HazardCurves, Quartet, SiteCollection};

/// Per-site levels, indexed like the quartets they belong to. `None` marks a
/// quartet the site has no level for.
pub type SiteLevels = FxHashMap<u32, Vec<Option<f64>>>;

/// Cross product of ground-motion models (with their realizations), IMTs and
/// thresholds, grouped by ground-motion model.
pub fn build_quartets(
    rlzs_by_gsim: &BTreeMap<String, Vec<usize>>,
    imts: &[String],
    thresholds: &[Option<f64>],
) -> Vec<Quartet> {
    let mut quartets = Vec::new();
    for (gsim, rlzs) in rlzs_by_gsim {
        for &rlz_id in rlzs {
            for imt in imts {
                for &poe in thresholds {
                    quartets.push(Quartet {
                        poe,
                        gsim: gsim.clone(),
                        imt: imt.clone(),
                        rlz_id,
                    });
                }
            }
        }
    }
    quartets
}

/// Resolve the level of every quartet at every site.
///
/// A fixed level from `iml_disagg` wins; otherwise the level is read off the
/// site's hazard curve at the quartet threshold. Missing and all-zero curves
/// give no level.
pub fn interpolate_levels(
    quartets: &[Quartet],
    sites: &SiteCollection,
    curves: &HazardCurves,
    iml_disagg: &BTreeMap<String, f64>,
) -> SiteLevels {
    sites
        .iter()
        .map(|site| {
            let levels = quartets
                .iter()
                .map(|q| {
                    if let Some(&iml) = iml_disagg.get(&q.imt) {
                        return Some(iml);
                    }
                    let poe = q.poe?;
                    let points = curves.get(site.id, q.rlz_id)?.get(&q.imt)?;
                    if points.is_all_zero() {
                        return None;
                    }
                    Some(points.interpolate_level(poe))
                })
                .collect();
            (site.id, levels)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use disagg_core::types::HazardCurve;

    use super::*;

    fn rlzs_by_gsim() -> BTreeMap<String, Vec<usize>> {
        BTreeMap::from([("A".to_string(), vec![0, 2]), ("B".to_string(), vec![1])])
    }

    #[test]
    fn quartets_are_the_cross_product() {
        let q = build_quartets(&rlzs_by_gsim(), &["PGA".to_string(), "SA(1.0)".to_string()], &[Some(0.1), Some(0.02)]);
        assert_eq!(q.len(), 3 * 2 * 2);
        assert_eq!(q[0].gsim, "A");
        assert_eq!(q[11].gsim, "B");
    }

    #[test]
    fn levels_follow_curves_or_fixed_values() {
        let sites = SiteCollection::from_locations(&[(0.0, 0.0), (1.0, 0.0)], 200.0).unwrap();
        let mut curves = HazardCurves::new();
        curves.insert(
            0,
            0,
            HazardCurve::new().with_imt("PGA", vec![0.1, 0.2, 0.4], vec![0.5, 0.3, 0.1]).unwrap(),
        );
        curves.insert(1, 0, HazardCurve::new().with_imt("PGA", vec![0.1, 0.2], vec![0.0, 0.0]).unwrap());
        let quartets = build_quartets(
            &BTreeMap::from([("A".to_string(), vec![0])]),
            &["PGA".to_string()],
            &[Some(0.3)],
        );

        let levels = interpolate_levels(&quartets, &sites, &curves, &BTreeMap::new());
        assert!((levels[&0][0].unwrap() - 0.2).abs() < 1e-12);
        assert_eq!(levels[&1][0], None);

        let fixed = BTreeMap::from([("PGA".to_string(), 0.25)]);
        let levels = interpolate_levels(&quartets, &sites, &curves, &fixed);
        assert_eq!(levels[&1][0], Some(0.25));
    }
}
