//! Shared fixtures for the engine integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use disagg_core::config::{DisaggConfig, ExecutionMode};
use disagg_core::traits::SeismicSource;
use disagg_core::types::{
    DisaggMatrix, HazardCurve, HazardCurves, Point, Realization, RealizationsAssoc, ResultKey, Site,
    SiteCollection, SourceGroup, SourceModel,
};
use disagg_engine::gsim::{GmpeCoefficients, GsimRegistry, SimpleLognormalGsim};
use disagg_engine::sources::{AreaSource, Mfd, PointSource};
use disagg_engine::DisaggInputs;

pub const ASC: &str = "Active Shallow Crust";
pub const SCR: &str = "Stable Continental Region";
pub const IMTS: [&str; 2] = ["PGA", "SA(1.0)"];

/// Two sites near the sources and one far beyond the integration distance.
pub fn sites() -> SiteCollection {
    SiteCollection::new(vec![
        Site::new(0, 0.0, 0.0, 100.0),
        Site::new(1, 0.3, 0.2, 100.0),
        Site::new(2, 20.0, 20.0, 100.0),
    ])
    .unwrap()
}

fn gsim(name: &str, c0: f64) -> Arc<SimpleLognormalGsim> {
    let coefficients = BTreeMap::from([
        ("PGA".to_string(), GmpeCoefficients { c0, c1: 0.5, c2: 1.0, c3: 10.0, sigma: 0.6 }),
        ("SA(1.0)".to_string(), GmpeCoefficients { c0: c0 - 0.8, c1: 0.6, c2: 1.0, c3: 10.0, sigma: 0.7 }),
    ]);
    Arc::new(SimpleLognormalGsim::new(name, coefficients).unwrap())
}

pub fn gsims() -> GsimRegistry {
    GsimRegistry::new().with(gsim("SimpleA", -1.0)).with(gsim("SimpleB", -1.3))
}

pub fn source_models() -> Vec<SourceModel> {
    let area = AreaSource::from_bounds(
        "area-1",
        ASC,
        (0.1, 0.0),
        (0.5, 0.3),
        0.1,
        10.0,
        Mfd::TruncatedGr { a_val: 3.5, b_val: 1.0, min_mag: 5.0, max_mag: 7.0, bin_width: 0.5 },
    )
    .unwrap();
    let point = PointSource::new(
        "point-1",
        SCR,
        Point::with_depth(-0.2, 0.1, 15.0),
        Mfd::Discrete { min_mag: 6.0, bin_width: 0.5, rates: vec![0.005, 0.001] },
    )
    .unwrap();
    vec![SourceModel {
        ordinal: 0,
        name: "b1".to_string(),
        groups: vec![
            SourceGroup { id: 0, trt: ASC.to_string(), sources: vec![Arc::new(area) as Arc<dyn SeismicSource>] },
            SourceGroup { id: 1, trt: SCR.to_string(), sources: vec![Arc::new(point) as Arc<dyn SeismicSource>] },
        ],
    }]
}

pub fn realizations() -> RealizationsAssoc {
    let rlz = |ordinal: usize, asc: &str| Realization {
        ordinal,
        source_model: 0,
        weight: 0.5,
        gsim_by_trt: BTreeMap::from([(ASC.to_string(), asc.to_string()), (SCR.to_string(), "SimpleB".to_string())]),
    };
    RealizationsAssoc::new(vec![rlz(0, "SimpleA"), rlz(1, "SimpleB")])
}

/// Same curve everywhere; its maximum PoE is 0.9.
pub fn curves(sites: &SiteCollection) -> HazardCurves {
    let mut curves = HazardCurves::new();
    for site in sites {
        for rlz in 0..2 {
            let mut curve = HazardCurve::new();
            for imt in IMTS {
                curve = curve
                    .with_imt(imt, vec![0.01, 0.05, 0.1, 0.2, 0.5, 1.0], vec![0.9, 0.5, 0.2, 0.08, 0.01, 0.001])
                    .unwrap();
            }
            curves.insert(site.id, rlz, curve);
        }
    }
    curves
}

pub fn inputs() -> DisaggInputs {
    let sites = sites();
    let curves = curves(&sites);
    DisaggInputs {
        sites,
        source_models: source_models(),
        realizations: realizations(),
        gsims: gsims(),
        curves,
    }
}

pub fn config(mode: ExecutionMode) -> DisaggConfig {
    let mut config = DisaggConfig::from_toml(
        r#"
[binning]
mag_bin_width = 0.5
distance_bin_width = 10.0
coordinate_bin_width = 0.2
num_epsilon_bins = 3

[calculation]
truncation_level = 3.0
investigation_time = 50.0
poes_disagg = [0.1]
intensity_measure_types = ["PGA", "SA(1.0)"]

[execution]
concurrent_tasks = 4
"#,
    )
    .unwrap();
    config.execution.mode = Some(mode);
    config
}

/// Every key present in both maps and every view equal within `tol`.
pub fn assert_results_close(
    a: &BTreeMap<ResultKey, DisaggMatrix>,
    b: &BTreeMap<ResultKey, DisaggMatrix>,
    tol: f64,
) {
    assert_eq!(a.len(), b.len());
    for ((ka, ma), (kb, mb)) in a.iter().zip(b.iter()) {
        assert_eq!(ka, kb);
        for ((kind_a, va), (kind_b, vb)) in ma.views().iter().zip(mb.views()) {
            assert_eq!(kind_a, kind_b);
            assert_eq!(va.shape(), vb.shape());
            for (x, y) in va.iter().zip(vb.iter()) {
                assert!((x - y).abs() <= tol, "{} differs: {x} vs {y}", kind_a.name());
            }
        }
    }
}
