//! Criterion benchmarks for matrix arrangement and PMF views.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use disagg_core::types::{BinEdges, PmfKind};
use disagg_engine::arrange::arrange_in_bins;
use disagg_engine::bin_edges::{aligned_edges, eps_edges};
use disagg_engine::collector::SiteBinData;

fn site_data(num_ruptures: usize, num_eps: usize) -> (SiteBinData, Vec<f64>) {
    let mut data = SiteBinData::with_quartets(1);
    let mut pnes = Vec::with_capacity(num_ruptures * num_eps);
    for i in 0..num_ruptures {
        let t = i as f64 / num_ruptures as f64;
        data.push(5.0 + 3.0 * t, 200.0 * t, 10.0 + t, 45.0 + t, i % 2);
        pnes.extend((0..num_eps).map(|e| 1.0 - 1e-4 * (e + 1) as f64));
    }
    (data, pnes)
}

fn bench_arrange(c: &mut Criterion) {
    let edges = BinEdges {
        mag: aligned_edges(5.0, 8.0, 0.25),
        dist: aligned_edges(0.0, 200.0, 10.0),
        lon: aligned_edges(10.0, 11.0, 0.1),
        lat: aligned_edges(45.0, 46.0, 0.1),
        eps: eps_edges(3.0, 6),
    };
    let (data, pnes) = site_data(10_000, 6);

    c.bench_function("arrange 10k ruptures, all views", |b| {
        b.iter(|| arrange_in_bins(0, black_box(&data), black_box(&pnes), &edges, 2, &PmfKind::ALL))
    });
    c.bench_function("arrange 10k ruptures, Mag_Dist_Eps", |b| {
        b.iter(|| arrange_in_bins(0, black_box(&data), black_box(&pnes), &edges, 2, &[PmfKind::MagDistEps]))
    });
}

criterion_group!(benches, bench_arrange);
criterion_main!(benches);
