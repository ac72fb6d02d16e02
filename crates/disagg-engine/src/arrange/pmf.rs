//! Marginal PMF views of the joint disaggregation matrix.

use ndarray::{ArrayD, Axis};

use disagg_core::types::PmfKind;

/// Collapse `joint` onto the axes kept by `kind` with `1 - Π(1 - p)`.
pub fn pmf_view(kind: PmfKind, joint: &ArrayD<f64>) -> ArrayD<f64> {
    let complement = joint.mapv(|p| 1.0 - p);
    view_from_complement(kind, &complement)
}

/// All requested views of `joint`, in the order of `kinds`.
pub fn pmf_views(kinds: &[PmfKind], joint: &ArrayD<f64>) -> Vec<(PmfKind, ArrayD<f64>)> {
    let complement = joint.mapv(|p| 1.0 - p);
    kinds
        .iter()
        .map(|&kind| (kind, view_from_complement(kind, &complement)))
        .collect()
}

fn view_from_complement(kind: PmfKind, complement: &ArrayD<f64>) -> ArrayD<f64> {
    let keep = kind.axes();
    let mut folded = complement.clone();
    // Highest axis first so the remaining indices stay valid.
    for axis in (0..complement.ndim()).rev() {
        if !keep.contains(&axis) {
            folded = folded.fold_axis(Axis(axis), 1.0, |acc, c| acc * c);
        }
    }
    folded.mapv_into(|c| 1.0 - c)
}

#[cfg(test)]
mod tests {
    use ndarray::IxDyn;

    use super::*;

    #[test]
    fn views_keep_the_right_axes() {
        let joint = ArrayD::from_elem(IxDyn(&[2, 3, 1, 1, 4, 2]), 0.01);
        for (kind, view) in pmf_views(&PmfKind::ALL, &joint) {
            let expected: Vec<usize> = kind.axes().iter().map(|&a| joint.shape()[a]).collect();
            assert_eq!(view.shape(), expected.as_slice(), "{}", kind.name());
        }
    }

    #[test]
    fn marginal_combines_by_complement() {
        let mut joint = ArrayD::zeros(IxDyn(&[2, 2, 1, 1, 1, 1]));
        joint[[0, 0, 0, 0, 0, 0].as_slice()] = 0.1;
        joint[[0, 1, 0, 0, 0, 0].as_slice()] = 0.2;
        joint[[1, 1, 0, 0, 0, 0].as_slice()] = 0.5;
        let mag = pmf_view(PmfKind::Mag, &joint);
        assert!((mag[[0].as_slice()] - 0.28).abs() < 1e-12);
        assert!((mag[[1].as_slice()] - 0.5).abs() < 1e-12);
        let dist = pmf_view(PmfKind::Dist, &joint);
        assert!((dist[[0].as_slice()] - 0.1).abs() < 1e-12);
        assert!((dist[[1].as_slice()] - 0.6).abs() < 1e-12);
    }
}
