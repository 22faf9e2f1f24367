//! Shared fixtures for the integration tests: synthetic upstream matrix
//! files and jackknife inputs written into temporary directories.
#![allow(dead_code)]

use std::{fs, path::Path};

use ndarray::Array2;
use rescaled_cov::covariance::{FileMatrixSource, MatrixSet, SampleIndex};

/// Write `m` as whitespace-separated rows using the shortest round-trip
/// representation of each value.
pub fn write_matrix(path: &Path, m: &Array2<f64>) {
    write_rows(path, "", m);
}

/// Like [`write_matrix`] but with `header` written verbatim first.
pub fn write_rows(path: &Path, header: &str, m: &Array2<f64>) {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).unwrap();
    }
    let mut text = String::from(header);
    for row in m.rows() {
        let line: Vec<String> = row.iter().map(|v| format!("{v:e}")).collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    fs::write(path, text).unwrap();
}

/// Write one `(c2, c3, c4)` triple under the upstream naming convention.
pub fn write_triple(
    source: &FileMatrixSource, set: MatrixSet, index: SampleIndex, c2: &Array2<f64>,
    c3: &Array2<f64>, c4: &Array2<f64>,
) {
    let [p2, p3, p4] = source.paths(set, index);
    write_matrix(&p2, c2);
    write_matrix(&p3, c3);
    write_matrix(&p4, c4);
}

/// Symmetric, strictly diagonally dominant `dim × dim` matrix with diagonal
/// `scale·(dim + 1 + i)` and off-diagonal `scale / (1 + |i − j|)`.
pub fn dominant(dim: usize, scale: f64) -> Array2<f64> {
    Array2::from_shape_fn((dim, dim), |(i, j)| {
        if i == j {
            scale * (dim + 1 + i) as f64
        } else {
            scale / (1.0 + i.abs_diff(j) as f64)
        }
    })
}

/// Non-symmetric matrix with small entries, used as a raw `c3`.
pub fn skewed(dim: usize, scale: f64) -> Array2<f64> {
    Array2::from_shape_fn((dim, dim), |(i, j)| scale * (0.1 * i as f64 + 0.03 * j as f64))
}

/// Deterministic per-region correlation-function estimates. Bin `b` follows
/// `sin(1.3·(b + 1)·a)`, so distinct bins never share a frequency and the
/// region-centred columns stay linearly independent.
pub fn xi_estimates(n_regions: usize, n_bins: usize) -> Array2<f64> {
    Array2::from_shape_fn((n_regions, n_bins), |(a, b)| {
        (1.3 * (b + 1) as f64 * a as f64).sin() + 0.1 * b as f64
    })
}

/// Weights file body: a leading region-index column followed by `weights`.
pub fn with_index_column(weights: &Array2<f64>) -> Array2<f64> {
    let (rows, cols) = weights.dim();
    Array2::from_shape_fn((rows, cols + 1), |(a, b)| if b == 0 { a as f64 } else { weights[[a, b - 1]] })
}
