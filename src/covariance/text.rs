//! covariance::text — whitespace-delimited numeric matrix files.
//!
//! Purpose
//! -------
//! Read the plain-text matrix format shared by every upstream product
//! (covariance terms, jackknife correlation functions, weights, Legendre
//! factors): one row per line, whitespace-separated decimal values.
//!
//! Key behaviors
//! -------------
//! - Skip an explicit number of header lines (`skip_rows`) before parsing.
//! - Ignore blank lines and `#` comment lines after the header.
//! - Accept `nan` / `inf` tokens, since jackknife estimates can be
//!   non-finite; callers decide what to do with them.
//! - Reject ragged rows and unparseable tokens with the file path and line.
//!
//! Invariants & assumptions
//! ------------------------
//! - The returned matrix is always 2-D (a single row or column stays 2-D).
use std::{
    fs,
    path::{Path, PathBuf},
};

use ndarray::Array2;

use crate::covariance::errors::{CovError, CovResult};

/// Read a whitespace-delimited matrix from `path`, skipping `skip_rows` header lines.
///
/// # Errors
/// - [`CovError::Io`] if the file cannot be read.
/// - Any error of [`parse_text_matrix`].
pub fn read_text_matrix(path: &Path, skip_rows: usize) -> CovResult<Array2<f64>> {
    let text = fs::read_to_string(path)
        .map_err(|e| CovError::Io { path: path.to_path_buf(), message: e.to_string() })?;
    parse_text_matrix(&text, skip_rows, path)
}

/// Parse matrix text already in memory. `origin` is used for error messages only.
///
/// # Errors
/// - [`CovError::Parse`] for a token that is not a number.
/// - [`CovError::RaggedRow`] if a row's length differs from the first row.
/// - [`CovError::EmptyMatrix`] if no numeric rows remain.
pub fn parse_text_matrix(text: &str, skip_rows: usize, origin: &Path) -> CovResult<Array2<f64>> {
    let mut values = Vec::new();
    let mut n_cols: Option<usize> = None;
    let mut n_rows = 0usize;

    for (line_idx, line) in text.lines().enumerate().skip(skip_rows) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let before = values.len();
        for token in trimmed.split_whitespace() {
            let value = token.parse::<f64>().map_err(|_| CovError::Parse {
                path: PathBuf::from(origin),
                line: line_idx + 1,
                token: token.to_string(),
            })?;
            values.push(value);
        }
        let found = values.len() - before;
        match n_cols {
            None => n_cols = Some(found),
            Some(expected) if expected != found => {
                return Err(CovError::RaggedRow {
                    path: PathBuf::from(origin),
                    line: line_idx + 1,
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }
        n_rows += 1;
    }

    let n_cols = n_cols.ok_or_else(|| CovError::EmptyMatrix { path: PathBuf::from(origin) })?;
    shape_rows(values, n_rows, n_cols, origin)
}

/// Lay row-major `values` out as `n_rows × n_cols`.
fn shape_rows(
    values: Vec<f64>, n_rows: usize, n_cols: usize, origin: &Path,
) -> CovResult<Array2<f64>> {
    Array2::from_shape_vec((n_rows, n_cols), values).map_err(|e| CovError::MalformedMatrix {
        path: PathBuf::from(origin),
        rows: n_rows,
        cols: n_cols,
        message: e.to_string(),
    })
}
