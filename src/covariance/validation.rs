//! covariance::validation — eager quality checks on loaded triples.
//!
//! Purpose
//! -------
//! Run the cheap checks that must happen before any expensive precision
//! work: the advisory eigenvalue convergence test on the 4-point term, the
//! fatal positive-definiteness test on the combined covariance, and the
//! explicit shape check between data-derived and theory covariances.
//!
//! Key behaviors
//! -------------
//! - [`convergence_check`] compares `min eig(c4)` with `−min eig(c2)`; it
//!   returns a report and never fails on poor convergence.
//! - [`ensure_positive_definite`] rejects any covariance with an eigenvalue
//!   `≤ 0`.
//! - [`ensure_same_shape`] rejects a data covariance whose bins do not line
//!   up with the theory covariance.
//!
//! Conventions
//! -----------
//! - Advisory outcomes are data; the pipeline decides how to report them.
use ndarray::Array2;

use crate::{
    covariance::{
        errors::{CovError, CovResult},
        types::CovTriple,
    },
    precision::linalg::min_eigenvalue,
};

/// Outcome of the 4-point eigenvalue convergence test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceReport {
    pub min_eig_c4: f64,
    pub min_eig_c2: f64,
}

impl ConvergenceReport {
    /// `true` when `min eig(c4) ≥ −min eig(c2)`.
    pub fn converged(&self) -> bool {
        self.min_eig_c4 >= -self.min_eig_c2
    }
}

fn eig_error(m: &Array2<f64>) -> CovError {
    CovError::NotSquare { rows: m.nrows(), cols: m.ncols() }
}

/// Eigenvalue convergence test for a loaded triple.
///
/// # Errors
/// - [`CovError::NotSquare`] if a matrix is not square.
pub fn convergence_check(triple: &CovTriple) -> CovResult<ConvergenceReport> {
    let min_eig_c4 = min_eigenvalue(&triple.c4).map_err(|_| eig_error(&triple.c4))?;
    let min_eig_c2 = min_eigenvalue(&triple.c2).map_err(|_| eig_error(&triple.c2))?;
    Ok(ConvergenceReport { min_eig_c4, min_eig_c2 })
}

/// Fail unless every eigenvalue of `cov` is strictly positive.
///
/// # Errors
/// - [`CovError::NotPositiveDefinite`] with the smallest eigenvalue otherwise.
/// - [`CovError::NotSquare`] if `cov` is not square.
pub fn ensure_positive_definite(cov: &Array2<f64>) -> CovResult<()> {
    let min = min_eigenvalue(cov).map_err(|_| eig_error(cov))?;
    if min <= 0.0 || min.is_nan() {
        return Err(CovError::NotPositiveDefinite { min_eigenvalue: min });
    }
    Ok(())
}

/// Fail unless `found` has the same shape as `expected`.
///
/// # Errors
/// - [`CovError::ShapeMismatch`] otherwise.
pub fn ensure_same_shape(expected: &Array2<f64>, found: &Array2<f64>) -> CovResult<()> {
    if expected.dim() != found.dim() {
        return Err(CovError::ShapeMismatch { expected: expected.dim(), found: found.dim() });
    }
    Ok(())
}
