//! precision::linalg — dense `ndarray` ↔ `nalgebra` bridge.
//!
//! Purpose
//! -------
//! Keep `ndarray` as the crate's storage type while delegating the few
//! factorizations the estimators need to `nalgebra`: LU-based inversion,
//! sign/log-magnitude determinants, and symmetric eigenvalues.
//!
//! Key behaviors
//! -------------
//! - [`to_dmatrix`] / [`from_dmatrix`] copy between the two layouts
//!   (`DMatrix` is column-major).
//! - [`invert`] performs an exact LU inversion and reports singular input as
//!   [`PrecisionError::Singular`].
//! - [`slogdet`] returns `(sign, ln|det|)` from the LU factors so large
//!   matrices do not overflow; a zero pivot yields `(0, -∞)`.
//! - [`symmetric_eigenvalues`] uses `symmetric_eigen`; callers must pass a
//!   symmetric matrix.
//!
//! Conventions
//! -----------
//! - No iterative or approximate linear algebra is used anywhere.
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

use crate::precision::errors::{PrecisionError, PrecisionResult};

/// Copy an `ndarray` matrix into a `nalgebra::DMatrix`.
pub fn to_dmatrix(m: &Array2<f64>) -> DMatrix<f64> {
    let (rows, cols) = m.dim();
    let mut out = DMatrix::<f64>::zeros(rows, cols);
    for j in 0..cols {
        for i in 0..rows {
            out[(i, j)] = m[[i, j]];
        }
    }
    out
}

/// Copy a `nalgebra::DMatrix` back into an `ndarray` matrix.
pub fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

fn ensure_square(m: &Array2<f64>) -> PrecisionResult<usize> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(PrecisionError::NotSquare { rows, cols });
    }
    Ok(rows)
}

/// Exact inverse of a square matrix.
///
/// # Errors
/// - [`PrecisionError::NotSquare`] for rectangular input.
/// - [`PrecisionError::Singular`] if LU finds a zero pivot or the inverse is
///   not finite. `what` names the matrix in the error.
pub fn invert(m: &Array2<f64>, what: &'static str) -> PrecisionResult<Array2<f64>> {
    ensure_square(m)?;
    let inv = to_dmatrix(m).try_inverse().ok_or(PrecisionError::Singular { what })?;
    if inv.iter().any(|v| !v.is_finite()) {
        return Err(PrecisionError::Singular { what });
    }
    Ok(from_dmatrix(&inv))
}

/// Sign and natural log of the absolute determinant.
///
/// # Errors
/// - [`PrecisionError::NotSquare`] for rectangular input.
pub fn slogdet(m: &Array2<f64>) -> PrecisionResult<(f64, f64)> {
    let n = ensure_square(m)?;
    if n == 0 {
        return Ok((1.0, 0.0));
    }
    let lu = to_dmatrix(m).lu();
    let u = lu.u();
    let mut sign: f64 = lu.p().determinant();
    let mut log_abs = 0.0;
    for i in 0..n {
        let pivot = u[(i, i)];
        if pivot == 0.0 || !pivot.is_finite() {
            return Ok((0.0, f64::NEG_INFINITY));
        }
        if pivot < 0.0 {
            sign = -sign;
        }
        log_abs += pivot.abs().ln();
    }
    Ok((sign, log_abs))
}

/// Eigenvalues of a symmetric matrix, in ascending order.
///
/// # Errors
/// - [`PrecisionError::NotSquare`] for rectangular input.
pub fn symmetric_eigenvalues(m: &Array2<f64>) -> PrecisionResult<Array1<f64>> {
    ensure_square(m)?;
    let mut values: Vec<f64> = to_dmatrix(m).symmetric_eigenvalues().iter().copied().collect();
    values.sort_by(|a, b| a.total_cmp(b));
    Ok(Array1::from(values))
}

/// Smallest eigenvalue of a symmetric matrix (`+∞` for an empty matrix).
pub fn min_eigenvalue(m: &Array2<f64>) -> PrecisionResult<f64> {
    Ok(symmetric_eigenvalues(m)?.iter().copied().fold(f64::INFINITY, f64::min))
}
