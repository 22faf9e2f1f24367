//! precision::effective_n — effective number of samples from the D-matrix.
//!
//! `N_eff` is derived from the geometric-mean-normalized determinant of `D`:
//! `D_value = sign(det D) · exp(ln|det D| / n)` and
//! `N_eff = (n + 1)/D_value + 1`. Larger `D_value` (more subsample-to-
//! subsample disagreement) means smaller `N_eff`. A negative determinant sign
//! makes the estimate meaningless; it is then clamped to zero and flagged.
use ndarray::Array2;

use crate::precision::{errors::PrecisionResult, linalg::slogdet};

/// EffectiveN — effective sample size and the determinant it came from.
///
/// Fields
/// ------
/// - `n_eff`: effective number of samples (`0` when degenerate, `+∞` when
///   `D` is singular).
/// - `d_value`: `sign · exp(ln|det D| / n)`.
/// - `sign`: sign of `det D` (`-1`, `0`, or `1`).
/// - `degenerate`: `true` exactly when `sign < 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveN {
    pub n_eff: f64,
    pub d_value: f64,
    pub sign: f64,
    pub degenerate: bool,
}

/// Effective sample size implied by `d_matrix`.
///
/// # Errors
/// - `PrecisionError::NotSquare` if `d_matrix` is not square.
pub fn effective_n(d_matrix: &Array2<f64>) -> PrecisionResult<EffectiveN> {
    let n = d_matrix.nrows() as f64;
    let (sign, log_abs) = slogdet(d_matrix)?;
    let d_value = sign * (log_abs / n).exp();
    if sign < 0.0 {
        return Ok(EffectiveN { n_eff: 0.0, d_value, sign, degenerate: true });
    }
    let n_eff = (n + 1.0) / d_value + 1.0;
    Ok(EffectiveN { n_eff, d_value, sign, degenerate: false })
}
