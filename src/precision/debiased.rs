//! precision::debiased — jackknife-corrected precision matrix estimator.
//!
//! Purpose
//! -------
//! Turn one full covariance triple and N leave-one-out partial triples into
//! a precision matrix with the leading finite-sample inversion bias removed.
//! For a shot-noise rescaling `alpha`:
//!
//! 1. `C = c4 + alpha·c3 + alpha²·c2` (full) and `C_i` likewise (partials).
//! 2. `S = Σ_i C_i`.
//! 3. `T = Σ_i inv((S − C_i)/(N − 1)) · C_i`.
//! 4. `D = (N − 1)/N · (−I + T/N)`.
//! 5. `Ψ = (I − D) · inv(C)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `partials.len() ≥ 2`; with a single subsample the leave-one-out
//!   average is empty and the estimator is undefined.
//! - Positive definiteness of `C` is the caller's responsibility; this
//!   module only fails when an inversion is singular.
//! - Everything is recomputed from scratch on every call. There is no
//!   caching between alpha evaluations.
//!
//! Downstream usage
//! ----------------
//! - `optimization::shot_noise` evaluates [`debiased_precision`] inside the
//!   likelihood for every trial `alpha`.
//! - Pipelines call it once more at the final `alpha` for the reported
//!   jackknife and full-sample matrices.
use ndarray::{Array2, Array3};

use crate::{
    covariance::types::{CovTriple, SampleSet},
    precision::{
        errors::{PrecisionError, PrecisionResult},
        linalg::invert,
    },
};

/// PrecisionEstimate — all matrices produced for one `alpha`.
///
/// Fields
/// ------
/// - `alpha`: shot-noise rescaling used.
/// - `covariance`: full `C(alpha)`.
/// - `partial_covariances`: `N × n_bins × n_bins` stack of `C_i(alpha)`.
/// - `d_matrix`: bias-correction matrix `D`.
/// - `precision`: `Ψ = (I − D)·C⁻¹`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecisionEstimate {
    pub alpha: f64,
    pub covariance: Array2<f64>,
    pub partial_covariances: Array3<f64>,
    pub d_matrix: Array2<f64>,
    pub precision: Array2<f64>,
}

/// Debiased precision matrix for a [`SampleSet`] at `alpha`.
///
/// # Errors
/// See [`debiased_precision_from`].
pub fn debiased_precision(samples: &SampleSet, alpha: f64) -> PrecisionResult<PrecisionEstimate> {
    debiased_precision_from(&samples.full, &samples.partials, alpha)
}

/// Debiased precision matrix from an explicit full triple and partials.
///
/// # Errors
/// - [`PrecisionError::InvalidAlpha`] if `alpha` is not finite.
/// - [`PrecisionError::TooFewSamples`] if fewer than two partials are given.
/// - [`PrecisionError::ShapeMismatch`] if any partial differs from `full`.
/// - [`PrecisionError::Singular`] if a leave-one-out average or `C` cannot
///   be inverted.
pub fn debiased_precision_from(
    full: &CovTriple, partials: &[CovTriple], alpha: f64,
) -> PrecisionResult<PrecisionEstimate> {
    if !alpha.is_finite() {
        return Err(PrecisionError::InvalidAlpha { value: alpha });
    }
    let n_samples = partials.len();
    if n_samples < 2 {
        return Err(PrecisionError::TooFewSamples { n_samples });
    }
    let expected = full.c2.dim();
    for p in partials {
        if p.c2.dim() != expected {
            return Err(PrecisionError::ShapeMismatch { expected, found: p.c2.dim() });
        }
    }

    let n_bins = full.n_bins();
    let covariance = full.combine(alpha);
    let partial_cov: Vec<Array2<f64>> = partials.iter().map(|p| p.combine(alpha)).collect();
    let d_matrix = bias_matrix(&partial_cov, n_bins)?;

    let identity = Array2::<f64>::eye(n_bins);
    let precision = (&identity - &d_matrix).dot(&invert(&covariance, "full covariance")?);

    let partial_covariances = Array3::from_shape_fn((n_samples, n_bins, n_bins), |(k, i, j)| {
        partial_cov[k][[i, j]]
    });

    Ok(PrecisionEstimate { alpha, covariance, partial_covariances, d_matrix, precision })
}

/// `D = (N − 1)/N · (−I + T/N)` with `T = Σ_i inv(C_excl_i)·C_i`.
fn bias_matrix(partial_cov: &[Array2<f64>], n_bins: usize) -> PrecisionResult<Array2<f64>> {
    let n = partial_cov.len() as f64;
    let mut sum = Array2::<f64>::zeros((n_bins, n_bins));
    for c in partial_cov {
        sum += c;
    }
    let mut t = Array2::<f64>::zeros((n_bins, n_bins));
    for c_i in partial_cov {
        let c_excl = (&sum - c_i) / (n - 1.0);
        t += &invert(&c_excl, "leave-one-out covariance")?.dot(c_i);
    }
    let identity = Array2::<f64>::eye(n_bins);
    Ok((t / n - identity) * ((n - 1.0) / n))
}
