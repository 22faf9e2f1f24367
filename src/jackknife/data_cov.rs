//! jackknife::data_cov — data-derived jackknife covariance in Legendre bins.
//!
//! Purpose
//! -------
//! Build the covariance of the correlation function measured across
//! jackknife regions, projected from (r, mu) bins to (r, ℓ) Legendre
//! multipoles, so it can be compared with the theory jackknife covariance
//! when fitting the shot-noise rescaling.
//!
//! The estimator is
//!
//! ```text
//! w̃_ab   = w_ab / Σ_a w_ab                      (renormalized weights)
//! x̄_b    = Σ_a w̃_ab · x_ab
//! W_ab   = w̃_ab · (x_ab − x̄_b)
//! Cov_bc = (WᵀW)_bc / (1 − (w̃ᵀw̃)_bc)
//! ```
//!
//! followed by the projection of each radial block onto multipoles,
//! `Cov_ℓ[i, j] = Pᵀ · Cov[i, j] · P`, where `P` is the `m × n_l` mu-bin
//! Legendre factor matrix with its trailing `skip_l` columns removed.
//!
//! Key behaviors
//! -------------
//! - Regions with any non-finite estimate are discarded before anything else;
//!   the kept count is reported as "Using k out of N jackknives".
//! - The first `skip_r_bins` radial bins are dropped before projecting.
//! - `skip_l = 0` keeps every column of `P`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Bins are ordered radial-major, mu-minor in the inputs and radial-major,
//!   multipole-minor in the output, matching the theory matrices.
//! - At least two regions must survive filtering.
//!
//! Downstream usage
//! ----------------
//! - `pipeline::mix_jackknife` feeds [`JackknifeCovariance::matrix`] to the
//!   shot-noise optimizer after checking it matches the theory shape.
use ndarray::{Array1, Array2, Axis, s};

use crate::{
    jackknife::{
        errors::{JackknifeError, JackknifeResult},
        inputs::JackknifeInputs,
    },
    report::Reporter,
};

/// JackknifeCovariance — projected data covariance and region bookkeeping.
///
/// Fields
/// ------
/// - `matrix`: `((n − skip_r)·(n_l − skip_l))²` covariance in Legendre bins.
/// - `n_regions_total`: regions present in the input.
/// - `n_regions_used`: regions with finite estimates in every bin.
/// - `n_radial`: radial bins in the input (before skipping).
#[derive(Debug, Clone, PartialEq)]
pub struct JackknifeCovariance {
    pub matrix: Array2<f64>,
    pub n_regions_total: usize,
    pub n_regions_used: usize,
    pub n_radial: usize,
}

/// Build the projected jackknife covariance from loaded inputs.
///
/// # Errors
/// - [`JackknifeError::ShapeMismatch`] if `xi` and `weights` differ in shape.
/// - [`JackknifeError::BinsNotDivisible`] if bins are not a multiple of `n_mu`.
/// - [`JackknifeError::ProjectionRows`] if the factors do not have `n_mu` rows.
/// - [`JackknifeError::InvalidSkip`] if the skips leave no bins.
/// - [`JackknifeError::TooFewRegions`] if fewer than two regions are finite.
/// - [`JackknifeError::ZeroWeightSum`] if a bin has no surviving weight.
pub fn build_jackknife_covariance(
    inputs: &JackknifeInputs, skip_r_bins: usize, skip_l: usize, reporter: &dyn Reporter,
) -> JackknifeResult<JackknifeCovariance> {
    let JackknifeInputs { xi, weights, legendre_factors, n_mu } = inputs;
    if xi.dim() != weights.dim() {
        return Err(JackknifeError::ShapeMismatch { xi: xi.dim(), weights: weights.dim() });
    }
    let n_radial = inputs.n_radial()?;
    if legendre_factors.nrows() != *n_mu {
        return Err(JackknifeError::ProjectionRows {
            expected: *n_mu,
            found: legendre_factors.nrows(),
        });
    }
    if skip_r_bins >= n_radial || skip_l >= legendre_factors.ncols() {
        return Err(JackknifeError::InvalidSkip { skip_r_bins, skip_l });
    }

    let n_regions_total = xi.nrows();
    let good: Vec<usize> = xi
        .axis_iter(Axis(0))
        .enumerate()
        .filter(|(_, row)| row.iter().all(|v| v.is_finite()))
        .map(|(a, _)| a)
        .collect();
    reporter.info(&format!("Using {} out of {} jackknives", good.len(), n_regions_total));
    if good.len() < 2 {
        return Err(JackknifeError::TooFewRegions { used: good.len(), total: n_regions_total });
    }

    reporter.info("Computing data covariance matrix");
    let xi_good = xi.select(Axis(0), &good);
    let weights_good = renormalize(weights.select(Axis(0), &good))?;
    let binned = weighted_covariance(&xi_good, &weights_good);

    let n_kept_l = legendre_factors.ncols() - skip_l;
    let projection = legendre_factors.slice(s![.., ..n_kept_l]).to_owned();
    let matrix = project_to_legendre(&binned, &projection, n_radial, skip_r_bins);

    Ok(JackknifeCovariance {
        matrix,
        n_regions_total,
        n_regions_used: good.len(),
        n_radial,
    })
}

/// Rescale every column to sum to one.
fn renormalize(mut weights: Array2<f64>) -> JackknifeResult<Array2<f64>> {
    let sums: Array1<f64> = weights.sum_axis(Axis(0));
    if let Some(bin) = sums.iter().position(|&s| s == 0.0) {
        return Err(JackknifeError::ZeroWeightSum { bin });
    }
    weights /= &sums;
    Ok(weights)
}

/// `(WᵀW) / (1 − w̃ᵀw̃)` with `W = w̃ ⊙ (x − x̄)`.
fn weighted_covariance(xi: &Array2<f64>, weights: &Array2<f64>) -> Array2<f64> {
    let mean: Array1<f64> = (xi * weights).sum_axis(Axis(0));
    let centered = weights * &(xi - &mean);
    let numerator = centered.t().dot(&centered);
    let overlap = weights.t().dot(weights);
    numerator / overlap.mapv(|w| 1.0 - w)
}

/// Contract both mu axes of every kept radial block with `projection`.
fn project_to_legendre(
    cov: &Array2<f64>, projection: &Array2<f64>, n_radial: usize, skip_r_bins: usize,
) -> Array2<f64> {
    let (n_mu, n_l) = projection.dim();
    let kept = n_radial - skip_r_bins;
    let mut out = Array2::<f64>::zeros((kept * n_l, kept * n_l));
    for i in 0..kept {
        let r0 = (i + skip_r_bins) * n_mu;
        for j in 0..kept {
            let c0 = (j + skip_r_bins) * n_mu;
            let block = cov.slice(s![r0..r0 + n_mu, c0..c0 + n_mu]);
            let projected = projection.t().dot(&block).dot(projection);
            out.slice_mut(s![i * n_l..(i + 1) * n_l, j * n_l..(j + 1) * n_l]).assign(&projected);
        }
    }
    out
}
