//! High-level entry point for fitting the shot-noise rescaling.
//!
//! Validates the inputs, builds the
//! [`ShotNoiseSimplex`](crate::optimization::shot_noise::simplex::ShotNoiseSimplex)
//! solver, wraps the jackknife sample set in a [`ShotNoiseProblem`], and
//! delegates to `run_nelder_mead`.
use ndarray::Array2;

use crate::{
    covariance::types::SampleSet,
    optimization::{
        errors::OptResult,
        shot_noise::{
            adapter::ShotNoiseProblem,
            builders::build_nelder_mead,
            run::run_nelder_mead,
            traits::{ShotNoiseFit, ShotNoiseOptions},
            validation::validate_data_shape,
        },
    },
};

/// Fit `alpha` by minimizing `−log L1` between `data_cov` and the theory
/// jackknife covariance built from `samples`.
///
/// # Errors
/// - `OptError::DataShapeMismatch` before any evaluation if `data_cov` is
///   not `n_bins × n_bins`.
/// - `OptError::Precision` if the estimator fails at a trial alpha.
/// - `OptError::NonFiniteCost` if no trial alpha had a finite cost.
pub fn fit_shot_noise(
    samples: &SampleSet, data_cov: &Array2<f64>, opts: &ShotNoiseOptions,
) -> OptResult<ShotNoiseFit> {
    validate_data_shape(data_cov, samples.n_bins())?;
    let solver = build_nelder_mead(opts)?;
    let problem = ShotNoiseProblem::new(samples, data_cov);
    run_nelder_mead(problem, solver, opts)
}
