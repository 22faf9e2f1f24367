//! shot_noise::builders — Nelder–Mead construction for the alpha fit.
//!
//! The initial simplex is `{alpha0, 1.05·alpha0}`, or `{0, 0.00025}` when
//! `alpha0 = 0`. Both stopping tolerances come from [`ShotNoiseOptions`];
//! the iteration cap is applied by the runner.
use crate::optimization::{
    errors::OptResult,
    shot_noise::{
        traits::ShotNoiseOptions,
        types::{Alpha, SIMPLEX_STEP, ShotNoiseSolver, ZERO_ALPHA_STEP},
        validation::{verify_alpha_tolerance, verify_sd_tolerance},
    },
};

/// Two-vertex starting simplex around `alpha0`.
pub fn initial_simplex(alpha0: f64) -> Vec<Alpha> {
    let second = if alpha0 == 0.0 { ZERO_ALPHA_STEP } else { SIMPLEX_STEP * alpha0 };
    vec![vec![alpha0], vec![second]]
}

/// Nelder–Mead solver configured from `opts`.
///
/// # Errors
/// - Tolerance validation errors; `opts` built through
///   [`ShotNoiseOptions::new`] always pass.
pub fn build_nelder_mead(opts: &ShotNoiseOptions) -> OptResult<ShotNoiseSolver> {
    verify_sd_tolerance(opts.sd_tolerance)?;
    verify_alpha_tolerance(opts.alpha_tolerance)?;
    Ok(ShotNoiseSolver::new(initial_simplex(opts.alpha0), opts.sd_tolerance, opts.alpha_tolerance))
}
