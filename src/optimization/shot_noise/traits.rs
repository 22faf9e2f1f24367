//! Public configuration and outcome types for the shot-noise fit.
//!
//! - [`ShotNoiseOptions`]: starting point and stopping rules for Nelder–Mead.
//! - [`ShotNoiseFit`]: normalized result returned by `fit_shot_noise`.
use argmin::core::{TerminationReason, TerminationStatus};

use crate::optimization::{
    errors::OptResult,
    shot_noise::{
        types::{Alpha, FnEvalMap},
        validation::{
            validate_alpha_hat, validate_value, verify_alpha0, verify_alpha_tolerance,
            verify_max_iter, verify_sd_tolerance,
        },
    },
};

/// Starting point and stopping rules for the alpha fit.
///
/// - `alpha0`: starting rescaling; the initial simplex is
///   `{alpha0, 1.05·alpha0}` (`{0, 0.00025}` for `alpha0 = 0`).
/// - `sd_tolerance`: the standard deviation of the simplex costs must fall
///   below this value.
/// - `alpha_tolerance`: every vertex must lie within this distance of the
///   best one. The fit stops only when both tolerances hold.
/// - `max_iter`: hard cap on solver iterations.
/// - `verbose`: attach argmin's terminal observer (`obs_slog` feature only).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotNoiseOptions {
    pub alpha0: f64,
    pub sd_tolerance: f64,
    pub alpha_tolerance: f64,
    pub max_iter: usize,
    pub verbose: bool,
}

impl ShotNoiseOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`OptError::InvalidAlpha0`] for a non-finite `alpha0`.
    /// - [`OptError::InvalidSdTolerance`] for a non-finite or non-positive tolerance.
    /// - [`OptError::InvalidAlphaTolerance`] likewise for `alpha_tolerance`.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    ///
    /// [`OptError::InvalidAlpha0`]: crate::optimization::errors::OptError::InvalidAlpha0
    /// [`OptError::InvalidSdTolerance`]: crate::optimization::errors::OptError::InvalidSdTolerance
    /// [`OptError::InvalidAlphaTolerance`]: crate::optimization::errors::OptError::InvalidAlphaTolerance
    /// [`OptError::InvalidMaxIter`]: crate::optimization::errors::OptError::InvalidMaxIter
    pub fn new(
        alpha0: f64, sd_tolerance: f64, alpha_tolerance: f64, max_iter: usize, verbose: bool,
    ) -> OptResult<Self> {
        verify_alpha0(alpha0)?;
        verify_sd_tolerance(sd_tolerance)?;
        verify_alpha_tolerance(alpha_tolerance)?;
        verify_max_iter(max_iter)?;
        Ok(Self { alpha0, sd_tolerance, alpha_tolerance, max_iter, verbose })
    }
}

impl Default for ShotNoiseOptions {
    fn default() -> Self {
        Self {
            alpha0: 1.0,
            sd_tolerance: 1e-4,
            alpha_tolerance: 1e-4,
            max_iter: 200,
            verbose: false,
        }
    }
}

/// Canonical result of a shot-noise fit.
///
/// - `alpha`: best rescaling found.
/// - `neg_log_l1`: likelihood cost at `alpha`.
/// - `converged`: `true` only when both simplex tolerances were met.
/// - `status`: human-readable termination status.
/// - `iterations`: solver iterations performed.
/// - `fn_evals`: argmin's counters (e.g. `cost_count`).
#[derive(Debug, Clone, PartialEq)]
pub struct ShotNoiseFit {
    pub alpha: f64,
    pub neg_log_l1: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl ShotNoiseFit {
    /// Build a validated fit from raw solver state.
    ///
    /// # Errors
    /// - Propagates validation errors for the best parameter and cost.
    pub fn new(
        alpha_hat: Option<Alpha>, neg_log_l1: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap,
    ) -> OptResult<Self> {
        let alpha = validate_alpha_hat(alpha_hat)?;
        validate_value(neg_log_l1)?;
        let converged = matches!(
            termination,
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
        );
        let status = match termination {
            TerminationStatus::NotTerminated => "Not terminated".to_string(),
            other => format!("{other:?}"),
        };
        Ok(Self { alpha, neg_log_l1, converged, status, iterations: iterations as usize, fn_evals })
    }

    /// Number of likelihood evaluations, if argmin counted them.
    pub fn cost_evals(&self) -> u64 {
        self.fn_evals.get("cost_count").copied().unwrap_or(0)
    }
}
