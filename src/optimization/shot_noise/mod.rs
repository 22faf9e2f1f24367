//! shot_noise — maximum-likelihood fit of the shot-noise rescaling `alpha`.
//!
//! Purpose
//! -------
//! Find the `alpha` at which the theory jackknife covariance
//! `C(alpha) = c4 + alpha·c3 + alpha²·c2`, through its debiased precision
//! matrix `Ψ(alpha)`, best explains a data-derived jackknife covariance.
//! The objective is the L1 likelihood
//! `−log L1 = tr(Ψ·C_data) − log det Ψ`, minimized by a Nelder–Mead
//! [`simplex`] solver driven through argmin's `Executor`.
//!
//! Key behaviors
//! -------------
//! - [`fit_shot_noise`] is the single entry point: it checks the data shape,
//!   builds the solver via [`builders`], runs it via [`run`], and returns a
//!   validated [`ShotNoiseFit`].
//! - [`likelihood::neg_log_l1`] evaluates the objective; a non-positive
//!   determinant of `Ψ` is penalized as `+∞`.
//! - [`adapter::ShotNoiseProblem`] bridges the objective into argmin.
//! - [`simplex::ShotNoiseSimplex`] stops only once both the cost spread and
//!   the alpha width of the simplex are within tolerance.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every evaluation recomputes `Ψ(alpha)` from the full jackknife sample
//!   set; nothing is cached between evaluations.
//! - The search is one-dimensional and unconstrained; alpha is reported as
//!   found, including its sign.
//!
//! Conventions
//! -----------
//! - Parameters are one-element `Vec<f64>` vectors ([`types::Alpha`]).
//! - This module does no logging; the pipeline reports the fitted alpha.
//!
//! Testing notes
//! -------------
//! - Unit tests cover option validation, simplex construction, outcome
//!   normalization, the closed-form objective, and recovery of a known
//!   alpha. The mixed-jackknife integration test fits alpha end to end.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod likelihood;
pub mod run;
pub mod simplex;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::fit_shot_noise;
pub use self::likelihood::neg_log_l1;
pub use self::traits::{ShotNoiseFit, ShotNoiseOptions};
pub use self::types::{Alpha, Cost, FnEvalMap};

pub mod prelude {
    pub use super::api::fit_shot_noise;
    pub use super::traits::{ShotNoiseFit, ShotNoiseOptions};
}
