//! precision — debiased precision matrices and effective sample sizes.
//!
//! Purpose
//! -------
//! Provide the numerical core of the crate: the jackknife-corrected
//! precision-matrix estimator built from one full and N leave-one-out
//! covariance triples, and the effective-N statistic derived from its
//! bias-correction matrix `D`.
//!
//! Key behaviors
//! -------------
//! - [`debiased_precision`] computes `D` and `Ψ = (I − D)·C⁻¹` for a given
//!   shot-noise rescaling `alpha`.
//! - [`effective_n`] computes `N_eff` from `slogdet(D)`, clamping to zero when
//!   the determinant sign is negative.
//! - [`linalg`] bridges `ndarray` storage to `nalgebra` factorizations
//!   (inverse, sign/log determinant, symmetric eigenvalues).
//!
//! Invariants & assumptions
//! ------------------------
//! - All inversions are exact dense LU inversions; a singular matrix is a
//!   fatal [`PrecisionError::Singular`].
//! - Inputs are masked, symmetrized triples from `covariance::loader`.
//!
//! Conventions
//! -----------
//! - Functions here are pure: no I/O, no logging, no global state. Warnings
//!   (degenerate `N_eff`) are surfaced by the pipeline layer.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the identical-subsample limit, hand-computed scalar
//!   cases, determinant sign handling, and singular-input propagation.

pub mod debiased;
pub mod effective_n;
pub mod errors;
pub mod linalg;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::debiased::{PrecisionEstimate, debiased_precision, debiased_precision_from};
pub use self::effective_n::{EffectiveN, effective_n};
pub use self::errors::{PrecisionError, PrecisionResult};
