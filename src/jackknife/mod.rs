//! jackknife — data-derived jackknife covariance for the mixed Legendre variant.
//!
//! Purpose
//! -------
//! Read per-region correlation-function estimates and weights, discard
//! regions with non-finite estimates, build the weighted jackknife
//! covariance in (r, mu) bins, and project it onto Legendre multipoles with
//! the same radial/multipole skipping the theory matrices get.
//!
//! Key behaviors
//! -------------
//! - [`inputs`] locates and reads the estimate, weight, and Legendre-factor
//!   files.
//! - [`data_cov`] implements the estimator and the projection.
//!
//! Downstream usage
//! ----------------
//! - The resulting matrix is the `data_cov` argument of the shot-noise
//!   likelihood in `optimization::shot_noise`.

pub mod data_cov;
pub mod errors;
pub mod inputs;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::data_cov::{JackknifeCovariance, build_jackknife_covariance};
pub use self::errors::{JackknifeError, JackknifeResult};
pub use self::inputs::{
    JackknifeInputs, jackknife_weights_path, legendre_factors_path, load_jackknife_weights,
    load_legendre_factors, load_xi_jackknife,
};
