//! optimization — shot-noise rescaling fit and its unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer of the mixed-jackknife pipeline: an
//! argmin-backed Nelder–Mead fit of the shot-noise rescaling `alpha`, and a
//! single error/result surface for configuration issues, estimator failures
//! inside the objective, and backend solver errors.
//!
//! Key behaviors
//! -------------
//! - [`shot_noise`] minimizes `−log L1(alpha)` and returns a
//!   [`shot_noise::ShotNoiseFit`].
//! - [`errors::OptError`] normalizes argmin errors (via
//!   `From<argmin::core::Error>`) and wraps `PrecisionError`s raised inside
//!   the cost function, so callers never see raw backend errors.
//!
//! Conventions
//! -----------
//! - Public entry points that can fail return `OptResult<T>`.
//! - This module avoids I/O and logging; the pipeline layer reports
//!   progress and results.
//!
//! Downstream usage
//! ----------------
//! - `pipeline::mix_jackknife` calls `fit_shot_noise` with the jackknife
//!   sample set and the data covariance from `jackknife`.
//! - Front-ends typically import `optimization::prelude::*`.

pub mod errors;
pub mod shot_noise;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rescaled_cov::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::shot_noise::prelude::*;
}
