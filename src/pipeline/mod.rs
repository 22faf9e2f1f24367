//! pipeline — end-to-end covariance post-processing runs.
//!
//! Purpose
//! -------
//! Compose the loader, jackknife builder, precision estimator, shot-noise
//! optimizer, and archive writer into the two supported runs.
//!
//! Key behaviors
//! -------------
//! - [`legendre`]: fixed `alpha`, all-sample precision, effective N, archive.
//! - [`mix_jackknife`]: data jackknife covariance, fitted `alpha`, jackknife
//!   and all-sample precision, archive.
//! - [`stages`] holds the steps both runs share.
//!
//! Invariants & assumptions
//! ------------------------
//! - Execution is single-threaded and sequential; input files are read once
//!   and never modified.
//! - Advisory conditions (convergence test, degenerate N_eff, unconverged
//!   fit) go to the [`Reporter`](crate::report::Reporter); everything else
//!   aborts the run with a [`PipelineError`].
//!
//! Conventions
//! -----------
//! - Every run takes an explicit `&dyn Reporter`; library code never prints.
//! - `*_from_files` entry points wire in `FileMatrixSource`; the generic
//!   entry points accept any `MatrixSource`.

pub mod config;
pub mod errors;
pub mod legendre;
pub mod mix_jackknife;
pub mod stages;

// ---- Re-exports ------------------------------------------------------------

pub use self::config::{LegendreConfig, MixJackknifeConfig};
pub use self::errors::{PipelineError, PipelineResult};
pub use self::legendre::{LegendreOutcome, run_legendre, run_legendre_from_files};
pub use self::mix_jackknife::{
    MixJackknifeOutcome, run_mix_jackknife, run_mix_jackknife_from_files,
};
