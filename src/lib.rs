//! rescaled_cov — jackknife-debiased precision matrices for Legendre-binned
//! covariance estimates.
//!
//! Purpose
//! -------
//! Post-process the bias-decomposed (`c2`, `c3`, `c4`) covariance matrices
//! produced by an upstream clustering-statistics code: combine them at a
//! shot-noise rescaling `alpha`, remove the leading inversion bias of the
//! precision matrix with leave-one-out subsamples, estimate the effective
//! number of samples, and optionally fit `alpha` against a data jackknife
//! covariance.
//!
//! Key behaviors
//! -------------
//! - [`covariance`] loads, masks, symmetrizes, and validates matrix triples.
//! - [`jackknife`] builds the projected data jackknife covariance.
//! - [`precision`] computes the debiased precision matrix and effective N.
//! - [`optimization`] fits `alpha` with an argmin Nelder–Mead solver.
//! - [`output`] writes and reads the `.npz` result archive.
//! - [`pipeline`] composes the above into the single-field and
//!   mixed-jackknife runs.
//! - [`report`] is the injected progress and diagnostics sink.
//!
//! Invariants & assumptions
//! ------------------------
//! - All matrices are dense `f64` and held in memory; bins are ordered
//!   radial-major, multipole-minor.
//! - Runs are single-threaded and never modify their inputs.
//!
//! Conventions
//! -----------
//! - Each module owns an error enum and a `*Result<T>` alias;
//!   [`pipeline::PipelineError`] wraps all of them.
//! - Library code does not print. Operator-facing messages go through a
//!   [`report::Reporter`].
//!
//! Downstream usage
//! ----------------
//! - The `rescaled-cov` binary parses arguments and calls
//!   `pipeline::run_legendre_from_files` or
//!   `pipeline::run_mix_jackknife_from_files`.
//! - Library callers can supply their own `covariance::MatrixSource` to run
//!   the pipelines over matrices that do not live in files.
//!
//! Testing notes
//! -------------
//! - Each module carries unit tests; `tests/` runs both pipelines end to end
//!   over synthetic matrix files in temporary directories.

pub mod covariance;
pub mod jackknife;
pub mod optimization;
pub mod output;
pub mod pipeline;
pub mod precision;
pub mod report;
