//! covariance — loading, masking, and validating bias-decomposed covariances.
//!
//! Purpose
//! -------
//! Turn the upstream `c2`/`c3`/`c4` matrix files into in-memory
//! [`CovTriple`]s restricted to the requested radial bins and multipoles,
//! and run the eager checks that gate all later precision work.
//!
//! Key behaviors
//! -------------
//! - [`MatrixSource`] is the seam between storage and computation;
//!   [`FileMatrixSource`] implements the on-disk naming convention.
//! - [`MatrixLoader`] validates dimensions, applies the cached [`BinMask`],
//!   and symmetrizes `c3`/`c4`.
//! - [`validation`] holds the convergence and positive-definiteness checks.
//!
//! Invariants & assumptions
//! ------------------------
//! - Bins are ordered radial-major, multipole-minor everywhere.
//! - Every triple of one [`SampleSet`] went through the same mask.
//!
//! Testing notes
//! -------------
//! - Unit tests use an in-memory `MatrixSource`; the integration tests
//!   in `tests/` exercise the file adapter end to end.

pub mod errors;
pub mod loader;
pub mod mask;
pub mod text;
pub mod types;
pub mod validation;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{CovError, CovResult};
pub use self::loader::{BinGeometry, FileMatrixSource, MatrixLoader, MatrixSource, symmetrize};
pub use self::mask::BinMask;
pub use self::text::{parse_text_matrix, read_text_matrix};
pub use self::types::{CovTriple, MatrixSet, RawTriple, SampleIndex, SampleSet};
pub use self::validation::{
    ConvergenceReport, convergence_check, ensure_positive_definite, ensure_same_shape,
};
