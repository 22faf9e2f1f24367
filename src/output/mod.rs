//! output — result archives in NumPy `.npz` format.
//!
//! Purpose
//! -------
//! Serialize the covariance, precision, and D matrices, the per-subsample
//! covariance stacks, the rescaling `alpha`, and `N_eff` of one run into a
//! single compressed archive, using the output keys and file names the
//! downstream analysis expects.
//!
//! Key behaviors
//! -------------
//! - [`ResultArchive`] is assembled fully in memory, then written in one go
//!   through a temporary file.
//! - [`ResultArchive::read`] loads an archive back for inspection and tests.

pub mod archive;
pub mod errors;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::archive::{
    ArchiveEntry, ResultArchive, jackknife_output_path, keys, legendre_output_path,
};
pub use self::errors::{OutputError, OutputResult};
