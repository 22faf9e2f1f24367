//! Unified error handling for covariance loading and validation.
//!
//! This module defines `CovError`, the error type used by the matrix text
//! reader, the bin mask, the `MatrixSource` adapters, and the eager checks
//! run on loaded triples (shape, bin-count, positive definiteness). An alias
//! `CovResult<T>` standardizes the return type across `covariance` code.
use std::path::PathBuf;

/// Crate-wide result alias for covariance loading operations.
pub type CovResult<T> = Result<T, CovError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CovError {
    // ---- I/O ----
    /// File could not be opened or read.
    Io {
        path: PathBuf,
        message: String,
    },

    /// A token could not be parsed as a floating point number.
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },

    /// Rows of a text matrix have different lengths.
    RaggedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// No numeric rows were found.
    EmptyMatrix {
        path: PathBuf,
    },

    /// Parsed values could not be laid out as a `rows × cols` matrix.
    MalformedMatrix {
        path: PathBuf,
        rows: usize,
        cols: usize,
        message: String,
    },

    // ---- Shape ----
    /// A covariance matrix must be square.
    NotSquare {
        rows: usize,
        cols: usize,
    },

    /// Matrices that must share a shape do not.
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Matrix dimension is not divisible by the radial-bin count.
    BinCountMismatch {
        dim: usize,
        n_radial: usize,
    },

    /// The multipole count implied by the matrix disagrees with the expected one.
    MultipoleCountMismatch {
        expected: usize,
        found: usize,
    },

    /// The mask length differs from the matrix dimension.
    MaskLengthMismatch {
        mask_len: usize,
        dim: usize,
    },

    /// Skip counts leave no bins, or are otherwise inconsistent.
    InvalidGeometry {
        reason: &'static str,
    },

    /// A sample set needs at least one partial triple.
    NoPartialSamples,

    // ---- Positive definiteness ----
    /// The combined covariance at the chosen alpha has a non-positive eigenvalue.
    NotPositiveDefinite {
        min_eigenvalue: f64,
    },
}

impl std::error::Error for CovError {}

impl std::fmt::Display for CovError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- I/O ----
            CovError::Io { path, message } => {
                write!(f, "Failed to read {}: {message}", path.display())
            }
            CovError::Parse { path, line, token } => {
                write!(f, "Invalid number '{token}' at {}:{line}", path.display())
            }
            CovError::RaggedRow { path, line, expected, found } => {
                write!(
                    f,
                    "Ragged row at {}:{line}: expected {expected} columns, found {found}",
                    path.display()
                )
            }
            CovError::EmptyMatrix { path } => {
                write!(f, "No numeric rows found in {}", path.display())
            }
            CovError::MalformedMatrix { path, rows, cols, message } => {
                write!(f, "Cannot shape {} as {rows}x{cols}: {message}", path.display())
            }

            // ---- Shape ----
            CovError::NotSquare { rows, cols } => {
                write!(f, "Covariance matrix is not square: {rows}x{cols}")
            }
            CovError::ShapeMismatch { expected, found } => {
                write!(f, "Matrix shape mismatch: expected {expected:?}, found {found:?}")
            }
            CovError::BinCountMismatch { dim, n_radial } => {
                write!(
                    f,
                    "Number of bins mismatch: dimension {dim} is not divisible by {n_radial} radial bins"
                )
            }
            CovError::MultipoleCountMismatch { expected, found } => {
                write!(f, "Multipole count mismatch: expected {expected}, found {found}")
            }
            CovError::MaskLengthMismatch { mask_len, dim } => {
                write!(f, "Bin mask length {mask_len} does not match matrix dimension {dim}")
            }
            CovError::InvalidGeometry { reason } => {
                write!(f, "Invalid bin geometry: {reason}")
            }
            CovError::NoPartialSamples => {
                write!(f, "A sample set needs at least one partial covariance triple")
            }

            // ---- Positive definiteness ----
            CovError::NotPositiveDefinite { min_eigenvalue } => {
                write!(
                    f,
                    "The full covariance is not positive definite (min eigenvalue {min_eigenvalue:.3e}) - insufficient convergence"
                )
            }
        }
    }
}
