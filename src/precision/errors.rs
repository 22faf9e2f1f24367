//! Unified error handling for the precision-matrix estimators.
//!
//! `PrecisionError` covers the dense linear-algebra failures of the debiased
//! estimator (singular inversions) and its input contract (sample count,
//! shapes). An alias `PrecisionResult<T>` standardizes the return type.

/// Crate-wide result alias for precision estimation.
pub type PrecisionResult<T> = Result<T, PrecisionError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PrecisionError {
    // ---- Linear algebra ----
    /// Dense inversion failed because the matrix is singular.
    Singular {
        what: &'static str,
    },

    /// A matrix that must be square is not.
    NotSquare {
        rows: usize,
        cols: usize,
    },

    // ---- Inputs ----
    /// The leave-one-out average needs at least two subsamples.
    TooFewSamples {
        n_samples: usize,
    },

    /// Matrices that must share a shape do not.
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Shot-noise rescaling must be finite.
    InvalidAlpha {
        value: f64,
    },
}

impl std::error::Error for PrecisionError {}

impl std::fmt::Display for PrecisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Linear algebra ----
            PrecisionError::Singular { what } => {
                write!(f, "Singular matrix: cannot invert {what}")
            }
            PrecisionError::NotSquare { rows, cols } => {
                write!(f, "Matrix is not square: {rows}x{cols}")
            }

            // ---- Inputs ----
            PrecisionError::TooFewSamples { n_samples } => {
                write!(f, "At least 2 subsamples are required, found {n_samples}")
            }
            PrecisionError::ShapeMismatch { expected, found } => {
                write!(f, "Matrix shape mismatch: expected {expected:?}, found {found:?}")
            }
            PrecisionError::InvalidAlpha { value } => {
                write!(f, "Invalid shot-noise rescaling {value}: must be finite")
            }
        }
    }
}
