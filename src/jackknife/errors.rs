//! Unified error handling for the data-derived jackknife covariance.
//!
//! `JackknifeError` covers reading the correlation-function jackknife
//! estimates, weights, and mu-bin Legendre factors, and the shape contract of
//! the weighted covariance and its Legendre projection. An alias
//! `JackknifeResult<T>` standardizes the return type.
use crate::covariance::errors::CovError;

pub type JackknifeResult<T> = Result<T, JackknifeError>;

#[derive(Debug, Clone, PartialEq)]
pub enum JackknifeError {
    // ---- Inputs ----
    /// Reading one of the input text files failed.
    Read(CovError),

    /// The weights file needs a leading index column plus one column per bin.
    WeightsTooNarrow {
        cols: usize,
    },

    // ---- Shape ----
    /// Estimates and weights must have identical shapes.
    ShapeMismatch {
        xi: (usize, usize),
        weights: (usize, usize),
    },

    /// Number of (r, mu) bins is not a multiple of the mu-bin count.
    BinsNotDivisible {
        n_bins: usize,
        n_mu: usize,
    },

    /// The projection matrix must have one row per mu bin.
    ProjectionRows {
        expected: usize,
        found: usize,
    },

    /// Skip counts remove every radial bin or every multipole.
    InvalidSkip {
        skip_r_bins: usize,
        skip_l: usize,
    },

    // ---- Regions ----
    /// Fewer than two regions have finite estimates everywhere.
    TooFewRegions {
        used: usize,
        total: usize,
    },

    /// The surviving weights of a bin sum to zero.
    ZeroWeightSum {
        bin: usize,
    },
}

impl From<CovError> for JackknifeError {
    fn from(err: CovError) -> Self {
        JackknifeError::Read(err)
    }
}

impl std::error::Error for JackknifeError {}

impl std::fmt::Display for JackknifeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Inputs ----
            JackknifeError::Read(err) => write!(f, "Jackknife Error: {err}"),
            JackknifeError::WeightsTooNarrow { cols } => {
                write!(f, "Jackknife Error: weights file has only {cols} column(s)")
            }

            // ---- Shape ----
            JackknifeError::ShapeMismatch { xi, weights } => write!(
                f,
                "Jackknife Error: estimates have shape {xi:?} but weights have shape {weights:?}"
            ),
            JackknifeError::BinsNotDivisible { n_bins, n_mu } => write!(
                f,
                "Jackknife Error: {n_bins} (r, mu) bins are not divisible by {n_mu} mu bins"
            ),
            JackknifeError::ProjectionRows { expected, found } => write!(
                f,
                "Jackknife Error: Legendre factors have {found} rows, expected {expected}"
            ),
            JackknifeError::InvalidSkip { skip_r_bins, skip_l } => write!(
                f,
                "Jackknife Error: skipping {skip_r_bins} radial bin(s) and {skip_l} multipole(s) leaves no bins"
            ),

            // ---- Regions ----
            JackknifeError::TooFewRegions { used, total } => write!(
                f,
                "Jackknife Error: only {used} of {total} jackknife regions have finite estimates"
            ),
            JackknifeError::ZeroWeightSum { bin } => {
                write!(f, "Jackknife Error: weights of bin {bin} sum to zero")
            }
        }
    }
}
