//! covariance::types — covariance triples, sample sets, and sample addressing.
//!
//! Purpose
//! -------
//! Define the in-memory data model shared by the loader, the debiased
//! precision estimator, and the pipelines: a bias-decomposed covariance
//! triple `(c2, c3, c4)`, a set of one full and N leave-one-out triples, and
//! the `(MatrixSet, SampleIndex)` pair that addresses a triple upstream.
//!
//! Invariants & assumptions
//! ------------------------
//! - The three matrices of a [`CovTriple`] are square and share a shape.
//!   `c3` and `c4` are symmetric once the loader has run; `c2` is symmetric
//!   by construction upstream.
//! - Every member of a [`SampleSet`] has the same shape and bin ordering
//!   (radial-major, multipole-minor).
//!
//! Conventions
//! -----------
//! - `C(alpha) = c4 + alpha·c3 + alpha²·c2` throughout the crate.
use std::fmt;

use ndarray::Array2;

use crate::covariance::errors::{CovError, CovResult};

/// Which sample a triple belongs to: the best full estimate or one
/// leave-one-out subsample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleIndex {
    Full,
    Subsample(usize),
}

impl fmt::Display for SampleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleIndex::Full => write!(f, "full"),
            SampleIndex::Subsample(i) => write!(f, "{i}"),
        }
    }
}

/// Target set of matrices produced upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixSet {
    /// Matrices integrated over all galaxy pairs.
    AllSamples,
    /// Matrices weighted for the jackknife-region covariance.
    Jackknife,
}

impl MatrixSet {
    /// Subdirectory of the covariance root holding this set.
    pub fn subdir(&self) -> &'static str {
        match self {
            MatrixSet::AllSamples => "CovMatricesAll",
            MatrixSet::Jackknife => "CovMatricesJack",
        }
    }
}

impl fmt::Display for MatrixSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixSet::AllSamples => write!(f, "all-sample"),
            MatrixSet::Jackknife => write!(f, "jackknife"),
        }
    }
}

/// Unmasked, unsymmetrized matrices exactly as delivered by a source.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTriple {
    pub c2: Array2<f64>,
    pub c3: Array2<f64>,
    pub c4: Array2<f64>,
}

impl RawTriple {
    /// Common dimension of the three matrices.
    ///
    /// # Errors
    /// - [`CovError::NotSquare`] if `c2` is not square.
    /// - [`CovError::ShapeMismatch`] if `c3` or `c4` differ from `c2`.
    pub fn dim(&self) -> CovResult<usize> {
        let (rows, cols) = self.c2.dim();
        if rows != cols {
            return Err(CovError::NotSquare { rows, cols });
        }
        for other in [&self.c3, &self.c4] {
            if other.dim() != (rows, cols) {
                return Err(CovError::ShapeMismatch { expected: (rows, cols), found: other.dim() });
            }
        }
        Ok(rows)
    }
}

/// CovTriple — masked, symmetrized bias-decomposed covariance.
///
/// Fields
/// ------
/// - `c2`: quadratic-in-alpha (Gaussian shot-noise squared) term.
/// - `c3`: linear-in-alpha term.
/// - `c4`: zeroth-order (non-Gaussian) term.
///
/// Invariants
/// ----------
/// - All three are `n_bins × n_bins`; enforced by [`CovTriple::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct CovTriple {
    pub c2: Array2<f64>,
    pub c3: Array2<f64>,
    pub c4: Array2<f64>,
}

impl CovTriple {
    /// Build a triple, checking that all three matrices are square and equal in shape.
    pub fn new(c2: Array2<f64>, c3: Array2<f64>, c4: Array2<f64>) -> CovResult<Self> {
        let raw = RawTriple { c2, c3, c4 };
        raw.dim()?;
        Ok(Self { c2: raw.c2, c3: raw.c3, c4: raw.c4 })
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.c2.nrows()
    }

    /// Evaluate `C(alpha) = c4 + alpha·c3 + alpha²·c2`.
    pub fn combine(&self, alpha: f64) -> Array2<f64> {
        let mut out = self.c4.clone();
        out.scaled_add(alpha, &self.c3);
        out.scaled_add(alpha * alpha, &self.c2);
        out
    }
}

/// SampleSet — one full triple plus N leave-one-out partial triples.
///
/// Invariants
/// ----------
/// - `partials.len() ≥ 1`.
/// - Every partial has the same shape as `full`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    pub full: CovTriple,
    pub partials: Vec<CovTriple>,
}

impl SampleSet {
    /// Assemble a sample set, rejecting empty or shape-inconsistent inputs.
    ///
    /// # Errors
    /// - [`CovError::NoPartialSamples`] if `partials` is empty.
    /// - [`CovError::ShapeMismatch`] if any partial differs in shape from `full`.
    pub fn new(full: CovTriple, partials: Vec<CovTriple>) -> CovResult<Self> {
        if partials.is_empty() {
            return Err(CovError::NoPartialSamples);
        }
        let expected = full.c2.dim();
        for partial in &partials {
            if partial.c2.dim() != expected {
                return Err(CovError::ShapeMismatch { expected, found: partial.c2.dim() });
            }
        }
        Ok(Self { full, partials })
    }

    pub fn n_bins(&self) -> usize {
        self.full.n_bins()
    }

    pub fn n_samples(&self) -> usize {
        self.partials.len()
    }
}
