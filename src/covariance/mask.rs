//! covariance::mask — boolean bin selection for trailing multipoles and
//! leading radial bins.
//!
//! Bins are ordered radial-major, multipole-minor, so the mask is a
//! per-multipole truncation pattern `l < n_l − skip_l` tiled across the radial
//! bins, with the first `skip_r_bins · n_l` entries forced false.
use ndarray::{Array2, Axis};

use crate::covariance::errors::{CovError, CovResult};

/// BinMask — which rows/columns of a full `(n_radial · n_l)²` matrix survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinMask {
    keep: Vec<bool>,
    n_l: usize,
}

impl BinMask {
    /// Build the mask for `n_radial` radial bins and `n_l` multipoles.
    ///
    /// # Errors
    /// - [`CovError::InvalidGeometry`] when the skips remove every bin.
    pub fn new(n_radial: usize, n_l: usize, skip_r_bins: usize, skip_l: usize) -> CovResult<Self> {
        if skip_r_bins >= n_radial {
            return Err(CovError::InvalidGeometry {
                reason: "skip_r_bins must be smaller than the number of radial bins",
            });
        }
        if skip_l >= n_l {
            return Err(CovError::InvalidGeometry {
                reason: "skip_l must be smaller than the number of multipoles",
            });
        }
        let mut keep = vec![false; skip_r_bins * n_l];
        for _ in skip_r_bins..n_radial {
            keep.extend((0..n_l).map(|l| l < n_l - skip_l));
        }
        Ok(Self { keep, n_l })
    }

    pub fn len(&self) -> usize {
        self.keep.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keep.is_empty()
    }

    /// Multipole count the mask was built for.
    pub fn n_l(&self) -> usize {
        self.n_l
    }

    /// Number of selected bins.
    pub fn n_selected(&self) -> usize {
        self.keep.iter().filter(|&&k| k).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.keep
    }

    /// Indices of the selected bins, in order.
    pub fn indices(&self) -> Vec<usize> {
        self.keep.iter().enumerate().filter(|(_, &k)| k).map(|(i, _)| i).collect()
    }

    /// Select masked rows and columns of a square matrix.
    ///
    /// # Errors
    /// - [`CovError::MaskLengthMismatch`] if the matrix is not `len × len`.
    pub fn apply(&self, matrix: &Array2<f64>) -> CovResult<Array2<f64>> {
        if matrix.nrows() != self.len() || matrix.ncols() != self.len() {
            return Err(CovError::MaskLengthMismatch { mask_len: self.len(), dim: matrix.nrows() });
        }
        let idx = self.indices();
        Ok(matrix.select(Axis(0), &idx).select(Axis(1), &idx))
    }
}
