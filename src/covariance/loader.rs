//! covariance::loader — the `MatrixSource` seam and the masking loader.
//!
//! Purpose
//! -------
//! Separate *where* bias-decomposed matrices come from from *what* is done
//! with them. The computational core asks a [`MatrixSource`] for the raw
//! `(c2, c3, c4)` of a `(MatrixSet, SampleIndex)` pair; [`FileMatrixSource`]
//! is the adapter that knows the upstream naming convention, and
//! [`MatrixLoader`] applies the bin mask and symmetrization.
//!
//! Key behaviors
//! -------------
//! - [`FileMatrixSource`] resolves
//!   `{root}/CovMatrices{All,Jack}/c2_n{n}_l{max_l}_11_{idx}.txt`,
//!   `c3_n{n}_l{max_l}_1,11_{idx}.txt`, and `c4_n{n}_l{max_l}_11,11_{idx}.txt`.
//! - [`MatrixLoader::load`] checks the triple is square and consistent, checks
//!   the dimension is a multiple of the radial-bin count, builds (or reuses)
//!   the [`BinMask`], selects rows/columns, and returns `c2` as-is with `c3`,
//!   `c4` replaced by `0.5·(M + Mᵀ)`.
//! - [`MatrixLoader::load_sample_set`] loads the full triple and N partials
//!   sequentially, reporting progress.
//!
//! Invariants & assumptions
//! ------------------------
//! - One loader applies one geometry, so every triple it returns shares the
//!   same mask and bin ordering.
//! - Missing or malformed files abort the load; nothing is retried.
use std::path::{Path, PathBuf};

use ndarray::Array2;

use crate::{
    covariance::{
        errors::{CovError, CovResult},
        mask::BinMask,
        text::read_text_matrix,
        types::{CovTriple, MatrixSet, RawTriple, SampleIndex, SampleSet},
    },
    report::Reporter,
};

/// Capability that yields the raw matrix triple for a given set and sample.
pub trait MatrixSource {
    fn load_raw(&self, set: MatrixSet, index: SampleIndex) -> CovResult<RawTriple>;
}

/// File-system adapter implementing the upstream naming convention.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMatrixSource {
    root: PathBuf,
    n_radial: usize,
    max_l: usize,
}

impl FileMatrixSource {
    pub fn new(root: impl Into<PathBuf>, n_radial: usize, max_l: usize) -> Self {
        Self { root: root.into(), n_radial, max_l }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths of the `c2`, `c3`, `c4` files for `(set, index)`.
    pub fn paths(&self, set: MatrixSet, index: SampleIndex) -> [PathBuf; 3] {
        let dir = self.root.join(set.subdir());
        let (n, l) = (self.n_radial, self.max_l);
        [
            dir.join(format!("c2_n{n}_l{l}_11_{index}.txt")),
            dir.join(format!("c3_n{n}_l{l}_1,11_{index}.txt")),
            dir.join(format!("c4_n{n}_l{l}_11,11_{index}.txt")),
        ]
    }
}

impl MatrixSource for FileMatrixSource {
    fn load_raw(&self, set: MatrixSet, index: SampleIndex) -> CovResult<RawTriple> {
        let [p2, p3, p4] = self.paths(set, index);
        Ok(RawTriple {
            c2: read_text_matrix(&p2, 0)?,
            c3: read_text_matrix(&p3, 0)?,
            c4: read_text_matrix(&p4, 0)?,
        })
    }
}

/// BinGeometry — radial-bin count and skip counts applied at load time.
///
/// Fields
/// ------
/// - `n_radial`: number of radial bins in the upstream matrices.
/// - `skip_r_bins`: leading radial bins to drop.
/// - `skip_l`: trailing multipoles to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinGeometry {
    pub n_radial: usize,
    pub skip_r_bins: usize,
    pub skip_l: usize,
}

impl BinGeometry {
    /// # Errors
    /// - [`CovError::InvalidGeometry`] if `n_radial == 0` or
    ///   `skip_r_bins >= n_radial`.
    pub fn new(n_radial: usize, skip_r_bins: usize, skip_l: usize) -> CovResult<Self> {
        if n_radial == 0 {
            return Err(CovError::InvalidGeometry { reason: "n_radial must be positive" });
        }
        if skip_r_bins >= n_radial {
            return Err(CovError::InvalidGeometry {
                reason: "skip_r_bins must be smaller than the number of radial bins",
            });
        }
        Ok(Self { n_radial, skip_r_bins, skip_l })
    }

    /// Number of bins kept once the mask is applied, for `n_l` multipoles.
    pub fn n_bins(&self, n_l: usize) -> usize {
        (self.n_radial - self.skip_r_bins) * n_l.saturating_sub(self.skip_l)
    }
}

/// Loads masked, symmetrized triples from a [`MatrixSource`].
#[derive(Debug)]
pub struct MatrixLoader<'a, S: MatrixSource + ?Sized> {
    source: &'a S,
    geometry: BinGeometry,
    expected_n_l: Option<usize>,
    mask: Option<BinMask>,
}

impl<'a, S: MatrixSource + ?Sized> MatrixLoader<'a, S> {
    /// Loader that infers the multipole count from each matrix dimension.
    pub fn new(source: &'a S, geometry: BinGeometry) -> Self {
        Self { source, geometry, expected_n_l: None, mask: None }
    }

    /// Loader that additionally requires exactly `n_l` multipoles.
    pub fn with_multipoles(source: &'a S, geometry: BinGeometry, n_l: usize) -> Self {
        Self { source, geometry, expected_n_l: Some(n_l), mask: None }
    }

    pub fn geometry(&self) -> BinGeometry {
        self.geometry
    }

    /// Load one triple, masked and symmetrized.
    ///
    /// # Errors
    /// - Any [`CovError`] from the source (I/O, parse).
    /// - [`CovError::NotSquare`] / [`CovError::ShapeMismatch`] for bad triples.
    /// - [`CovError::BinCountMismatch`] if the dimension is not a multiple of
    ///   `n_radial`.
    /// - [`CovError::MultipoleCountMismatch`] if a multipole count was fixed and
    ///   the dimension implies another.
    /// - [`CovError::InvalidGeometry`] if `skip_l` removes every multipole.
    pub fn load(&mut self, set: MatrixSet, index: SampleIndex) -> CovResult<CovTriple> {
        let raw = self.source.load_raw(set, index)?;
        let dim = raw.dim()?;
        let n_radial = self.geometry.n_radial;
        if dim % n_radial != 0 {
            return Err(CovError::BinCountMismatch { dim, n_radial });
        }
        let n_l = dim / n_radial;
        if let Some(expected) = self.expected_n_l {
            if expected != n_l {
                return Err(CovError::MultipoleCountMismatch { expected, found: n_l });
            }
        }
        let mask = self.mask_for(n_l)?;
        let c2 = mask.apply(&raw.c2)?;
        let c3 = symmetrize(&mask.apply(&raw.c3)?);
        let c4 = symmetrize(&mask.apply(&raw.c4)?);
        CovTriple::new(c2, c3, c4)
    }

    /// Load the full triple and `n_samples` leave-one-out triples.
    ///
    /// # Errors
    /// - Any error from [`MatrixLoader::load`].
    /// - [`CovError::NoPartialSamples`] if `n_samples == 0`.
    pub fn load_sample_set(
        &mut self, set: MatrixSet, n_samples: usize, reporter: &dyn Reporter,
    ) -> CovResult<SampleSet> {
        let full = self.load(set, SampleIndex::Full)?;
        let partials = self.load_partials(set, n_samples, reporter)?;
        SampleSet::new(full, partials)
    }

    /// Load subsamples `0..n_samples` of `set`, in order.
    ///
    /// # Errors
    /// - Any error from [`MatrixLoader::load`].
    pub fn load_partials(
        &mut self, set: MatrixSet, n_samples: usize, reporter: &dyn Reporter,
    ) -> CovResult<Vec<CovTriple>> {
        let label = format!("Loading {set} subsamples");
        let mut partials = Vec::with_capacity(n_samples);
        for i in 0..n_samples {
            partials.push(self.load(set, SampleIndex::Subsample(i))?);
            reporter.progress(&label, i + 1, n_samples);
        }
        Ok(partials)
    }

    fn mask_for(&mut self, n_l: usize) -> CovResult<&BinMask> {
        let stale = self.mask.as_ref().map_or(true, |m| m.n_l() != n_l);
        if stale {
            let g = self.geometry;
            self.mask = Some(BinMask::new(g.n_radial, n_l, g.skip_r_bins, g.skip_l)?);
        }
        self.mask.as_ref().ok_or(CovError::InvalidGeometry { reason: "bin mask unavailable" })
    }
}

/// `0.5·(M + Mᵀ)`.
pub fn symmetrize(m: &Array2<f64>) -> Array2<f64> {
    (m + &m.t()) * 0.5
}
