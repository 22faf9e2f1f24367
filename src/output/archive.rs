//! output::archive — named-array result archive in NumPy `.npz` format.
//!
//! Purpose
//! -------
//! Collect every matrix, stack, and scalar a pipeline produces under its
//! output key and write them as one compressed `.npz` archive that NumPy
//! (`np.load`) reads directly.
//!
//! Key behaviors
//! -------------
//! - Entries keep insertion order; inserting an existing key replaces it in
//!   place.
//! - Scalars are stored as 0-d arrays, matrices as 2-d, per-subsample stacks
//!   as 3-d.
//! - [`ResultArchive::write`] encodes into a temporary file in the target
//!   directory and renames it over the destination only after the archive
//!   is complete. A failed write never leaves a partial archive behind.
//! - [`ResultArchive::read`] accepts member names with or without the
//!   `.npy` suffix.
//!
//! Conventions
//! -----------
//! - Key names are fixed by [`keys`]; file names by [`legendre_output_path`]
//!   and [`jackknife_output_path`].
use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use ndarray::{Array2, Array3, ArrayD, Ix0, Ix2, Ix3, arr0};
use ndarray_npy::{NpzReader, NpzWriter};
use tempfile::NamedTempFile;

use crate::output::errors::{OutputError, OutputResult};

/// Archive keys written by the pipelines.
pub mod keys {
    pub const FULL_THEORY_COVARIANCE: &str = "full_theory_covariance";
    pub const SHOT_NOISE_RESCALING: &str = "shot_noise_rescaling";
    pub const FULL_THEORY_PRECISION: &str = "full_theory_precision";
    pub const N_EFF: &str = "N_eff";
    pub const FULL_THEORY_D_MATRIX: &str = "full_theory_D_matrix";
    pub const INDIVIDUAL_THEORY_COVARIANCES: &str = "individual_theory_covariances";
    pub const JACKKNIFE_THEORY_COVARIANCE: &str = "jackknife_theory_covariance";
    pub const JACKKNIFE_DATA_COVARIANCE: &str = "jackknife_data_covariance";
    pub const JACKKNIFE_THEORY_PRECISION: &str = "jackknife_theory_precision";
    pub const INDIVIDUAL_THEORY_JACKKNIFE_COVARIANCES: &str =
        "individual_theory_jackknife_covariances";
}

/// `{out_dir}/Rescaled_Covariance_Matrices_Legendre_n{n}_l{max_l}.npz`
pub fn legendre_output_path(out_dir: &Path, n_radial: usize, max_l: usize) -> PathBuf {
    out_dir.join(format!("Rescaled_Covariance_Matrices_Legendre_n{n_radial}_l{max_l}.npz"))
}

/// `{out_dir}/Rescaled_Covariance_Matrices_Legendre_Jackknife_n{n}_l{max_l}_j{n_jack}.npz`
pub fn jackknife_output_path(
    out_dir: &Path, n_radial: usize, max_l: usize, n_jack: usize,
) -> PathBuf {
    out_dir.join(format!(
        "Rescaled_Covariance_Matrices_Legendre_Jackknife_n{n_radial}_l{max_l}_j{n_jack}.npz"
    ))
}

/// One stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveEntry {
    Scalar(f64),
    Matrix(Array2<f64>),
    Stack(Array3<f64>),
}

/// Ordered collection of named arrays and scalars.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultArchive {
    entries: Vec<(String, ArchiveEntry)>,
}

impl ResultArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entry` under `name`, replacing an existing entry in place.
    pub fn insert(&mut self, name: impl Into<String>, entry: ArchiveEntry) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = entry,
            None => self.entries.push((name, entry)),
        }
    }

    pub fn insert_scalar(&mut self, name: impl Into<String>, value: f64) {
        self.insert(name, ArchiveEntry::Scalar(value));
    }

    pub fn insert_matrix(&mut self, name: impl Into<String>, value: Array2<f64>) {
        self.insert(name, ArchiveEntry::Matrix(value));
    }

    pub fn insert_stack(&mut self, name: impl Into<String>, value: Array3<f64>) {
        self.insert(name, ArchiveEntry::Stack(value));
    }

    pub fn get(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(ArchiveEntry::Scalar(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn matrix(&self, name: &str) -> Option<&Array2<f64>> {
        match self.get(name) {
            Some(ArchiveEntry::Matrix(m)) => Some(m),
            _ => None,
        }
    }

    pub fn stack(&self, name: &str) -> Option<&Array3<f64>> {
        match self.get(name) {
            Some(ArchiveEntry::Stack(s)) => Some(s),
            _ => None,
        }
    }

    /// Entry names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write a compressed `.npz` archive to `path`.
    ///
    /// # Errors
    /// - [`OutputError::Io`] if the temporary file cannot be created or moved
    ///   into place.
    /// - [`OutputError::Write`] if encoding an entry fails.
    pub fn write(&self, path: &Path) -> OutputResult<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir).map_err(|e| OutputError::io(dir, e))?;
        let write_err = |e: &dyn std::fmt::Display| OutputError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut npz = NpzWriter::new_compressed(BufWriter::new(tmp));
        for (name, entry) in &self.entries {
            let added = match entry {
                ArchiveEntry::Scalar(v) => npz.add_array(name.as_str(), &arr0(*v)),
                ArchiveEntry::Matrix(m) => npz.add_array(name.as_str(), m),
                ArchiveEntry::Stack(s) => npz.add_array(name.as_str(), s),
            };
            added.map_err(|e| write_err(&e))?;
        }
        let tmp = npz
            .finish()
            .map_err(|e| write_err(&e))?
            .into_inner()
            .map_err(|e| write_err(e.error()))?;
        tmp.persist(path).map_err(|e| OutputError::io(path, e))?;
        Ok(())
    }

    /// Read an archive written by [`ResultArchive::write`] (or by NumPy).
    ///
    /// # Errors
    /// - [`OutputError::Io`] if the file cannot be opened.
    /// - [`OutputError::Read`] if it is not a readable `.npz` of `f64` arrays.
    /// - [`OutputError::UnsupportedDimension`] for 1-d or >3-d members.
    pub fn read(path: &Path) -> OutputResult<Self> {
        let file = File::open(path).map_err(|e| OutputError::io(path, e))?;
        let read_err = |e: &dyn std::fmt::Display| OutputError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        let mut npz = NpzReader::new(file).map_err(|e| read_err(&e))?;
        let stored = npz.names().map_err(|e| read_err(&e))?;

        let mut archive = Self::new();
        for member in stored {
            let array: ArrayD<f64> = npz.by_name(&member).map_err(|e| read_err(&e))?;
            let name = member.strip_suffix(".npy").unwrap_or(&member).to_string();
            let entry = match array.ndim() {
                0 => ArchiveEntry::Scalar(
                    array.into_dimensionality::<Ix0>().map_err(|e| read_err(&e))?.into_scalar(),
                ),
                2 => ArchiveEntry::Matrix(
                    array.into_dimensionality::<Ix2>().map_err(|e| read_err(&e))?,
                ),
                3 => ArchiveEntry::Stack(
                    array.into_dimensionality::<Ix3>().map_err(|e| read_err(&e))?,
                ),
                ndim => return Err(OutputError::UnsupportedDimension { name, ndim }),
            };
            archive.insert(name, entry);
        }
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Ordering and replacement semantics of the in-memory archive.
    // - A bit-exact write/read cycle through a real `.npz` file.
    // - Output file naming.
    // -------------------------------------------------------------------------

    #[test]
    fn insert_keeps_order_and_replaces_in_place() {
        let mut a = ResultArchive::new();
        a.insert_scalar("b", 1.0);
        a.insert_matrix("a", Array2::eye(2));
        a.insert_scalar("b", 2.0);
        assert_eq!(a.names(), vec!["b", "a"]);
        assert_eq!(a.scalar("b"), Some(2.0));
        assert!(a.matrix("b").is_none());
        assert_eq!(a.len(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Values written to disk come back bit-identical, with scalars as 0-d
    // arrays and stacks as 3-d arrays.
    //
    // Given
    // -----
    // - A scalar with a non-terminating binary expansion, a matrix with
    //   negative zero and tiny values, and a 2×2×2 stack.
    fn write_then_read_is_bit_exact() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.npz");
        let mut a = ResultArchive::new();
        a.insert_scalar(keys::N_EFF, 0.1 + 0.2);
        a.insert_matrix(keys::FULL_THEORY_COVARIANCE, array![[1e-300, -0.0], [3.5, -7.25]]);
        a.insert_stack(
            keys::INDIVIDUAL_THEORY_COVARIANCES,
            Array3::from_shape_fn((2, 2, 2), |(k, i, j)| (k * 4 + i * 2 + j) as f64 / 3.0),
        );

        // Act
        a.write(&path).unwrap();
        let back = ResultArchive::read(&path).unwrap();

        // Assert
        assert_eq!(back.names(), a.names());
        assert_eq!(back.scalar(keys::N_EFF).unwrap().to_bits(), (0.1_f64 + 0.2).to_bits());
        let m = back.matrix(keys::FULL_THEORY_COVARIANCE).unwrap();
        let orig = a.matrix(keys::FULL_THEORY_COVARIANCE).unwrap();
        assert!(m.iter().zip(orig.iter()).all(|(x, y)| x.to_bits() == y.to_bits()));
        assert_eq!(
            back.stack(keys::INDIVIDUAL_THEORY_COVARIANCES),
            a.stack(keys::INDIVIDUAL_THEORY_COVARIANCES)
        );
    }

    #[test]
    fn failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_subdir").join("result.npz");
        let mut a = ResultArchive::new();
        a.insert_scalar(keys::N_EFF, 1.0);
        assert!(matches!(a.write(&path), Err(OutputError::Io { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn output_names_follow_convention() {
        let out = Path::new("/out");
        assert_eq!(
            legendre_output_path(out, 10, 4),
            PathBuf::from("/out/Rescaled_Covariance_Matrices_Legendre_n10_l4.npz")
        );
        assert_eq!(
            jackknife_output_path(out, 10, 4, 50),
            PathBuf::from("/out/Rescaled_Covariance_Matrices_Legendre_Jackknife_n10_l4_j50.npz")
        );
    }
}
