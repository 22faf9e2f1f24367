//! jackknife::inputs — readers for the data-side jackknife inputs.
//!
//! Purpose
//! -------
//! Locate and read the three data products the mixed-Legendre-jackknife
//! variant needs: per-region correlation-function estimates in (r, mu) bins,
//! per-region pair weights, and the mu-bin → Legendre projection factors.
//!
//! Key behaviors
//! -------------
//! - Estimates carry two header rows which are skipped.
//! - The weights file has a leading region-index column which is dropped.
//! - File names follow the upstream convention:
//!   `jackknife_weights_n{n}_m{m}_j{n_jack}_11.dat` and
//!   `mu_bin_legendre_factors_m{m}_l{max_l}.txt`, both in the weights
//!   directory.
//! - The radial-bin count `n` and the region count `n_jack` are derived from
//!   the estimate file, so they never have to be passed in.
use std::path::{Path, PathBuf};

use ndarray::{Array2, s};

use crate::{
    covariance::text::read_text_matrix,
    jackknife::errors::{JackknifeError, JackknifeResult},
    report::Reporter,
};

const XI_HEADER_ROWS: usize = 2;

/// Read per-region estimates (`regions × (n·m)`), skipping the header rows.
pub fn load_xi_jackknife(path: &Path) -> JackknifeResult<Array2<f64>> {
    Ok(read_text_matrix(path, XI_HEADER_ROWS)?)
}

pub fn jackknife_weights_path(dir: &Path, n_radial: usize, n_mu: usize, n_jack: usize) -> PathBuf {
    dir.join(format!("jackknife_weights_n{n_radial}_m{n_mu}_j{n_jack}_11.dat"))
}

/// Read per-region weights, dropping the leading index column.
///
/// # Errors
/// - [`JackknifeError::Read`] on I/O or parse failure.
/// - [`JackknifeError::WeightsTooNarrow`] if there is no column after the index.
pub fn load_jackknife_weights(path: &Path) -> JackknifeResult<Array2<f64>> {
    let raw = read_text_matrix(path, 0)?;
    if raw.ncols() < 2 {
        return Err(JackknifeError::WeightsTooNarrow { cols: raw.ncols() });
    }
    Ok(raw.slice(s![.., 1..]).to_owned())
}

pub fn legendre_factors_path(dir: &Path, n_mu: usize, max_l: usize) -> PathBuf {
    dir.join(format!("mu_bin_legendre_factors_m{n_mu}_l{max_l}.txt"))
}

/// Read the `m × n_l` mu-bin Legendre factors (rows: mu bins, columns: multipoles).
pub fn load_legendre_factors(path: &Path) -> JackknifeResult<Array2<f64>> {
    Ok(read_text_matrix(path, 0)?)
}

/// JackknifeInputs — data-side inputs of the jackknife covariance.
///
/// Fields
/// ------
/// - `xi`: `regions × (n·m)` correlation-function estimates, radial-major.
/// - `weights`: `regions × (n·m)` pair weights, same layout as `xi`.
/// - `legendre_factors`: `m × n_l` projection matrix.
/// - `n_mu`: number of mu bins `m`.
#[derive(Debug, Clone, PartialEq)]
pub struct JackknifeInputs {
    pub xi: Array2<f64>,
    pub weights: Array2<f64>,
    pub legendre_factors: Array2<f64>,
    pub n_mu: usize,
}

impl JackknifeInputs {
    /// Read all three inputs from disk.
    ///
    /// # Errors
    /// - [`JackknifeError::BinsNotDivisible`] if the estimate columns are not a
    ///   multiple of `n_mu`.
    /// - Any reader error from this module.
    pub fn load(
        xi_file: &Path, weights_dir: &Path, n_mu: usize, max_l: usize, reporter: &dyn Reporter,
    ) -> JackknifeResult<Self> {
        reporter.info(&format!(
            "Loading correlation function jackknife estimates from {}",
            xi_file.display()
        ));
        let xi = load_xi_jackknife(xi_file)?;
        let n_radial = radial_bins(xi.ncols(), n_mu)?;

        let weights_file = jackknife_weights_path(weights_dir, n_radial, n_mu, xi.nrows());
        reporter.info(&format!("Loading jackknife weights from {}", weights_file.display()));
        let weights = load_jackknife_weights(&weights_file)?;

        let factors_file = legendre_factors_path(weights_dir, n_mu, max_l);
        reporter.info(&format!("Loading mu bin Legendre factors from {}", factors_file.display()));
        let legendre_factors = load_legendre_factors(&factors_file)?;

        Ok(Self { xi, weights, legendre_factors, n_mu })
    }

    /// Total number of jackknife regions, good or not.
    pub fn n_regions(&self) -> usize {
        self.xi.nrows()
    }

    /// Number of radial bins `n = (n·m) / m`.
    ///
    /// # Errors
    /// - [`JackknifeError::BinsNotDivisible`] if the columns are not a multiple of `n_mu`.
    pub fn n_radial(&self) -> JackknifeResult<usize> {
        radial_bins(self.xi.ncols(), self.n_mu)
    }
}

fn radial_bins(n_bins: usize, n_mu: usize) -> JackknifeResult<usize> {
    if n_mu == 0 || n_bins % n_mu != 0 {
        return Err(JackknifeError::BinsNotDivisible { n_bins, n_mu });
    }
    Ok(n_bins / n_mu)
}
