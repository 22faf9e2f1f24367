//! pipeline::config — validated run configurations.
//!
//! Purpose
//! -------
//! Hold every input of one pipeline run (paths, bin counts, skip counts,
//! rescaling or optimizer settings) and validate them once, up front, so the
//! stages can assume a consistent geometry.
//!
//! Key behaviors
//! -------------
//! - [`LegendreConfig::new`] checks `alpha` is finite, at least two
//!   subsamples are requested, and the skips leave bins.
//! - [`MixJackknifeConfig::new`] additionally requires an even `max_l`,
//!   giving `n_l = max_l/2 + 1` multipoles.
//!
//! Conventions
//! -----------
//! - The radial-bin count of the mixed variant is not configured; it is
//!   derived from the jackknife estimate file.
use std::path::PathBuf;

use crate::{
    covariance::loader::BinGeometry,
    optimization::shot_noise::ShotNoiseOptions,
    pipeline::errors::{PipelineError, PipelineResult},
};

/// LegendreConfig — single-field Legendre post-processing inputs.
///
/// Fields
/// ------
/// - `cov_dir`: root containing `CovMatricesAll/`.
/// - `n_radial`: radial bins in the upstream matrices.
/// - `max_l`: maximum multipole (file naming only).
/// - `n_samples`: number of subsamples `N`.
/// - `out_dir`: directory receiving the archive; created if missing.
/// - `alpha`: fixed shot-noise rescaling.
/// - `skip_r_bins`, `skip_l`: leading radial bins / trailing multipoles to drop.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendreConfig {
    pub cov_dir: PathBuf,
    pub n_radial: usize,
    pub max_l: usize,
    pub n_samples: usize,
    pub out_dir: PathBuf,
    pub alpha: f64,
    pub skip_r_bins: usize,
    pub skip_l: usize,
}

impl LegendreConfig {
    /// # Errors
    /// - [`PipelineError::InvalidConfig`] for a non-finite `alpha` or
    ///   `n_samples < 2`.
    /// - [`PipelineError::Covariance`] if the radial geometry is invalid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cov_dir: impl Into<PathBuf>, n_radial: usize, max_l: usize, n_samples: usize,
        out_dir: impl Into<PathBuf>, alpha: f64, skip_r_bins: usize, skip_l: usize,
    ) -> PipelineResult<Self> {
        if !alpha.is_finite() {
            return Err(PipelineError::InvalidConfig {
                field: "alpha",
                reason: "Shot-noise rescaling must be finite.",
            });
        }
        verify_n_samples(n_samples)?;
        BinGeometry::new(n_radial, skip_r_bins, skip_l)?;
        Ok(Self {
            cov_dir: cov_dir.into(),
            n_radial,
            max_l,
            n_samples,
            out_dir: out_dir.into(),
            alpha,
            skip_r_bins,
            skip_l,
        })
    }

    pub fn geometry(&self) -> PipelineResult<BinGeometry> {
        Ok(BinGeometry::new(self.n_radial, self.skip_r_bins, self.skip_l)?)
    }
}

/// MixJackknifeConfig — mixed Legendre jackknife post-processing inputs.
///
/// Fields
/// ------
/// - `xi_jackknife_file`: per-region correlation-function estimates.
/// - `weights_dir`: directory with the jackknife weights and Legendre factors.
/// - `cov_dir`: root containing `CovMatricesAll/` and `CovMatricesJack/`.
/// - `n_mu_bins`: angular bins `m` of the estimates.
/// - `max_l`: maximum (even) multipole.
/// - `n_samples`: number of subsamples `N`.
/// - `out_dir`: directory receiving the archive.
/// - `skip_r_bins`, `skip_l`: leading radial bins / trailing multipoles to drop.
/// - `shot_noise`: optimizer settings for the alpha fit.
#[derive(Debug, Clone, PartialEq)]
pub struct MixJackknifeConfig {
    pub xi_jackknife_file: PathBuf,
    pub weights_dir: PathBuf,
    pub cov_dir: PathBuf,
    pub n_mu_bins: usize,
    pub max_l: usize,
    pub n_samples: usize,
    pub out_dir: PathBuf,
    pub skip_r_bins: usize,
    pub skip_l: usize,
    pub shot_noise: ShotNoiseOptions,
}

impl MixJackknifeConfig {
    /// # Errors
    /// - [`PipelineError::OddMaxL`] if `max_l` is odd.
    /// - [`PipelineError::InvalidConfig`] if `n_mu_bins == 0`, `n_samples < 2`,
    ///   or `skip_l` removes every multipole.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        xi_jackknife_file: impl Into<PathBuf>, weights_dir: impl Into<PathBuf>,
        cov_dir: impl Into<PathBuf>, n_mu_bins: usize, max_l: usize, n_samples: usize,
        out_dir: impl Into<PathBuf>, skip_r_bins: usize, skip_l: usize,
        shot_noise: ShotNoiseOptions,
    ) -> PipelineResult<Self> {
        if max_l % 2 != 0 {
            return Err(PipelineError::OddMaxL { max_l });
        }
        if n_mu_bins == 0 {
            return Err(PipelineError::InvalidConfig {
                field: "n_mu_bins",
                reason: "At least one mu bin is required.",
            });
        }
        verify_n_samples(n_samples)?;
        if skip_l >= max_l / 2 + 1 {
            return Err(PipelineError::InvalidConfig {
                field: "skip_l",
                reason: "Skipping every multipole leaves no bins.",
            });
        }
        Ok(Self {
            xi_jackknife_file: xi_jackknife_file.into(),
            weights_dir: weights_dir.into(),
            cov_dir: cov_dir.into(),
            n_mu_bins,
            max_l,
            n_samples,
            out_dir: out_dir.into(),
            skip_r_bins,
            skip_l,
            shot_noise,
        })
    }

    /// Number of even multipoles `0, 2, …, max_l`.
    pub fn n_multipoles(&self) -> usize {
        self.max_l / 2 + 1
    }

    /// Geometry for `n_radial` radial bins (derived from the estimate file).
    pub fn geometry(&self, n_radial: usize) -> PipelineResult<BinGeometry> {
        Ok(BinGeometry::new(n_radial, self.skip_r_bins, self.skip_l)?)
    }
}

fn verify_n_samples(n_samples: usize) -> PipelineResult<()> {
    if n_samples < 2 {
        return Err(PipelineError::InvalidConfig {
            field: "n_samples",
            reason: "At least two subsamples are required.",
        });
    }
    Ok(())
}
