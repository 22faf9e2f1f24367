//! pipeline::legendre — single-field Legendre post-processing.
//!
//! Purpose
//! -------
//! Rescale the all-sample covariance by a fixed shot-noise parameter,
//! debias its precision matrix, estimate the effective number of samples,
//! and save the result archive.
//!
//! Key behaviors
//! -------------
//! - The order is: output directory, full triple, convergence test (advisory),
//!   positive-definiteness of `C(alpha)` (fatal), partials, precision,
//!   effective N, archive.
//! - Nothing expensive runs before the positive-definiteness check passes.
//!
//! Downstream usage
//! ----------------
//! - The `legendre` subcommand calls [`run_legendre_from_files`].
//! - Tests call [`run_legendre`] with an in-memory [`MatrixSource`].
use std::path::PathBuf;

use crate::{
    covariance::{
        loader::{FileMatrixSource, MatrixLoader, MatrixSource},
        types::{MatrixSet, SampleIndex},
        validation::ConvergenceReport,
    },
    output::archive::legendre_output_path,
    pipeline::{
        config::LegendreConfig,
        errors::PipelineResult,
        stages::{
            check_convergence, check_positive_definite, ensure_output_dir,
            estimate_full_precision, full_sample_archive, save_archive,
        },
    },
    precision::{debiased::PrecisionEstimate, effective_n::EffectiveN},
    report::Reporter,
};

/// LegendreOutcome — everything a single-field run produced.
///
/// Fields
/// ------
/// - `estimate`: precision estimate at the configured `alpha`.
/// - `effective_n`: effective number of samples.
/// - `convergence`: eigenvalue test on the full triple.
/// - `output_path`: archive location.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendreOutcome {
    pub estimate: PrecisionEstimate,
    pub effective_n: EffectiveN,
    pub convergence: ConvergenceReport,
    pub output_path: PathBuf,
}

/// Run the single-field pipeline over `source`.
///
/// # Errors
/// - `PipelineError::OutputDir` if the output directory cannot be created.
/// - `PipelineError::Covariance` for load failures or a covariance that is
///   not positive definite.
/// - `PipelineError::Precision` if an inversion is singular.
/// - `PipelineError::Output` if the archive cannot be written.
pub fn run_legendre<S: MatrixSource + ?Sized>(
    config: &LegendreConfig, source: &S, reporter: &dyn Reporter,
) -> PipelineResult<LegendreOutcome> {
    ensure_output_dir(&config.out_dir)?;
    let mut loader = MatrixLoader::new(source, config.geometry()?);

    reporter.info("Loading best estimate of covariance matrix");
    let full = loader.load(MatrixSet::AllSamples, SampleIndex::Full)?;
    let convergence = check_convergence(&full, "", reporter)?;
    check_positive_definite(&full, config.alpha)?;

    let partials = loader.load_partials(MatrixSet::AllSamples, config.n_samples, reporter)?;
    let (estimate, effective_n) =
        estimate_full_precision(&full, &partials, config.alpha, reporter)?;

    let output_path = legendre_output_path(&config.out_dir, config.n_radial, config.max_l);
    save_archive(&full_sample_archive(&estimate, &effective_n), &output_path, reporter)?;

    Ok(LegendreOutcome { estimate, effective_n, convergence, output_path })
}

/// Run the single-field pipeline over the upstream files under `config.cov_dir`.
///
/// # Errors
/// See [`run_legendre`].
pub fn run_legendre_from_files(
    config: &LegendreConfig, reporter: &dyn Reporter,
) -> PipelineResult<LegendreOutcome> {
    let source = FileMatrixSource::new(&config.cov_dir, config.n_radial, config.max_l);
    run_legendre(config, &source, reporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        covariance::{
            errors::{CovError, CovResult},
            types::RawTriple,
        },
        output::archive::{ResultArchive, keys},
        pipeline::errors::PipelineError,
        report::RecordingReporter,
    };
    use ndarray::Array2;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - A complete run over an in-memory source, including the archive.
    // - Early abort on a non-positive-definite covariance.
    //
    // They intentionally DO NOT cover:
    // - File naming of the upstream matrices; see `covariance::loader`.
    // -------------------------------------------------------------------------

    /// Every sample is `c2 = s·I, c3 = 0, c4 = s·I` with `s` depending on the index.
    struct ScaledIdentity {
        dim: usize,
        full_scale: f64,
    }

    impl MatrixSource for ScaledIdentity {
        fn load_raw(&self, _set: MatrixSet, index: SampleIndex) -> CovResult<RawTriple> {
            let s = match index {
                SampleIndex::Full => self.full_scale,
                SampleIndex::Subsample(i) => 1.0 + 0.1 * i as f64,
            };
            let eye = Array2::<f64>::eye(self.dim) * s;
            Ok(RawTriple { c2: eye.clone(), c3: Array2::zeros((self.dim, self.dim)), c4: eye })
        }
    }

    #[test]
    // Purpose
    // -------
    // A run writes an archive with the six single-field entries, masked to
    // the configured geometry.
    //
    // Given
    // -----
    // - n_radial = 2, dim 6 (3 multipoles), skip_l = 1: 4 bins kept.
    // - 5 subsamples, alpha = 0.5.
    fn run_writes_archive_with_masked_matrices() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let config = LegendreConfig::new(dir.path(), 2, 4, 5, dir.path().join("out"), 0.5, 0, 1)
            .unwrap();
        let source = ScaledIdentity { dim: 6, full_scale: 1.2 };
        let reporter = RecordingReporter::new();

        // Act
        let outcome = run_legendre(&config, &source, &reporter).unwrap();

        // Assert
        assert!(outcome.convergence.converged());
        assert_eq!(outcome.estimate.covariance.dim(), (4, 4));
        assert!(outcome.output_path.ends_with("Rescaled_Covariance_Matrices_Legendre_n2_l4.npz"));
        let archive = ResultArchive::read(&outcome.output_path).unwrap();
        assert_eq!(archive.len(), 6);
        assert_eq!(archive.scalar(keys::SHOT_NOISE_RESCALING), Some(0.5));
        assert_eq!(archive.stack(keys::INDIVIDUAL_THEORY_COVARIANCES).unwrap().dim(), (5, 4, 4));
        assert!(reporter.contains("Saved output covariance matrices as"));
    }

    #[test]
    // Purpose
    // -------
    // A non-positive-definite full covariance aborts before partials load.
    fn non_positive_definite_covariance_aborts_early() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let config = LegendreConfig::new(dir.path(), 2, 2, 3, &out, 1.0, 0, 0).unwrap();
        let source = ScaledIdentity { dim: 4, full_scale: -1.0 };
        let reporter = RecordingReporter::new();

        let err = run_legendre(&config, &source, &reporter).unwrap_err();

        assert!(matches!(err, PipelineError::Covariance(CovError::NotPositiveDefinite { .. })));
        assert!(!reporter.contains("subsamples"));
        assert!(!config.out_dir.join("Rescaled_Covariance_Matrices_Legendre_n2_l2.npz").exists());
    }
}
