//! pipeline::mix_jackknife — mixed Legendre jackknife post-processing.
//!
//! Purpose
//! -------
//! Fit the shot-noise rescaling by matching the theory jackknife covariance
//! to the data jackknife covariance, then apply the fitted `alpha` to the
//! all-sample covariance as the single-field pipeline does.
//!
//! Key behaviors
//! -------------
//! - Jackknife stage: build the data covariance from the per-region
//!   estimates, load the jackknife full triple (convergence test with the
//!   `"Jackknife "` prefix) and partials, check the data and theory shapes
//!   agree, fit `alpha`, and evaluate the jackknife precision at the fit.
//! - The jackknife sample set is dropped before the all-sample partials are
//!   loaded, so at most one set of partials is in memory.
//! - Full stage: load the all-sample full triple (convergence test with the
//!   `"Full "` prefix, then positive definiteness at the fitted `alpha`),
//!   partials, precision, effective N.
//! - The archive holds the six single-field entries plus the four jackknife
//!   entries.
//!
//! Invariants & assumptions
//! ------------------------
//! - `config.max_l` is even; every loaded matrix must have exactly
//!   `max_l/2 + 1` multipoles.
//! - The radial-bin count comes from the estimate file through
//!   [`JackknifeInputs::n_radial`].
use std::path::PathBuf;

use crate::{
    covariance::{
        loader::{FileMatrixSource, MatrixLoader, MatrixSource},
        types::{MatrixSet, SampleIndex, SampleSet},
        validation::{ConvergenceReport, ensure_same_shape},
    },
    jackknife::{
        data_cov::{JackknifeCovariance, build_jackknife_covariance},
        inputs::JackknifeInputs,
    },
    optimization::shot_noise::{ShotNoiseFit, fit_shot_noise},
    output::archive::{jackknife_output_path, keys},
    pipeline::{
        config::MixJackknifeConfig,
        errors::PipelineResult,
        stages::{
            check_convergence, check_positive_definite, ensure_output_dir,
            estimate_full_precision, full_sample_archive, save_archive,
        },
    },
    precision::{
        debiased::{PrecisionEstimate, debiased_precision},
        effective_n::EffectiveN,
    },
    report::Reporter,
};

/// MixJackknifeOutcome — everything a mixed-jackknife run produced.
///
/// Fields
/// ------
/// - `fit`: shot-noise optimizer result.
/// - `data_covariance`: projected jackknife data covariance.
/// - `jackknife_estimate`: jackknife theory precision at `fit.alpha`.
/// - `full_estimate`: all-sample precision at `fit.alpha`.
/// - `effective_n`: effective N of the all-sample estimate.
/// - `jackknife_convergence`, `full_convergence`: eigenvalue tests.
/// - `output_path`: archive location.
#[derive(Debug, Clone, PartialEq)]
pub struct MixJackknifeOutcome {
    pub fit: ShotNoiseFit,
    pub data_covariance: JackknifeCovariance,
    pub jackknife_estimate: PrecisionEstimate,
    pub full_estimate: PrecisionEstimate,
    pub effective_n: EffectiveN,
    pub jackknife_convergence: ConvergenceReport,
    pub full_convergence: ConvergenceReport,
    pub output_path: PathBuf,
}

/// Run the mixed-jackknife pipeline over preloaded data inputs and `source`.
///
/// # Errors
/// - `PipelineError::Jackknife` if the data covariance cannot be built.
/// - `PipelineError::Covariance` for load failures, a data/theory shape
///   mismatch, or a full covariance that is not positive definite.
/// - `PipelineError::Optimization` if the alpha fit fails.
/// - `PipelineError::Precision` if an inversion is singular.
/// - `PipelineError::OutputDir` / `PipelineError::Output` for output failures.
pub fn run_mix_jackknife<S: MatrixSource + ?Sized>(
    config: &MixJackknifeConfig, source: &S, inputs: &JackknifeInputs, reporter: &dyn Reporter,
) -> PipelineResult<MixJackknifeOutcome> {
    ensure_output_dir(&config.out_dir)?;
    let data_covariance =
        build_jackknife_covariance(inputs, config.skip_r_bins, config.skip_l, reporter)?;
    let geometry = config.geometry(data_covariance.n_radial)?;
    let mut loader = MatrixLoader::with_multipoles(source, geometry, config.n_multipoles());

    // ---- Jackknife stage ----
    let (fit, jackknife_estimate, jackknife_convergence) = {
        reporter.info("Loading best estimate of jackknife covariance matrix");
        let jack_full = loader.load(MatrixSet::Jackknife, SampleIndex::Full)?;
        let convergence = check_convergence(&jack_full, "Jackknife ", reporter)?;
        ensure_same_shape(&jack_full.c2, &data_covariance.matrix)?;

        let partials = loader.load_partials(MatrixSet::Jackknife, config.n_samples, reporter)?;
        let samples = SampleSet::new(jack_full, partials)?;

        reporter.info("Optimizing for the shot-noise rescaling parameter");
        let fit = fit_shot_noise(&samples, &data_covariance.matrix, &config.shot_noise)?;
        reporter.info(&format!(
            "Optimization complete - optimal rescaling parameter is {:.6}",
            fit.alpha
        ));
        if !fit.converged {
            reporter.warn(&format!(
                "Shot-noise optimization did not converge after {} iterations ({})",
                fit.iterations, fit.status
            ));
        }

        reporter.info("Computing the jackknife precision matrix estimate");
        let estimate = debiased_precision(&samples, fit.alpha)?;
        (fit, estimate, convergence)
    };

    // ---- Full stage ----
    reporter.info("Loading best estimate of covariance matrix");
    let full = loader.load(MatrixSet::AllSamples, SampleIndex::Full)?;
    let full_convergence = check_convergence(&full, "Full ", reporter)?;
    check_positive_definite(&full, fit.alpha)?;

    let partials = loader.load_partials(MatrixSet::AllSamples, config.n_samples, reporter)?;
    let (full_estimate, effective_n) =
        estimate_full_precision(&full, &partials, fit.alpha, reporter)?;

    let mut archive = full_sample_archive(&full_estimate, &effective_n);
    archive.insert_matrix(keys::JACKKNIFE_THEORY_COVARIANCE, jackknife_estimate.covariance.clone());
    archive.insert_matrix(keys::JACKKNIFE_DATA_COVARIANCE, data_covariance.matrix.clone());
    archive.insert_matrix(keys::JACKKNIFE_THEORY_PRECISION, jackknife_estimate.precision.clone());
    archive.insert_stack(
        keys::INDIVIDUAL_THEORY_JACKKNIFE_COVARIANCES,
        jackknife_estimate.partial_covariances.clone(),
    );
    let output_path = jackknife_output_path(
        &config.out_dir,
        data_covariance.n_radial,
        config.max_l,
        data_covariance.n_regions_total,
    );
    save_archive(&archive, &output_path, reporter)?;

    Ok(MixJackknifeOutcome {
        fit,
        data_covariance,
        jackknife_estimate,
        full_estimate,
        effective_n,
        jackknife_convergence,
        full_convergence,
        output_path,
    })
}

/// Load the data inputs named by `config` and run over the upstream files
/// under `config.cov_dir`.
///
/// # Errors
/// - `PipelineError::Jackknife` if an input file cannot be read.
/// - Everything [`run_mix_jackknife`] returns.
pub fn run_mix_jackknife_from_files(
    config: &MixJackknifeConfig, reporter: &dyn Reporter,
) -> PipelineResult<MixJackknifeOutcome> {
    let inputs = JackknifeInputs::load(
        &config.xi_jackknife_file,
        &config.weights_dir,
        config.n_mu_bins,
        config.max_l,
        reporter,
    )?;
    let source = FileMatrixSource::new(&config.cov_dir, inputs.n_radial()?, config.max_l);
    run_mix_jackknife(config, &source, &inputs, reporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        covariance::{
            errors::{CovError, CovResult},
            types::RawTriple,
        },
        optimization::shot_noise::ShotNoiseOptions,
        pipeline::errors::PipelineError,
        report::RecordingReporter,
    };
    use ndarray::Array2;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The explicit data/theory shape check before any optimization.
    //
    // They intentionally DO NOT cover:
    // - A full successful run; see `tests/pipelines.rs`.
    // -------------------------------------------------------------------------

    struct Identity {
        dim: usize,
    }

    impl MatrixSource for Identity {
        fn load_raw(&self, _set: MatrixSet, _index: SampleIndex) -> CovResult<RawTriple> {
            let eye = Array2::<f64>::eye(self.dim);
            Ok(RawTriple { c2: eye.clone(), c3: Array2::zeros((self.dim, self.dim)), c4: eye })
        }
    }

    #[test]
    // Purpose
    // -------
    // A data covariance that does not line up with the theory bins fails
    // with both shapes before the optimizer runs.
    //
    // Given
    // -----
    // - Data: 3 radial × 2 mu bins projected onto 2 multipoles (6 bins).
    // - Theory: max_l = 4 (3 multipoles) over 3 radial bins (9 bins).
    fn data_theory_shape_mismatch_fails_before_fit() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut xi = Array2::<f64>::zeros((4, 6));
        for ((a, b), v) in xi.indexed_iter_mut() {
            *v = ((a + 1) * (b + 2)) as f64 * 0.01 + (a % 2) as f64 * 0.1;
        }
        let inputs = JackknifeInputs {
            xi,
            weights: Array2::from_elem((4, 6), 0.25),
            legendre_factors: Array2::from_shape_vec((2, 2), vec![1.0, 0.5, 1.0, -0.5]).unwrap(),
            n_mu: 2,
        };
        let config = MixJackknifeConfig::new(
            "xi", "w", dir.path(), 2, 4, 3, dir.path().join("out"), 0, 0,
            ShotNoiseOptions::default(),
        )
        .unwrap();
        let reporter = RecordingReporter::new();

        // Act
        let err = run_mix_jackknife(&config, &Identity { dim: 9 }, &inputs, &reporter).unwrap_err();

        // Assert
        assert_eq!(
            err,
            PipelineError::Covariance(CovError::ShapeMismatch { expected: (9, 9), found: (6, 6) })
        );
        assert!(!reporter.contains("Optimizing"));
    }
}
