//! pipeline::stages — steps shared by both pipelines.
//!
//! Each helper performs one stage of a run and reports about it through the
//! injected [`Reporter`]: output-directory creation, the advisory
//! convergence test, the fatal positive-definiteness test, the full-sample
//! precision estimate with its effective N, and assembly of the archive
//! entries both variants write.
use std::path::Path;

use crate::{
    covariance::{
        types::CovTriple,
        validation::{ConvergenceReport, convergence_check, ensure_positive_definite},
    },
    output::archive::{ResultArchive, keys},
    pipeline::errors::{PipelineError, PipelineResult},
    precision::{
        debiased::{PrecisionEstimate, debiased_precision_from},
        effective_n::{EffectiveN, effective_n},
    },
    report::Reporter,
};

/// Create `dir` and its parents if missing.
///
/// # Errors
/// - [`PipelineError::OutputDir`] if the directory cannot be created.
pub fn ensure_output_dir(dir: &Path) -> PipelineResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| PipelineError::OutputDir {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })
}

/// Run the eigenvalue convergence test on `triple` and warn on failure.
///
/// `prefix` is prepended to the warning (`""`, `"Jackknife "`, `"Full "`).
pub fn check_convergence(
    triple: &CovTriple, prefix: &str, reporter: &dyn Reporter,
) -> PipelineResult<ConvergenceReport> {
    let report = convergence_check(triple)?;
    if !report.converged() {
        reporter.warn(&format!(
            "{prefix}4-point covariance matrix has not converged properly via the eigenvalue \
             test. Min eigenvalue of C4 = {:.2e}, min eigenvalue of C2 = {:.2e}",
            report.min_eig_c4, report.min_eig_c2
        ));
    }
    Ok(report)
}

/// Fail unless `C(alpha)` of `triple` is positive definite.
///
/// # Errors
/// - [`PipelineError::Covariance`] wrapping `NotPositiveDefinite`.
pub fn check_positive_definite(triple: &CovTriple, alpha: f64) -> PipelineResult<()> {
    ensure_positive_definite(&triple.combine(alpha))?;
    Ok(())
}

/// Full-sample precision estimate and effective N at `alpha`.
///
/// A negative `det D` is reported as a warning and `N_eff` is clamped to
/// zero.
pub fn estimate_full_precision(
    full: &CovTriple, partials: &[CovTriple], alpha: f64, reporter: &dyn Reporter,
) -> PipelineResult<(PrecisionEstimate, EffectiveN)> {
    reporter.info("Computing the full precision matrix estimate:");
    let estimate = debiased_precision_from(full, partials, alpha)?;
    reporter.info("Full precision matrix estimate computed");

    let n_eff = effective_n(&estimate.d_matrix)?;
    if n_eff.degenerate {
        reporter.warn("N_eff is negative! Setting to zero");
    } else {
        reporter.info(&format!("Total N_eff Estimate: {:.4e}", n_eff.n_eff));
    }
    Ok((estimate, n_eff))
}

/// Archive holding the full-sample entries written by every variant.
pub fn full_sample_archive(estimate: &PrecisionEstimate, n_eff: &EffectiveN) -> ResultArchive {
    let mut archive = ResultArchive::new();
    archive.insert_matrix(keys::FULL_THEORY_COVARIANCE, estimate.covariance.clone());
    archive.insert_scalar(keys::SHOT_NOISE_RESCALING, estimate.alpha);
    archive.insert_matrix(keys::FULL_THEORY_PRECISION, estimate.precision.clone());
    archive.insert_scalar(keys::N_EFF, n_eff.n_eff);
    archive.insert_matrix(keys::FULL_THEORY_D_MATRIX, estimate.d_matrix.clone());
    archive.insert_stack(keys::INDIVIDUAL_THEORY_COVARIANCES, estimate.partial_covariances.clone());
    archive
}

/// Write `archive` to `path` and report where it went.
pub fn save_archive(
    archive: &ResultArchive, path: &Path, reporter: &dyn Reporter,
) -> PipelineResult<()> {
    archive.write(path)?;
    reporter.info(&format!("Saved output covariance matrices as {}", path.display()));
    Ok(())
}
