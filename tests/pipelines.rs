//! Integration tests for the single-field and mixed-jackknife pipelines.
//!
//! Purpose
//! -------
//! - Run both pipelines end to end over synthetic upstream files written to
//!   temporary directories, through the same file-naming conventions the
//!   binary uses.
//! - Check the numerical scenarios that only make sense on a full run:
//!   the bin-mask pattern, identical subsamples, and recovery of a known
//!   shot-noise rescaling.
//!
//! Coverage
//! --------
//! - `pipeline::legendre`: masking, rescaling, archive contents, early abort
//!   on missing inputs.
//! - `pipeline::mix_jackknife`: data covariance with a discarded region, the
//!   alpha fit, and the ten-entry archive.
//! - `output::archive`: values read back equal the in-memory outcome exactly.
//!
//! Exclusions
//! ----------
//! - Low-level parsing, masking, and estimator edge cases; those are covered
//!   by unit tests next to the code.
//! - The command-line front end.
mod common;

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use ndarray::Array2;
use rescaled_cov::{
    covariance::{CovError, FileMatrixSource, MatrixSet, SampleIndex, ensure_positive_definite},
    jackknife::{JackknifeInputs, build_jackknife_covariance},
    optimization::shot_noise::ShotNoiseOptions,
    output::{ResultArchive, keys},
    pipeline::{
        LegendreConfig, MixJackknifeConfig, PipelineError, run_legendre_from_files,
        run_mix_jackknife_from_files,
    },
    report::RecordingReporter,
};

use common::{dominant, skewed, with_index_column, write_matrix, write_rows, write_triple, xi_estimates};

fn assert_matrix_close(a: &Array2<f64>, b: &Array2<f64>, tol: f64) {
    assert_eq!(a.dim(), b.dim());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_relative_eq!(*x, *y, epsilon = tol, max_relative = tol);
    }
}

// ---- Single-field -----------------------------------------------------------

/// Write a full triple and `n_samples` partials for the all-sample set.
///
/// Partial `k` scales `c2` by `1 + 0.07k` and `c4` by `1 + 0.11k`; when
/// `identical` is set every partial equals the full triple instead.
fn write_all_sample_set(source: &FileMatrixSource, dim: usize, n_samples: usize, identical: bool) {
    let (c2, c3, c4) = (dominant(dim, 1.0), skewed(dim, 1.0), dominant(dim, 2.0));
    write_triple(source, MatrixSet::AllSamples, SampleIndex::Full, &c2, &c3, &c4);
    for k in 0..n_samples {
        let (s2, s4) =
            if identical { (1.0, 1.0) } else { (1.0 + 0.07 * k as f64, 1.0 + 0.11 * k as f64) };
        let index = SampleIndex::Subsample(k);
        write_triple(source, MatrixSet::AllSamples, index, &(&c2 * s2), &c3, &(&c4 * s4));
    }
}

#[test]
// Purpose
// -------
// The single-field run keeps exactly the radial-major bins the mask selects,
// rescales with the configured alpha, and writes the six-entry archive.
//
// Given
// -----
// - 3 radial bins × 3 multipoles (dim 9), skip_r_bins = 1, skip_l = 1.
// - Surviving upstream bins: r ∈ {1, 2}, ℓ-index ∈ {0, 1} → {3, 4, 6, 7}.
// - alpha = 0.8, six perturbed subsamples.
//
// Expect
// ------
// - full_theory_covariance[i, j] = c4 + alpha·sym(c3) + alpha²·c2 at the
//   surviving bins.
// - Archive values equal the returned outcome exactly.
fn legendre_run_masks_rescales_and_archives() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let cov_dir = dir.path().join("cov");
    let out_dir = dir.path().join("out");
    let source = FileMatrixSource::new(&cov_dir, 3, 4);
    write_all_sample_set(&source, 9, 6, false);
    let config = LegendreConfig::new(&cov_dir, 3, 4, 6, &out_dir, 0.8, 1, 1).unwrap();
    let reporter = RecordingReporter::new();

    // Act
    let outcome = run_legendre_from_files(&config, &reporter).unwrap();

    // Assert
    let (c2, c3, c4) = (dominant(9, 1.0), skewed(9, 1.0), dominant(9, 2.0));
    let kept = [3usize, 4, 6, 7];
    let alpha = 0.8;
    let expected = Array2::from_shape_fn((4, 4), |(i, j)| {
        let (a, b) = (kept[i], kept[j]);
        c4[[a, b]] + alpha * 0.5 * (c3[[a, b]] + c3[[b, a]]) + alpha * alpha * c2[[a, b]]
    });
    assert_matrix_close(&outcome.estimate.covariance, &expected, 1e-12);
    assert!(outcome.convergence.converged());

    assert_eq!(
        outcome.output_path,
        out_dir.join("Rescaled_Covariance_Matrices_Legendre_n3_l4.npz")
    );
    let archive = ResultArchive::read(&outcome.output_path).unwrap();
    assert_eq!(
        archive.names(),
        vec![
            keys::FULL_THEORY_COVARIANCE,
            keys::SHOT_NOISE_RESCALING,
            keys::FULL_THEORY_PRECISION,
            keys::N_EFF,
            keys::FULL_THEORY_D_MATRIX,
            keys::INDIVIDUAL_THEORY_COVARIANCES,
        ]
    );
    assert_eq!(archive.matrix(keys::FULL_THEORY_COVARIANCE), Some(&outcome.estimate.covariance));
    assert_eq!(archive.matrix(keys::FULL_THEORY_PRECISION), Some(&outcome.estimate.precision));
    assert_eq!(archive.matrix(keys::FULL_THEORY_D_MATRIX), Some(&outcome.estimate.d_matrix));
    assert_eq!(
        archive.stack(keys::INDIVIDUAL_THEORY_COVARIANCES),
        Some(&outcome.estimate.partial_covariances)
    );
    assert_eq!(archive.scalar(keys::N_EFF), Some(outcome.effective_n.n_eff));
    assert_eq!(archive.scalar(keys::SHOT_NOISE_RESCALING), Some(0.8));
    assert!(reporter.contains("Saved output covariance matrices as"));
}

#[test]
// Purpose
// -------
// Identical subsamples carry no inversion bias: D vanishes and the
// precision matrix is the plain inverse of C.
//
// Given
// -----
// - 2 radial bins × 2 multipoles, eight partials equal to the full triple.
//
// Expect
// ------
// - |D| ≈ 0 and Ψ·C ≈ I.
fn identical_subsamples_give_plain_inverse() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let cov_dir = dir.path().join("cov");
    let source = FileMatrixSource::new(&cov_dir, 2, 2);
    write_all_sample_set(&source, 4, 8, true);
    let config = LegendreConfig::new(&cov_dir, 2, 2, 8, dir.path().join("out"), 1.0, 0, 0).unwrap();
    let reporter = RecordingReporter::new();

    // Act
    let outcome = run_legendre_from_files(&config, &reporter).unwrap();

    // Assert
    let est = &outcome.estimate;
    assert!(est.d_matrix.iter().all(|v| v.abs() < 1e-10));
    assert_matrix_close(&est.precision.dot(&est.covariance), &Array2::eye(4), 1e-10);
}

#[test]
// Purpose
// -------
// A missing subsample file aborts the run with the offending path and no
// archive is produced.
fn missing_subsample_aborts_without_archive() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let cov_dir = dir.path().join("cov");
    let out_dir = dir.path().join("out");
    let source = FileMatrixSource::new(&cov_dir, 2, 2);
    write_all_sample_set(&source, 4, 3, false);
    let config = LegendreConfig::new(&cov_dir, 2, 2, 4, &out_dir, 1.0, 0, 0).unwrap();

    // Act
    let err = run_legendre_from_files(&config, &RecordingReporter::new()).unwrap_err();

    // Assert
    match err {
        PipelineError::Covariance(CovError::Io { path, .. }) => {
            assert!(path.ends_with("CovMatricesAll/c2_n2_l2_11_3.txt"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!out_dir.join("Rescaled_Covariance_Matrices_Legendre_n2_l2.npz").exists());
}

// ---- Mixed jackknife --------------------------------------------------------

struct MixFixture {
    xi_file: PathBuf,
    weights_dir: PathBuf,
    cov_dir: PathBuf,
    data_cov: Array2<f64>,
}

const N_RADIAL: usize = 2;
const N_MU: usize = 2;
const MAX_L: usize = 2;
const N_REGIONS: usize = 9;
const N_SAMPLES: usize = 5;

/// Write the data-side inputs and both theory sets.
///
/// Region 4 carries a NaN and must be discarded. The jackknife theory set is
/// `c2 = c4 = data_cov / 2`, `c3 = 0`, with identical subsamples, so
/// `C(1) = data_cov` exactly.
fn write_mix_fixture(root: &Path) -> MixFixture {
    let xi_file = root.join("xi_jack.dat");
    let weights_dir = root.join("weights");
    let cov_dir = root.join("cov");
    let n_bins = N_RADIAL * N_MU;

    let mut xi = xi_estimates(N_REGIONS, n_bins);
    xi[[4, 1]] = f64::NAN;
    write_rows(&xi_file, "# s mu bins\n# region estimates\n", &xi);

    let weights = Array2::from_elem((N_REGIONS, n_bins), 1.0);
    write_matrix(
        &weights_dir.join(format!("jackknife_weights_n{N_RADIAL}_m{N_MU}_j{N_REGIONS}_11.dat")),
        &with_index_column(&weights),
    );
    let factors = Array2::from_shape_vec((N_MU, 2), vec![1.0, -0.5, 1.0, 1.0]).unwrap();
    write_matrix(
        &weights_dir.join(format!("mu_bin_legendre_factors_m{N_MU}_l{MAX_L}.txt")),
        &factors,
    );

    let reporter = RecordingReporter::new();
    let inputs = JackknifeInputs::load(&xi_file, &weights_dir, N_MU, MAX_L, &reporter).unwrap();
    let data_cov = build_jackknife_covariance(&inputs, 0, 0, &reporter).unwrap().matrix;
    ensure_positive_definite(&data_cov).expect("fixture data covariance must be full rank");

    let source = FileMatrixSource::new(&cov_dir, N_RADIAL, MAX_L);
    let dim = n_bins;
    let half = &data_cov * 0.5;
    let zero = Array2::<f64>::zeros((dim, dim));
    write_triple(&source, MatrixSet::Jackknife, SampleIndex::Full, &half, &zero, &half);
    for k in 0..N_SAMPLES {
        write_triple(&source, MatrixSet::Jackknife, SampleIndex::Subsample(k), &half, &zero, &half);
    }

    let (c2, c3, c4) = (dominant(dim, 0.1), skewed(dim, 0.1), dominant(dim, 1.0));
    write_triple(&source, MatrixSet::AllSamples, SampleIndex::Full, &c2, &c3, &c4);
    for k in 0..N_SAMPLES {
        let (s2, s4) = (1.0 + 0.05 * k as f64, 1.0 + 0.1 * k as f64);
        write_triple(
            &source,
            MatrixSet::AllSamples,
            SampleIndex::Subsample(k),
            &(&c2 * s2),
            &c3,
            &(&c4 * s4),
        );
    }

    MixFixture { xi_file, weights_dir, cov_dir, data_cov }
}

#[test]
// Purpose
// -------
// The mixed run discards the non-finite region, recovers alpha = 1 when the
// theory jackknife covariance equals the data covariance there, and writes
// all ten archive entries.
//
// Given
// -----
// - 9 regions (one with a NaN), 2 radial × 2 mu bins, max_l = 2.
// - Jackknife theory with C(alpha) = (1 + alpha²)/2 · data_cov.
//
// Expect
// ------
// - "Using 8 out of 9 jackknives"; fitted alpha within 0.02 of 1.
// - The archive's jackknife data covariance equals an independent build.
fn mix_jackknife_run_recovers_unit_rescaling() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let fx = write_mix_fixture(dir.path());
    let out_dir = dir.path().join("out");
    let config = MixJackknifeConfig::new(
        &fx.xi_file,
        &fx.weights_dir,
        &fx.cov_dir,
        N_MU,
        MAX_L,
        N_SAMPLES,
        &out_dir,
        0,
        0,
        ShotNoiseOptions::default(),
    )
    .unwrap();
    let reporter = RecordingReporter::new();

    // Act
    let outcome = run_mix_jackknife_from_files(&config, &reporter).unwrap();

    // Assert
    assert!(reporter.contains("Using 8 out of 9 jackknives"));
    assert!(reporter.contains("Optimization complete - optimal rescaling parameter is"));
    assert_eq!(outcome.data_covariance.n_regions_used, 8);
    assert!((outcome.fit.alpha - 1.0).abs() < 0.02, "alpha = {}", outcome.fit.alpha);
    assert!(outcome.fit.converged);
    assert!(outcome.jackknife_convergence.converged());
    assert_eq!(outcome.full_estimate.alpha, outcome.fit.alpha);

    assert_eq!(
        outcome.output_path,
        out_dir.join("Rescaled_Covariance_Matrices_Legendre_Jackknife_n2_l2_j9.npz")
    );
    let archive = ResultArchive::read(&outcome.output_path).unwrap();
    assert_eq!(archive.len(), 10);
    assert_eq!(archive.matrix(keys::JACKKNIFE_DATA_COVARIANCE), Some(&fx.data_cov));
    assert_eq!(
        archive.matrix(keys::JACKKNIFE_THEORY_COVARIANCE),
        Some(&outcome.jackknife_estimate.covariance)
    );
    assert_eq!(
        archive.matrix(keys::JACKKNIFE_THEORY_PRECISION),
        Some(&outcome.jackknife_estimate.precision)
    );
    assert_eq!(
        archive.stack(keys::INDIVIDUAL_THEORY_JACKKNIFE_COVARIANCES).map(|s| s.dim()),
        Some((N_SAMPLES, 4, 4))
    );
    assert_eq!(archive.scalar(keys::SHOT_NOISE_RESCALING), Some(outcome.fit.alpha));
    assert_eq!(archive.matrix(keys::FULL_THEORY_PRECISION), Some(&outcome.full_estimate.precision));
}

#[test]
fn mix_jackknife_rejects_odd_max_l() {
    let err = MixJackknifeConfig::new(
        "xi.dat", "weights", "cov", N_MU, 3, N_SAMPLES, "out", 0, 0,
        ShotNoiseOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err, PipelineError::OddMaxL { max_l: 3 });
}
