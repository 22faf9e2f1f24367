//! shot_noise::likelihood — the L1 likelihood between data and theory.
//!
//! For a trial rescaling `alpha`, with `Ψ(alpha)` the debiased jackknife
//! precision matrix,
//!
//! ```text
//! −log L1(alpha) = tr(Ψ(alpha) · C_data) − log det Ψ(alpha)
//! ```
//!
//! A `Ψ` whose determinant is not positive (an unusable inversion) is
//! penalized with `+∞` instead of failing, so the simplex simply moves away
//! from it. Singular inversions inside the estimator still abort.
use ndarray::Array2;

use crate::{
    covariance::types::SampleSet,
    optimization::errors::OptResult,
    precision::{debiased::debiased_precision, linalg::slogdet},
};

/// Negative log L1 likelihood of `data_cov` under the theory at `alpha`.
///
/// # Errors
/// - `OptError::Precision` if the debiased estimator fails.
pub fn neg_log_l1(samples: &SampleSet, data_cov: &Array2<f64>, alpha: f64) -> OptResult<f64> {
    let psi = debiased_precision(samples, alpha)?.precision;
    let (sign, log_abs) = slogdet(&psi)?;
    if sign <= 0.0 {
        return Ok(f64::INFINITY);
    }
    let trace: f64 = psi.dot(data_cov).diag().sum();
    Ok(trace - log_abs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covariance::types::CovTriple;
    use approx::assert_relative_eq;

    fn c2_only(n: usize, scale: f64) -> CovTriple {
        let z = Array2::<f64>::zeros((n, n));
        CovTriple::new(Array2::<f64>::eye(n) * scale, z.clone(), z).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // With identical subsamples Ψ = C⁻¹, so the likelihood reduces to the
    // Gaussian form and can be checked in closed form.
    //
    // Given
    // -----
    // - c2 = I (2 bins), c3 = c4 = 0, so C(alpha) = alpha²·I.
    // - data_cov = I.
    //
    // Expect
    // ------
    // - −log L1 = 2/alpha² + 2·ln(alpha²); minimized at alpha² = 1.
    fn identical_subsamples_give_gaussian_form() {
        // Arrange
        let full = c2_only(2, 1.0);
        let samples = SampleSet::new(full.clone(), vec![full; 4]).unwrap();
        let data = Array2::<f64>::eye(2);

        // Act
        let at_one = neg_log_l1(&samples, &data, 1.0).unwrap();
        let at_two = neg_log_l1(&samples, &data, 2.0).unwrap();

        // Assert
        assert_relative_eq!(at_one, 2.0, epsilon = 1e-12);
        assert_relative_eq!(at_two, 0.5 + 2.0 * 4.0_f64.ln(), epsilon = 1e-12);
        assert!(at_one < at_two);
    }

    #[test]
    // Purpose
    // -------
    // A negative-definite Ψ gives a non-positive determinant sign and is
    // penalized with +∞ rather than an error.
    //
    // Given
    // -----
    // - Identical subsamples with c4 = −I (1 bin), c2 = c3 = 0: C = −1, Ψ = −1.
    fn negative_determinant_is_penalized_with_infinity() {
        let t = CovTriple::new(
            Array2::zeros((1, 1)),
            Array2::zeros((1, 1)),
            -Array2::<f64>::eye(1),
        )
        .unwrap();
        let samples = SampleSet::new(t.clone(), vec![t.clone(), t]).unwrap();
        let value = neg_log_l1(&samples, &Array2::eye(1), 1.0).unwrap();
        assert_eq!(value, f64::INFINITY);
    }
}
