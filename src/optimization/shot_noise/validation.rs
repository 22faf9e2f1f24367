//! Validation helpers for the shot-noise fit.
//!
//! - **Option checks**: [`verify_alpha0`], [`verify_sd_tolerance`],
//!   [`verify_alpha_tolerance`], [`verify_max_iter`].
//! - **Input checks**: [`validate_data_shape`] rejects a data covariance that
//!   does not line up with the theory bins, before any solver work.
//! - **Outcome checks**: [`validate_alpha_hat`], [`validate_value`].
use ndarray::Array2;

use crate::optimization::{
    errors::{OptError, OptResult},
    shot_noise::types::Alpha,
};

pub fn verify_alpha0(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidAlpha0 { value, reason: "Initial alpha must be finite." });
    }
    Ok(())
}

pub fn verify_sd_tolerance(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidSdTolerance { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidSdTolerance { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

pub fn verify_alpha_tolerance(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidAlphaTolerance { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidAlphaTolerance { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

pub fn verify_max_iter(max_iter: usize) -> OptResult<()> {
    if max_iter == 0 {
        return Err(OptError::InvalidMaxIter {
            max_iter,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    Ok(())
}

/// `data_cov` must be `n_bins × n_bins`.
pub fn validate_data_shape(data_cov: &Array2<f64>, n_bins: usize) -> OptResult<()> {
    if data_cov.dim() != (n_bins, n_bins) {
        return Err(OptError::DataShapeMismatch {
            expected: (n_bins, n_bins),
            found: data_cov.dim(),
        });
    }
    Ok(())
}

pub fn validate_alpha_hat(alpha_hat: Option<Alpha>) -> OptResult<f64> {
    match alpha_hat.as_deref() {
        Some([value]) if value.is_finite() => Ok(*value),
        Some([value]) => Err(OptError::InvalidAlphaHat {
            value: *value,
            reason: "Fitted alpha must be finite.",
        }),
        _ => Err(OptError::MissingAlphaHat),
    }
}

/// A best cost of `+∞` means every evaluated alpha was penalized.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_checks_reject_non_finite_and_non_positive_values() {
        assert!(verify_alpha0(0.0).is_ok());
        assert!(matches!(verify_alpha0(f64::NAN), Err(OptError::InvalidAlpha0 { .. })));
        assert!(matches!(verify_sd_tolerance(0.0), Err(OptError::InvalidSdTolerance { .. })));
        assert!(matches!(
            verify_sd_tolerance(f64::INFINITY),
            Err(OptError::InvalidSdTolerance { .. })
        ));
        assert!(matches!(
            verify_alpha_tolerance(-1e-4),
            Err(OptError::InvalidAlphaTolerance { .. })
        ));
        assert!(matches!(verify_max_iter(0), Err(OptError::InvalidMaxIter { .. })));
    }

    #[test]
    fn alpha_hat_must_be_present_single_and_finite() {
        assert_eq!(validate_alpha_hat(Some(vec![1.2])).unwrap(), 1.2);
        assert_eq!(validate_alpha_hat(None).unwrap_err(), OptError::MissingAlphaHat);
        assert_eq!(validate_alpha_hat(Some(vec![])).unwrap_err(), OptError::MissingAlphaHat);
        assert!(matches!(
            validate_alpha_hat(Some(vec![f64::NAN])),
            Err(OptError::InvalidAlphaHat { .. })
        ));
    }

    #[test]
    fn data_shape_must_match_theory_bins() {
        assert!(validate_data_shape(&Array2::zeros((3, 3)), 3).is_ok());
        assert_eq!(
            validate_data_shape(&Array2::zeros((4, 4)), 3).unwrap_err(),
            OptError::DataShapeMismatch { expected: (3, 3), found: (4, 4) }
        );
    }
}
