use argmin::core::{ArgminError, Error};

use crate::precision::errors::PrecisionError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- ShotNoiseOptions ----
    /// Initial alpha needs to be finite.
    InvalidAlpha0 {
        value: f64,
        reason: &'static str,
    },
    /// Simplex standard-deviation tolerance needs to be positive and finite.
    InvalidSdTolerance {
        tol: f64,
        reason: &'static str,
    },
    /// Simplex alpha-width tolerance needs to be positive and finite.
    InvalidAlphaTolerance {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },

    // ---- Inputs ----
    /// Data covariance does not match the theory bins.
    DataShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    // ---- Cost function ----
    /// Cost function returned NaN, or no finite cost was ever found.
    NonFiniteCost {
        value: f64,
    },

    /// The precision estimator failed inside the likelihood.
    Precision(PrecisionError),

    // ---- Optimizer outcome ----
    /// Fitted alpha must be finite.
    InvalidAlphaHat {
        value: f64,
        reason: &'static str,
    },

    /// Fitted alpha is missing.
    MissingAlphaHat,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- ShotNoiseOptions ----
            OptError::InvalidAlpha0 { value, reason } => {
                write!(f, "Invalid initial alpha {value}: {reason}")
            }
            OptError::InvalidSdTolerance { tol, reason } => {
                write!(f, "Invalid simplex standard-deviation tolerance {tol}: {reason}")
            }
            OptError::InvalidAlphaTolerance { tol, reason } => {
                write!(f, "Invalid simplex alpha-width tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }

            // ---- Inputs ----
            OptError::DataShapeMismatch { expected, found } => {
                write!(
                    f,
                    "Data covariance shape {found:?} does not match theory covariance shape {expected:?}"
                )
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }
            OptError::Precision(err) => {
                write!(f, "Precision estimate failed during optimization: {err}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidAlphaHat { value, reason } => {
                write!(f, "Invalid fitted alpha {value}: {reason}")
            }
            OptError::MissingAlphaHat => {
                write!(f, "Missing fitted alpha")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<PrecisionError> for OptError {
    fn from(err: PrecisionError) -> Self {
        OptError::Precision(err)
    }
}
