//! Unified error handling for the post-processing pipelines.
//!
//! `PipelineError` is the single error surface of `run_legendre` and
//! `run_mix_jackknife`: configuration mistakes plus every stage error,
//! wrapped unchanged so callers can still match on the cause. An alias
//! `PipelineResult<T>` standardizes the return type.
use std::path::PathBuf;

use crate::{
    covariance::errors::CovError, jackknife::errors::JackknifeError,
    optimization::errors::OptError, output::errors::OutputError,
    precision::errors::PrecisionError,
};

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    // ---- Configuration ----
    /// A configuration value is out of range.
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    /// The mixed variant only supports even multipoles.
    OddMaxL {
        max_l: usize,
    },

    /// The output directory could not be created.
    OutputDir {
        path: PathBuf,
        message: String,
    },

    // ---- Stages ----
    Covariance(CovError),
    Jackknife(JackknifeError),
    Precision(PrecisionError),
    Optimization(OptError),
    Output(OutputError),
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Covariance(e) => Some(e),
            PipelineError::Jackknife(e) => Some(e),
            PipelineError::Precision(e) => Some(e),
            PipelineError::Optimization(e) => Some(e),
            PipelineError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            PipelineError::InvalidConfig { field, reason } => {
                write!(f, "Invalid configuration for '{field}': {reason}")
            }
            PipelineError::OddMaxL { max_l } => {
                write!(f, "Only even multipoles supported (max_l = {max_l})")
            }
            PipelineError::OutputDir { path, message } => {
                write!(f, "Cannot create output directory {}: {message}", path.display())
            }

            // ---- Stages ----
            PipelineError::Covariance(e) => write!(f, "{e}"),
            PipelineError::Jackknife(e) => write!(f, "{e}"),
            PipelineError::Precision(e) => write!(f, "{e}"),
            PipelineError::Optimization(e) => write!(f, "{e}"),
            PipelineError::Output(e) => write!(f, "{e}"),
        }
    }
}

impl From<CovError> for PipelineError {
    fn from(err: CovError) -> Self {
        PipelineError::Covariance(err)
    }
}

impl From<JackknifeError> for PipelineError {
    fn from(err: JackknifeError) -> Self {
        PipelineError::Jackknife(err)
    }
}

impl From<PrecisionError> for PipelineError {
    fn from(err: PrecisionError) -> Self {
        PipelineError::Precision(err)
    }
}

impl From<OptError> for PipelineError {
    fn from(err: OptError) -> Self {
        PipelineError::Optimization(err)
    }
}

impl From<OutputError> for PipelineError {
    fn from(err: OutputError) -> Self {
        PipelineError::Output(err)
    }
}
