//! Unified error handling for writing and reading result archives.
//!
//! `OutputError` wraps the `ndarray-npy` archive errors and file-system
//! failures with the path involved. An alias `OutputResult<T>` standardizes
//! the return type across `output` code.
use std::path::PathBuf;

pub type OutputResult<T> = Result<T, OutputError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OutputError {
    // ---- File system ----
    /// Creating, writing, or renaming a file failed.
    Io {
        path: PathBuf,
        message: String,
    },

    // ---- Archive ----
    /// Encoding an array into the `.npz` archive failed.
    Write {
        path: PathBuf,
        message: String,
    },

    /// Decoding the `.npz` archive failed.
    Read {
        path: PathBuf,
        message: String,
    },

    /// Stored array has a dimensionality the archive does not use.
    UnsupportedDimension {
        name: String,
        ndim: usize,
    },
}

impl OutputError {
    pub(crate) fn io(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        OutputError::Io { path: path.to_path_buf(), message: err.to_string() }
    }
}

impl std::error::Error for OutputError {}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- File system ----
            OutputError::Io { path, message } => {
                write!(f, "Output Error: {}: {message}", path.display())
            }

            // ---- Archive ----
            OutputError::Write { path, message } => {
                write!(f, "Output Error: failed to write archive {}: {message}", path.display())
            }
            OutputError::Read { path, message } => {
                write!(f, "Output Error: failed to read archive {}: {message}", path.display())
            }
            OutputError::UnsupportedDimension { name, ndim } => {
                write!(f, "Output Error: entry '{name}' has unsupported dimension {ndim}")
            }
        }
    }
}
