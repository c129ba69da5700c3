//! Error handling for Voxport
//!
//! Errors fall into four kinds: usage mistakes, environment problems
//! (missing singer or resampler), data errors raised while rendering, and
//! plain I/O failures.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Voxport operations
pub type Result<T> = std::result::Result<T, VoxportError>;

/// Broad category of a [`VoxportError`], used by the CLI to pick a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad arguments or input file.
    Usage,
    /// The environment cannot render this project.
    Environment,
    /// Rendering produced inconsistent data.
    Data,
    /// Filesystem or serialization failure.
    Io,
}

/// Main error type for Voxport operations
#[derive(Error, Debug)]
pub enum VoxportError {
    // Usage Errors
    #[error("Project file not found: {path}")]
    ProjectNotFound { path: PathBuf },

    #[error("Unsupported project format: {path}")]
    UnsupportedFormat { path: PathBuf },

    // Environment Errors
    #[error("Singer not found: {singer}")]
    SingerNotFound { singer: String },

    #[error("Resampler not found: {resampler}")]
    ResamplerNotFound { resampler: String },

    // Data Errors
    #[error("Invalid project: {reason}")]
    InvalidProject { reason: String },

    #[error("Resampler {resampler} failed on {phoneme}: {reason}")]
    ResamplerFailed {
        resampler: String,
        phoneme: String,
        reason: String,
    },

    #[error("Resampler {resampler} did not produce output for {phoneme}: {path}")]
    MissingOutput {
        resampler: String,
        phoneme: String,
        path: PathBuf,
    },

    // File Errors
    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl VoxportError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            VoxportError::ProjectNotFound { .. } => "PROJECT_NOT_FOUND",
            VoxportError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            VoxportError::SingerNotFound { .. } => "SINGER_NOT_FOUND",
            VoxportError::ResamplerNotFound { .. } => "RESAMPLER_NOT_FOUND",
            VoxportError::InvalidProject { .. } => "INVALID_PROJECT",
            VoxportError::ResamplerFailed { .. } => "RESAMPLER_FAILED",
            VoxportError::MissingOutput { .. } => "MISSING_OUTPUT",
            VoxportError::FileReadError { .. } => "FILE_READ_ERROR",
            VoxportError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            VoxportError::DirectoryCreateError { .. } => "DIRECTORY_CREATE_ERROR",
            VoxportError::Io(_) => "IO_ERROR",
            VoxportError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Get the broad category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            VoxportError::ProjectNotFound { .. } | VoxportError::UnsupportedFormat { .. } => {
                ErrorKind::Usage
            }
            VoxportError::SingerNotFound { .. } | VoxportError::ResamplerNotFound { .. } => {
                ErrorKind::Environment
            }
            VoxportError::InvalidProject { .. }
            | VoxportError::ResamplerFailed { .. }
            | VoxportError::MissingOutput { .. } => ErrorKind::Data,
            VoxportError::FileReadError { .. }
            | VoxportError::FileWriteError { .. }
            | VoxportError::DirectoryCreateError { .. }
            | VoxportError::Io(_)
            | VoxportError::Serialization(_) => ErrorKind::Io,
        }
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            VoxportError::ProjectNotFound { .. } => Some("Check the file path and try again."),
            VoxportError::UnsupportedFormat { .. } => Some("Pass a .ustx project file."),
            VoxportError::SingerNotFound { .. } => {
                Some("Install the voicebank into the Singers directory.")
            }
            VoxportError::ResamplerNotFound { .. } => {
                Some("Install the resampler into the Resamplers directory or edit prefs.json.")
            }
            VoxportError::MissingOutput { .. } => {
                Some("Run the resampler by hand on the staged input to see its error output.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = VoxportError::SingerNotFound {
            singer: "Teto".to_string(),
        };
        assert_eq!(err.error_code(), "SINGER_NOT_FOUND");
        assert_eq!(err.to_string(), "Singer not found: Teto");
    }

    #[test]
    fn test_error_kinds() {
        let env = VoxportError::ResamplerNotFound {
            resampler: "moresampler".to_string(),
        };
        assert_eq!(env.kind(), ErrorKind::Environment);
        assert!(env.recovery_suggestion().is_some());

        let data = VoxportError::MissingOutput {
            resampler: "fake".to_string(),
            phoneme: "a".to_string(),
            path: PathBuf::from("/tmp/out.wav"),
        };
        assert_eq!(data.kind(), ErrorKind::Data);

        let io = VoxportError::from(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(io.kind(), ErrorKind::Io);
    }
}
