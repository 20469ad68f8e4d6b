use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhototimeError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Filesystem errors
    #[error("Directory walker error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    // Metadata errors
    #[error("Failed to decode sidecar {path}: {reason}")]
    SidecarDecode { path: PathBuf, reason: String },

    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    #[error("Invalid UTC offset '{0}', expected +HH:MM or -HH:MM")]
    InvalidOffset(String),

    // Correction errors
    #[error("Failed to set timestamps on {path}: {source}")]
    Correction {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for phototime operations.
pub type Result<T> = std::result::Result<T, PhototimeError>;
