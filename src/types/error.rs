//! Error types for rclone-rs

use std::path::PathBuf;
use thiserror::Error;

/// Error types for rclone operations
#[derive(Debug, Error)]
pub enum RcloneError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The rclone binary could not be found before spawning anything
    #[error("rclone binary not found: {binary}. Install it from https://rclone.org/")]
    BinaryNotFound { binary: PathBuf },

    /// rclone exited with a non-zero status
    #[error("{operation} failed with exit code {exit_code}:\n{output}")]
    ProcessFailure {
        operation: String,
        exit_code: i32,
        /// Captured diagnostic output (stderr first, then stdout)
        output: String,
    },

    /// The operation was cancelled by the caller
    #[error("operation cancelled")]
    Cancelled,

    /// rclone output could not be decoded into the expected shape
    #[error("unexpected rclone output: {0}")]
    Output(String),

    /// JSON output could not be decoded (lsjson, about, size)
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid session or operation configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A remote with this name is already configured
    #[error("a remote named '{0}' already exists")]
    RemoteExists(String),
}

impl RcloneError {
    /// Check if this error came from a caller-initiated cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RcloneError::Cancelled)
    }

    /// Check if this error is a non-zero exit of the rclone process
    pub fn is_process_failure(&self) -> bool {
        matches!(self, RcloneError::ProcessFailure { .. })
    }

    /// Check if this error was raised before any subprocess was spawned
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            RcloneError::BinaryNotFound { .. } | RcloneError::Config(_)
        )
    }

    /// Captured rclone output, when the error carries any
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            RcloneError::ProcessFailure { output, .. } => Some(output),
            _ => None,
        }
    }
}
