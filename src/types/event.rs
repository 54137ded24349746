//! Progress events streamed while a transfer runs, and the terminal result

use std::time::Duration;

/// Progress of one file currently being transferred.
///
/// Fields that rclone did not report are `None`, never zero: a missing ETA
/// means "unknown", not "done".
#[derive(Debug, Clone, PartialEq)]
pub struct FileProgress {
    /// File name as printed by rclone
    pub name: String,
    /// Completion percentage (0-100)
    pub percentage: Option<u8>,
    /// Total size in bytes
    pub size: Option<u64>,
    /// Transfer rate in bytes per second
    pub rate: Option<f64>,
    /// Estimated time to completion
    pub eta: Option<Duration>,
}

/// Point-in-time snapshot of a running transfer.
///
/// One event corresponds to one stats block emitted by rclone. Per-file
/// entries keep rclone's output order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressEvent {
    /// Bytes transferred so far
    pub bytes_transferred: u64,
    /// Total bytes to transfer, when the destination can report it
    pub bytes_total: Option<u64>,
    /// Overall completion percentage (0-100)
    pub percentage: Option<u8>,
    /// Overall transfer rate in bytes per second
    pub rate: Option<f64>,
    /// Estimated time to completion
    pub eta: Option<Duration>,
    /// Per-file progress in output order
    pub files: Vec<FileProgress>,
}

/// Optional callback used to receive progress events
pub type ProgressSink = dyn Fn(&ProgressEvent) + Send + Sync;

/// Terminal result of one rclone invocation
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Process exit code; `None` if killed by a signal
    pub exit_code: Option<i32>,
    /// Full captured standard output, verbatim
    pub stdout: String,
    /// Full captured standard error, verbatim
    pub stderr: String,
    /// Whether the process was terminated by a cancellation request
    pub cancelled: bool,
}

impl ProcessResult {
    /// True when the process exited zero and was not cancelled
    pub fn success(&self) -> bool {
        !self.cancelled && self.exit_code == Some(0)
    }

    /// Diagnostic output for error reporting: stderr, then stdout if the
    /// stderr stream was empty.
    pub fn diagnostic_output(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}
