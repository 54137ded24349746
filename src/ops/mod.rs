//! rclone operations
//!
//! Every operation takes an explicit [`RcloneSession`](crate::session::RcloneSession)
//! and maps to exactly one subprocess invocation. Retries are the caller's
//! responsibility.

pub mod check;
pub mod hash;
pub mod query;
pub mod remote;
pub mod transfer;

pub use check::{check, CheckOptions};
pub use hash::{hashsum, hashsum_check, hashsum_to_file, HashOptions};
pub use query::{
    about, cat, delete, link, ls, mkdir, purge, size, tree, version, version_check, AboutInfo,
    CatOptions, LinkOptions, LsEntry, LsOptions, SizeInfo, VersionInfo,
};
pub use remote::{create_remote, list_remotes, remote_exists};
pub use transfer::{copy, copy_to, move_files, move_to, sync, transfer};

use crate::monitor;
use crate::session::RcloneSession;
use crate::types::{ProcessResult, RcloneError};

/// Run a non-streaming rclone command to completion and fail on any
/// non-zero exit.
pub(crate) fn run_captured(
    session: &RcloneSession,
    operation: &str,
    args: Vec<String>,
) -> Result<ProcessResult, RcloneError> {
    let result = monitor::run(session, &args, None, None)?;
    check_result(operation, result)
}

/// Map a finished [`ProcessResult`] to the caller-facing error contract
pub(crate) fn check_result(
    operation: &str,
    result: ProcessResult,
) -> Result<ProcessResult, RcloneError> {
    if result.cancelled {
        return Err(RcloneError::Cancelled);
    }
    if result.success() {
        return Ok(result);
    }
    Err(RcloneError::ProcessFailure {
        operation: operation.to_string(),
        exit_code: result.exit_code.unwrap_or(-1),
        output: result.diagnostic_output().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(exit_code: Option<i32>, cancelled: bool) -> ProcessResult {
        ProcessResult {
            exit_code,
            stdout: "listing".to_string(),
            stderr: "ERROR : boom".to_string(),
            cancelled,
        }
    }

    #[test]
    fn test_check_result_success_passes_through() {
        let ok = check_result("ls", result(Some(0), false)).unwrap();
        assert_eq!(ok.stdout, "listing");
    }

    #[test]
    fn test_check_result_failure_carries_diagnostics() {
        let err = check_result("ls", result(Some(3), false)).unwrap_err();
        match err {
            RcloneError::ProcessFailure {
                operation,
                exit_code,
                output,
            } => {
                assert_eq!(operation, "ls");
                assert_eq!(exit_code, 3);
                assert_eq!(output, "ERROR : boom");
            }
            other => panic!("expected ProcessFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_check_result_cancellation_beats_exit_code() {
        let err = check_result("copy", result(Some(0), true)).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_check_result_signal_death_maps_to_failure() {
        let err = check_result("copy", result(None, false)).unwrap_err();
        assert!(err.is_process_failure());
    }
}
