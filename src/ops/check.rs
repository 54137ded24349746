//! The check operation: compare source and destination

use crate::command::CommandArgs;
use crate::monitor;
use crate::report::CheckReport;
use crate::session::RcloneSession;
use crate::types::RcloneError;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Options for [`check`]
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Only compare sizes, not hashes (fast)
    pub size_only: bool,
    /// Download and compare the actual data instead of hashes
    pub download: bool,
    /// Only check that source files exist on the destination
    pub one_way: bool,
    /// Write the combined report to this path instead of a temp file
    pub combined: Option<PathBuf>,
    /// Raw arguments appended verbatim
    pub extra_args: Vec<String>,
}

/// Check that the files in source and destination match (`rclone check`).
///
/// A report with differences is a normal result, not an error; only a run
/// that produced no combined report at all fails.
pub fn check(
    session: &RcloneSession,
    source: &str,
    destination: &str,
    options: &CheckOptions,
) -> Result<CheckReport, RcloneError> {
    // keep the tempdir alive until the report is read
    let tmp;
    let combined_path = match &options.combined {
        Some(path) => path.clone(),
        None => {
            tmp = tempfile::tempdir()?;
            tmp.path().join("combined_report")
        }
    };

    let args = CommandArgs::new("check")
        .path(source)
        .path(destination)
        .flag_if(options.size_only, "--size-only")
        .flag_if(options.download, "--download")
        .flag_if(options.one_way, "--one-way")
        .session_flags(session)
        .raw(&options.extra_args)
        // deliberately after the passthrough args: rclone honors the last
        // --combined, and the report must land where we will read it
        .option("--combined", combined_path.display())
        .build();

    let result = monitor::run(session, &args, None, None)?;
    if result.cancelled {
        return Err(RcloneError::Cancelled);
    }
    debug!(stderr = %result.stderr, "rclone check finished");

    // non-zero exit is expected when differences exist; it only signals a
    // failed run if no report was produced
    match fs::read_to_string(&combined_path) {
        Ok(text) => Ok(CheckReport::from_combined(&text)),
        Err(_) if !result.success() => Err(RcloneError::ProcessFailure {
            operation: format!("check {source} against {destination}"),
            exit_code: result.exit_code.unwrap_or(-1),
            output: result.diagnostic_output().to_string(),
        }),
        Err(err) => Err(err.into()),
    }
}
