//! Transfer operations: copy, copyto, move, moveto, sync
//!
//! All five are dispatched through [`transfer`], the single execution
//! path; they differ only in the subcommand.

use crate::command;
use crate::monitor;
use crate::session::RcloneSession;
use crate::types::{
    ProcessResult, ProgressEvent, ProgressSink, RcloneError, TransferCommand, TransferOperation,
    TransferOptions,
};
use crate::ui::TransferBar;
use tracing::info;

/// Copy files from source to destination, skipping identical files
/// (`rclone copy`).
pub fn copy(
    session: &RcloneSession,
    source: &str,
    destination: &str,
    options: &TransferOptions,
    on_progress: Option<&ProgressSink>,
) -> Result<ProcessResult, RcloneError> {
    transfer(session, TransferOperation::Copy, source, destination, options, on_progress)
}

/// Copy to an exact destination name; used when renaming during the copy
/// (`rclone copyto`).
pub fn copy_to(
    session: &RcloneSession,
    source: &str,
    destination: &str,
    options: &TransferOptions,
    on_progress: Option<&ProgressSink>,
) -> Result<ProcessResult, RcloneError> {
    transfer(session, TransferOperation::CopyTo, source, destination, options, on_progress)
}

/// Move files from source to destination (`rclone move`).
pub fn move_files(
    session: &RcloneSession,
    source: &str,
    destination: &str,
    options: &TransferOptions,
    on_progress: Option<&ProgressSink>,
) -> Result<ProcessResult, RcloneError> {
    transfer(session, TransferOperation::Move, source, destination, options, on_progress)
}

/// Move to an exact destination name; used when renaming during the move
/// (`rclone moveto`).
pub fn move_to(
    session: &RcloneSession,
    source: &str,
    destination: &str,
    options: &TransferOptions,
    on_progress: Option<&ProgressSink>,
) -> Result<ProcessResult, RcloneError> {
    transfer(session, TransferOperation::MoveTo, source, destination, options, on_progress)
}

/// Make destination identical to source, modifying destination only
/// (`rclone sync`).
pub fn sync(
    session: &RcloneSession,
    source: &str,
    destination: &str,
    options: &TransferOptions,
    on_progress: Option<&ProgressSink>,
) -> Result<ProcessResult, RcloneError> {
    transfer(session, TransferOperation::Sync, source, destination, options, on_progress)
}

/// Execute one transfer operation, streaming progress events to the
/// optional sink (and to the interactive bar when enabled) strictly
/// before the terminal result is returned.
pub fn transfer(
    session: &RcloneSession,
    operation: TransferOperation,
    source: &str,
    destination: &str,
    options: &TransferOptions,
    on_progress: Option<&ProgressSink>,
) -> Result<ProcessResult, RcloneError> {
    let command = TransferCommand::new(operation, source, destination).with_options(options);
    let args = command::transfer_args(session, &command);

    let bar = options.show_progress.then(|| {
        TransferBar::new(format!(
            "{} {} to {}",
            operation.describe(),
            crate::ui::shorten_path(source, 24),
            crate::ui::shorten_path(destination, 24),
        ))
    });

    let forward = |event: &ProgressEvent| {
        if let Some(bar) = &bar {
            bar.update(event);
        }
        if let Some(sink) = on_progress {
            sink(event);
        }
    };
    let sink: &(dyn Fn(&ProgressEvent) + Send + Sync) = &forward;

    let result = monitor::run(session, &args, Some(sink), options.cancel.as_ref());

    if let Some(bar) = &bar {
        let finished_ok = matches!(&result, Ok(r) if r.success());
        bar.finish(finished_ok);
    }

    let result = super::check_result(
        &format!("{} {} to {}", operation.describe(), source, destination),
        result?,
    )?;
    info!(
        operation = operation.subcommand(),
        source, destination, "transfer completed"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_fails_fast_without_binary() {
        let session = RcloneSession::new().with_binary("missing-rclone-binary-for-test");
        let err = copy(&session, "src", "dst", &TransferOptions::default(), None).unwrap_err();
        assert!(matches!(err, RcloneError::BinaryNotFound { .. }));
    }
}
