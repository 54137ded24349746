//! # rclone-rs - Typed wrapper around the rclone CLI
//!
//! Exposes rclone's operations (copy, move, sync, delete, check, hash,
//! remote management) as typed function calls, with streaming progress
//! parsing for interactive feedback.
//!
//! Every operation takes an explicit [`RcloneSession`] and maps to exactly
//! one `rclone` subprocess. Transfers can stream [`ProgressEvent`]s to a
//! caller-supplied sink and/or render a built-in progress bar:
//!
//! ```no_run
//! use rclone_rs::{copy, RcloneSession, TransferOptions};
//!
//! let session = RcloneSession::new();
//! let options = TransferOptions::interactive();
//! copy(&session, "local/dir", "box:backup/dir", &options, None)?;
//! # Ok::<(), rclone_rs::RcloneError>(())
//! ```

// Module declarations
pub mod command;
pub mod monitor;
pub mod ops;
pub mod report;
pub mod session;
pub mod types;
pub mod ui;

// Re-export commonly used types and the operation functions
pub use monitor::CancelToken;
pub use ops::{
    about, cat, check, copy, copy_to, create_remote, delete, hashsum, hashsum_check,
    hashsum_to_file, link, list_remotes, ls, mkdir, move_files, move_to, purge, remote_exists,
    size, sync, transfer, tree, version, version_check, AboutInfo, CatOptions, CheckOptions,
    HashOptions, LinkOptions, LsEntry, LsOptions, SizeInfo, VersionInfo,
};
pub use report::{CheckEntry, CheckReport, CheckStatus};
pub use session::{RcloneSession, Verbosity};
pub use types::{
    FileProgress, ProcessResult, ProgressEvent, ProgressSink, RcloneError, TransferCommand,
    TransferOperation, TransferOptions,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
