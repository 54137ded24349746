//! Core type definitions for rclone-rs

mod error;
mod event;
mod transfer;

pub use error::RcloneError;
pub use event::{FileProgress, ProcessResult, ProgressEvent, ProgressSink};
pub use transfer::{TransferCommand, TransferOperation, TransferOptions};
