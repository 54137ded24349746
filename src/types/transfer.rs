//! Transfer operations and the immutable command describing one invocation

use crate::monitor::CancelToken;

/// The rclone subcommand used for a transfer.
///
/// All variants are dispatched through a single execution path; they only
/// differ in the subcommand name and the human description used for
/// progress titles and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOperation {
    /// Copy files, skipping identical ones (`rclone copy`)
    Copy,

    /// Copy to an exact destination name, used for renames (`rclone copyto`)
    CopyTo,

    /// Move files to the destination (`rclone move`)
    Move,

    /// Move to an exact destination name, used for renames (`rclone moveto`)
    MoveTo,

    /// Make destination identical to source, deleting extras (`rclone sync`)
    Sync,
}

impl TransferOperation {
    /// The rclone subcommand name
    pub fn subcommand(&self) -> &'static str {
        match self {
            TransferOperation::Copy => "copy",
            TransferOperation::CopyTo => "copyto",
            TransferOperation::Move => "move",
            TransferOperation::MoveTo => "moveto",
            TransferOperation::Sync => "sync",
        }
    }

    /// Human description used in progress titles and error messages
    pub fn describe(&self) -> &'static str {
        match self {
            TransferOperation::Copy | TransferOperation::CopyTo => "Copying",
            TransferOperation::Move | TransferOperation::MoveTo => "Moving",
            TransferOperation::Sync => "Syncing",
        }
    }
}

/// One fully described transfer invocation. Immutable once built.
#[derive(Debug, Clone)]
pub struct TransferCommand {
    /// Which rclone subcommand to run
    pub operation: TransferOperation,
    /// Source path or `remote:path`
    pub source: String,
    /// Destination path or `remote:path`
    pub destination: String,
    /// Skip files that already exist on the destination
    pub ignore_existing: bool,
    /// Raw arguments appended verbatim after all generated flags
    pub extra_args: Vec<String>,
}

impl TransferCommand {
    /// Create a command with default options
    pub fn new(
        operation: TransferOperation,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            source: source.into(),
            destination: destination.into(),
            ignore_existing: false,
            extra_args: Vec::new(),
        }
    }

    /// Apply per-call options
    pub fn with_options(mut self, options: &TransferOptions) -> Self {
        self.ignore_existing = options.ignore_existing;
        self.extra_args = options.extra_args.clone();
        self
    }
}

/// Caller-facing options shared by all transfer operations
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
    /// Skip files that already exist on the destination
    pub ignore_existing: bool,

    /// Render the built-in interactive progress bar
    pub show_progress: bool,

    /// Raw rclone arguments appended verbatim after generated flags.
    /// Conflicts are resolved by rclone itself (last argument wins).
    pub extra_args: Vec<String>,

    /// Cooperative cancellation signal checked between output lines
    pub cancel: Option<CancelToken>,
}

impl TransferOptions {
    /// Options with the interactive progress bar enabled
    pub fn interactive() -> Self {
        Self {
            show_progress: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcommand_names_match_rclone() {
        assert_eq!(TransferOperation::Copy.subcommand(), "copy");
        assert_eq!(TransferOperation::CopyTo.subcommand(), "copyto");
        assert_eq!(TransferOperation::Move.subcommand(), "move");
        assert_eq!(TransferOperation::MoveTo.subcommand(), "moveto");
        assert_eq!(TransferOperation::Sync.subcommand(), "sync");
    }

    #[test]
    fn test_with_options_copies_flags_and_args() {
        let options = TransferOptions {
            ignore_existing: true,
            extra_args: vec!["--bwlimit".to_string(), "10M".to_string()],
            ..Default::default()
        };
        let command = TransferCommand::new(TransferOperation::Sync, "a:src", "b:dst")
            .with_options(&options);

        assert!(command.ignore_existing);
        assert_eq!(command.extra_args, ["--bwlimit", "10M"]);
        assert_eq!(command.source, "a:src");
        assert_eq!(command.destination, "b:dst");
    }
}
