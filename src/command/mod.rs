//! Command building
//!
//! Pure mapping from a logical operation to the exact ordered argument
//! list handed to rclone. No validation of flag conflicts happens here:
//! passthrough arguments land after all generated ones, and rclone's own
//! last-argument-wins resolution applies.

use crate::session::{RcloneSession, Verbosity};
use crate::types::TransferCommand;
use std::time::Duration;

/// Ordered argv under construction for one rclone invocation
#[derive(Debug, Clone)]
pub struct CommandArgs {
    args: Vec<String>,
}

impl CommandArgs {
    /// Start an argument list with the given rclone subcommand
    pub fn new(subcommand: &str) -> Self {
        Self {
            args: vec![subcommand.to_string()],
        }
    }

    /// Append a positional path argument
    pub fn path(mut self, path: impl AsRef<str>) -> Self {
        self.args.push(path.as_ref().to_string());
        self
    }

    /// Append a bare flag
    pub fn flag(mut self, flag: &str) -> Self {
        self.args.push(flag.to_string());
        self
    }

    /// Append a flag only when `condition` holds
    pub fn flag_if(self, condition: bool, flag: &str) -> Self {
        if condition {
            self.flag(flag)
        } else {
            self
        }
    }

    /// Append a `--name value` option
    pub fn option(mut self, name: &str, value: impl ToString) -> Self {
        self.args.push(name.to_string());
        self.args.push(value.to_string());
        self
    }

    /// Append a `--name value` option when a value is present
    pub fn option_opt(self, name: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.option(name, value),
            None => self,
        }
    }

    /// Request periodic textual stats blocks from rclone.
    ///
    /// `--stats` alone is not enough: the stats logger only prints at
    /// INFO level, so the transfer runs at `-v` minimum. rclone counts
    /// verbosity flags, so the session flag is folded in here rather
    /// than emitted a second time.
    pub fn stats_every(self, session: &RcloneSession) -> Self {
        let verbosity = match session.verbosity() {
            Verbosity::Debug => "-vv",
            Verbosity::Normal | Verbosity::Verbose => "-v",
        };
        self.option("--stats", format_interval(session.stats_interval()))
            .flag(verbosity)
    }

    /// Append the session-wide flags (config file override, verbosity)
    pub fn session_flags(mut self, session: &RcloneSession) -> Self {
        self.args.extend(session.global_flags());
        self
    }

    /// Append only the session config-file flag; used alongside
    /// [`CommandArgs::stats_every`], which already carries the verbosity
    pub fn session_config(mut self, session: &RcloneSession) -> Self {
        self.args.extend(session.config_flags());
        self
    }

    /// Append caller-supplied arguments verbatim. Always call last so the
    /// caller can override anything generated before.
    pub fn raw(mut self, extra: &[String]) -> Self {
        self.args.extend_from_slice(extra);
        self
    }

    /// Finish building
    pub fn build(self) -> Vec<String> {
        self.args
    }
}

/// Build the full argv for a transfer invocation
pub fn transfer_args(session: &RcloneSession, command: &TransferCommand) -> Vec<String> {
    CommandArgs::new(command.operation.subcommand())
        .flag_if(command.ignore_existing, "--ignore-existing")
        .path(&command.source)
        .path(&command.destination)
        .stats_every(session)
        .session_config(session)
        .raw(&command.extra_args)
        .build()
}

fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs_f64();
    if secs >= 1.0 && interval.subsec_nanos() == 0 {
        format!("{}s", interval.as_secs())
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransferOperation;

    #[test]
    fn test_transfer_args_order() {
        let session = RcloneSession::new();
        let command = TransferCommand::new(TransferOperation::Copy, "a:src", "b:dst");

        let args = transfer_args(&session, &command);
        assert_eq!(
            args,
            ["copy", "a:src", "b:dst", "--stats", "0.1s", "-v"]
        );
    }

    #[test]
    fn test_ignore_existing_precedes_paths() {
        let session = RcloneSession::new();
        let mut command = TransferCommand::new(TransferOperation::Move, "src", "dst");
        command.ignore_existing = true;

        let args = transfer_args(&session, &command);
        assert_eq!(&args[..4], ["move", "--ignore-existing", "src", "dst"]);
    }

    #[test]
    fn test_extra_args_appended_verbatim_last() {
        let session = RcloneSession::new().with_config_file("/tmp/rc.conf");
        let mut command = TransferCommand::new(TransferOperation::Copy, "a:src", "b:dst");
        command.extra_args = vec!["--foo".to_string()];

        let args = transfer_args(&session, &command);
        assert_eq!(args.last().map(String::as_str), Some("--foo"));
        // session flags come before passthrough
        let config_pos = args.iter().position(|a| a == "--config").unwrap();
        assert!(config_pos < args.len() - 1);
    }

    #[test]
    fn test_transfer_verbosity_is_never_duplicated() {
        // a verbose session must not stack a second -v on top of the one
        // the stats logger needs, or rclone escalates to debug
        let session = RcloneSession::new().with_verbosity(Verbosity::Verbose);
        let command = TransferCommand::new(TransferOperation::Copy, "src", "dst");

        let args = transfer_args(&session, &command);
        assert_eq!(args.iter().filter(|a| *a == "-v").count(), 1);
        assert!(!args.iter().any(|a| a == "-vv"));
    }

    #[test]
    fn test_debug_session_transfers_at_debug() {
        let session = RcloneSession::new().with_verbosity(Verbosity::Debug);
        let command = TransferCommand::new(TransferOperation::Copy, "src", "dst");

        let args = transfer_args(&session, &command);
        assert_eq!(args.iter().filter(|a| *a == "-vv").count(), 1);
        assert!(!args.iter().any(|a| a == "-v"));
    }

    #[test]
    fn test_option_opt_skips_absent_values() {
        let args = CommandArgs::new("cat")
            .path("remote:file.txt")
            .option_opt("--head", Some(100))
            .option_opt("--tail", None::<u64>)
            .build();
        assert_eq!(args, ["cat", "remote:file.txt", "--head", "100"]);
    }

    #[test]
    fn test_interval_formatting() {
        assert_eq!(format_interval(Duration::from_millis(100)), "0.1s");
        assert_eq!(format_interval(Duration::from_secs(1)), "1s");
        assert_eq!(format_interval(Duration::from_millis(1500)), "1.5s");
    }
}
