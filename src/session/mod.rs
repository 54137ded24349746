//! Session configuration
//!
//! All operations take an explicit [`RcloneSession`] instead of mutating
//! process-wide state, so unrelated calls cannot influence each other.

use crate::types::RcloneError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Verbosity forwarded to rclone on every invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// No extra logging
    #[default]
    Normal,

    /// `-v`: log every transferred file
    Verbose,

    /// `-vv`: full debug output
    Debug,
}

impl Verbosity {
    fn flag(&self) -> Option<&'static str> {
        match self {
            Verbosity::Normal => None,
            Verbosity::Verbose => Some("-v"),
            Verbosity::Debug => Some("-vv"),
        }
    }
}

/// Configuration shared by all operations of one wrapper session
#[derive(Debug, Clone)]
pub struct RcloneSession {
    /// Name or path of the rclone binary
    binary: PathBuf,

    /// Override for the rclone config file (`--config`)
    config_file: Option<PathBuf>,

    /// Log verbosity forwarded to rclone
    verbosity: Verbosity,

    /// Interval between progress stats blocks during transfers
    stats_interval: Duration,

    /// Bounded wait after a termination request before forced kill
    grace_period: Duration,
}

impl Default for RcloneSession {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("rclone"),
            config_file: None,
            verbosity: Verbosity::default(),
            stats_interval: Duration::from_millis(100),
            grace_period: Duration::from_secs(2),
        }
    }
}

impl RcloneSession {
    /// Session using `rclone` from `PATH` with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific rclone binary instead of the one on `PATH`
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Use a custom rclone config file for every invocation
    pub fn with_config_file(mut self, config_file: impl Into<PathBuf>) -> Self {
        self.config_file = Some(config_file.into());
        self
    }

    /// Set the rclone log verbosity
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set the interval between progress updates during transfers
    pub fn with_stats_interval(mut self, interval: Duration) -> Self {
        self.stats_interval = interval;
        self
    }

    /// Set the grace period between SIGTERM and forced kill on cancellation
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// The configured binary name or path
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Log verbosity forwarded to rclone
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Interval between progress stats blocks
    pub fn stats_interval(&self) -> Duration {
        self.stats_interval
    }

    /// Bounded wait before escalating to a forced kill
    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Check that the configured rclone binary is available
    pub fn is_installed(&self) -> bool {
        self.resolve_binary().is_ok()
    }

    /// Resolve the binary to an absolute path, failing fast before any
    /// subprocess is spawned.
    pub fn resolve_binary(&self) -> Result<PathBuf, RcloneError> {
        which::which(&self.binary).map_err(|_| RcloneError::BinaryNotFound {
            binary: self.binary.clone(),
        })
    }

    /// The config-file override alone, for invocations that manage the
    /// verbosity flag themselves
    pub fn config_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if let Some(config_file) = &self.config_file {
            flags.push("--config".to_string());
            flags.push(config_file.display().to_string());
        }
        flags
    }

    /// Flags appended to every invocation (config override, verbosity)
    pub fn global_flags(&self) -> Vec<String> {
        let mut flags = self.config_flags();
        if let Some(flag) = self.verbosity.flag() {
            flags.push(flag.to_string());
        }
        flags
    }
}
