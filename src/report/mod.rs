//! Parsing of completed check and hashsum output
//!
//! Unlike transfer progress, these commands run to completion and their
//! full output is parsed afterwards. Every entry is one line: a
//! one-character status symbol (check) or a hash (hashsum), a separator,
//! then the path. Paths may contain spaces, so splitting happens only at
//! the first separator.

use std::collections::BTreeMap;

/// Per-path outcome of a `check` run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// `=` present in source and destination, identical
    Identical,
    /// `-` only present in the destination
    DestOnly,
    /// `+` only present in the source
    SourceOnly,
    /// `*` present on both sides but different
    Differs,
    /// `!` error reading or hashing source or destination
    Error,
}

impl CheckStatus {
    /// Map rclone's combined-report symbol to a status
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '=' => Some(CheckStatus::Identical),
            '-' => Some(CheckStatus::DestOnly),
            '+' => Some(CheckStatus::SourceOnly),
            '*' => Some(CheckStatus::Differs),
            '!' => Some(CheckStatus::Error),
            _ => None,
        }
    }

    /// The symbol rclone prints for this status
    pub fn symbol(&self) -> char {
        match self {
            CheckStatus::Identical => '=',
            CheckStatus::DestOnly => '-',
            CheckStatus::SourceOnly => '+',
            CheckStatus::Differs => '*',
            CheckStatus::Error => '!',
        }
    }
}

/// One `<symbol> <path>` line of a combined check report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckEntry {
    pub status: CheckStatus,
    pub path: String,
}

/// Outcome of a `check` operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// True iff every compared path was identical
    pub success: bool,
    /// Entries in report order
    pub entries: Vec<CheckEntry>,
}

impl CheckReport {
    /// Parse the content of a `--combined` report file.
    ///
    /// Lines that do not carry a known status symbol are skipped; rclone
    /// writes nothing else into the combined file.
    pub fn from_combined(text: &str) -> Self {
        let entries: Vec<CheckEntry> = text
            .lines()
            .filter_map(|line| {
                let (symbol, path) = line.split_once(' ')?;
                let status = CheckStatus::from_symbol(symbol.chars().next()?)?;
                Some(CheckEntry {
                    status,
                    path: path.to_string(),
                })
            })
            .collect();

        let success = entries
            .iter()
            .all(|entry| entry.status == CheckStatus::Identical);

        Self { success, entries }
    }

    /// Paths with the given status, in report order
    pub fn paths_with(&self, status: CheckStatus) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.status == status)
            .map(|entry| entry.path.as_str())
            .collect()
    }
}

/// Parse `hashsum` output into an ordered file -> hash map.
///
/// Each line is `<hash>  <file>`; the file name starts after the first
/// space, with any further leading whitespace trimmed (rclone uses a
/// double space, and file names may themselves contain spaces).
pub fn parse_hash_sums(output: &str) -> BTreeMap<String, String> {
    split_lines(output)
        .map(|(value, file)| (file.to_string(), value.to_string()))
        .collect()
}

/// Parse `hashsum --checkfile` output into a file -> matched map.
///
/// In checkfile mode the first column is `=` for a matching file and `*`
/// for a mismatch.
pub fn parse_hash_check(output: &str) -> BTreeMap<String, bool> {
    split_lines(output)
        .map(|(value, file)| (file.to_string(), value == "="))
        .collect()
}

/// True when every line of checkfile output has the expected
/// `= `/`* ` shape; used to tell a "some hashes differ" exit from a
/// genuinely failed run.
pub fn is_well_formed_hash_check(output: &str) -> bool {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .all(|line| line.starts_with("= ") || line.starts_with("* "))
}

fn split_lines(output: &str) -> impl Iterator<Item = (&str, &str)> {
    output.lines().filter_map(|line| {
        let (value, file) = line.split_once(' ')?;
        let file = file.trim_start();
        if value.is_empty() || file.is_empty() {
            None
        } else {
            Some((value, file))
        }
    })
}
