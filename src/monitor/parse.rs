//! Parsing of rclone's periodic textual stats output
//!
//! With `--stats <interval> -v` rclone logs a stats block to stderr at a
//! fixed interval:
//!
//! ```text
//! Transferred:       270.128 MiB / 946.788 MiB, 29%, 2.529 MiB/s, ETA 4m27s
//! Transferred:            2 / 3, 67%
//! Elapsed time:        12.5s
//! Transferring:
//!  * videos/holiday 2023.mp4: 29% /900Mi, 2.5Mi/s, 4m27s
//! ```
//!
//! Sizes and rates carry rclone size suffixes (base 1024). Unknown totals,
//! percentages and ETAs are printed as `-` and parsed to `None`, never
//! zero. Lines that fit no recognized shape are diagnostic text; they are
//! never dropped from the raw buffer and never abort parsing.

use crate::types::{FileProgress, ProgressEvent};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::warn;

/// Classification of one stderr line
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Overall-progress line opening a stats block
    Overall {
        bytes_transferred: u64,
        bytes_total: Option<u64>,
        percentage: Option<u8>,
        rate: Option<f64>,
        eta: Option<Duration>,
    },
    /// Per-file progress inside a `Transferring:` section
    File(FileProgress),
    /// Other stats-block furniture (counts, elapsed time, section header)
    StatsNoise,
    /// Anything else: log output, errors, completion messages
    Diagnostic,
}

fn overall_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:.*?INFO\s*:\s*)?Transferred:\s+(?P<sent>[\d.]+(?:\s*[A-Za-z]+)?) / (?:(?P<total>[\d.]+(?:\s*[A-Za-z]+)?)|-), (?:(?P<pct>\d+)%|-), (?:(?P<rate>[\d.]+(?:\s*[A-Za-z]+)?)/s|-), (?:ETA (?P<eta>\S+)|-)\s*$",
        )
        .expect("overall progress pattern")
    })
}

fn counts_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // the transfer-count line also begins with "Transferred:" but has
        // no unit, rate or ETA fields
        Regex::new(r"^(?:.*?INFO\s*:\s*)?Transferred:\s+\d+ / \d+, (?:\d+%|-)\s*$")
            .expect("transfer count pattern")
    })
}

fn file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*\*\s+(?P<name>.+?):\s+(?P<pct>\d+)% /(?:(?P<size>[\d.]+[A-Za-z]*)|-), (?:(?P<rate>[\d.]+[A-Za-z]*)|-)/s, (?P<eta>\S+)\s*$",
        )
        .expect("per-file progress pattern")
    })
}

fn file_pending_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // rclone lists files whose size is not yet known as " * name: transferring"
    RE.get_or_init(|| {
        Regex::new(r"^\s*\*\s+(?P<name>.+?):\s*(?:transferring.*)?$")
            .expect("pending file pattern")
    })
}

fn noise_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:Errors:|Checks:|Deleted:|Renamed:|Elapsed time:|Transferring:)")
            .expect("stats noise pattern")
    })
}

/// Classify one line of rclone stderr output
pub fn classify(line: &str) -> Line {
    if let Some(caps) = overall_re().captures(line) {
        // a sent field with an unrecognized unit is not trustworthy
        // progress; zero would claim knowledge the line does not carry
        if let Some(sent) = caps.name("sent").and_then(|m| parse_size(m.as_str())) {
            return Line::Overall {
                bytes_transferred: sent.round() as u64,
                bytes_total: caps
                    .name("total")
                    .and_then(|m| parse_size(m.as_str()))
                    .map(|b| b.round() as u64),
                percentage: caps.name("pct").and_then(|m| parse_percentage(m.as_str())),
                rate: caps.name("rate").and_then(|m| parse_size(m.as_str())),
                eta: caps.name("eta").and_then(|m| parse_eta(m.as_str())),
            };
        }
        return Line::Diagnostic;
    }

    if counts_re().is_match(line) || noise_re().is_match(line.trim_start()) {
        return Line::StatsNoise;
    }

    if let Some(caps) = file_re().captures(line) {
        return Line::File(FileProgress {
            name: caps["name"].to_string(),
            percentage: parse_percentage(&caps["pct"]),
            size: caps
                .name("size")
                .and_then(|m| parse_size(m.as_str()))
                .map(|b| b.round() as u64),
            rate: caps.name("rate").and_then(|m| parse_size(m.as_str())),
            eta: caps.name("eta").and_then(|m| parse_eta(m.as_str())),
        });
    }

    if line.trim_start().starts_with('*') {
        if let Some(caps) = file_pending_re().captures(line) {
            return Line::File(FileProgress {
                name: caps["name"].to_string(),
                percentage: None,
                size: None,
                rate: None,
                eta: None,
            });
        }
    }

    Line::Diagnostic
}

/// Stateful assembler combining an overall line with the per-file lines of
/// the same stats block into one composite [`ProgressEvent`].
#[derive(Debug, Default)]
pub struct ProgressParser {
    current: Option<ProgressEvent>,
}

impl ProgressParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one stderr line. Returns a finished composite event when the
    /// previous stats block is complete.
    pub fn feed(&mut self, line: &str) -> Option<ProgressEvent> {
        match classify(line) {
            Line::Overall {
                bytes_transferred,
                bytes_total,
                percentage,
                rate,
                eta,
            } => {
                let finished = self.current.take();
                self.current = Some(ProgressEvent {
                    bytes_transferred,
                    bytes_total,
                    percentage,
                    rate,
                    eta,
                    files: Vec::new(),
                });
                finished
            }
            Line::File(file) => {
                match &mut self.current {
                    Some(event) => event.files.push(file),
                    // a per-file line with no preceding overall line is
                    // malformed output; skip it and keep going
                    None => warn!(line, "per-file progress outside a stats block"),
                }
                None
            }
            Line::StatsNoise => None,
            Line::Diagnostic => self.current.take(),
        }
    }

    /// Flush the trailing stats block at end of stream
    pub fn finish(&mut self) -> Option<ProgressEvent> {
        self.current.take()
    }
}

/// Parse a size or rate with an optional rclone suffix into bytes.
///
/// rclone size suffixes are base 1024: `5 MiB`, `5Mi`, `5M` and the legacy
/// `5 MBytes` all mean 5 × 1024². A bare number is bytes.
pub fn parse_size(text: &str) -> Option<f64> {
    let text = text.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let (digits, suffix) = text.split_at(split);
    let value: f64 = digits.parse().ok()?;

    let mut unit = suffix.trim().to_ascii_lowercase();
    if let Some(stripped) = unit.strip_suffix("bytes") {
        unit = stripped.to_string();
    } else if let Some(stripped) = unit.strip_suffix('b') {
        unit = stripped.to_string();
    }

    let multiplier: f64 = match unit.as_str() {
        "" => 1.0,
        "k" | "ki" => 1024.0,
        "m" | "mi" => 1024.0 * 1024.0,
        "g" | "gi" => 1024.0 * 1024.0 * 1024.0,
        "t" | "ti" => 1024.0f64.powi(4),
        "p" | "pi" => 1024.0f64.powi(5),
        _ => return None,
    };

    Some(value * multiplier)
}

fn parse_percentage(text: &str) -> Option<u8> {
    let value: u32 = text.trim_end_matches('%').parse().ok()?;
    Some(value.min(100) as u8)
}

/// Parse an rclone ETA such as `4m27s`, `1h2m`, `2d1h` or `27s`
pub fn parse_eta(text: &str) -> Option<Duration> {
    if text == "-" {
        return None;
    }

    let mut total = 0u64;
    let mut digits = String::new();
    let mut saw_unit = false;

    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            let value: u64 = digits.parse().ok()?;
            digits.clear();
            let seconds = match c {
                'w' => 7 * 24 * 3600,
                'd' => 24 * 3600,
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return None,
            };
            total += value * seconds;
            saw_unit = true;
        }
    }

    if !digits.is_empty() || !saw_unit {
        // trailing digits without a unit, or no unit at all
        return None;
    }

    Some(Duration::from_secs(total))
}
