//! Progress reporting
//!
//! Renders the stream of [`ProgressEvent`]s of one transfer: an overall
//! bytes bar plus one sub-bar per file currently transferring. File bars
//! appear and disappear as rclone starts and finishes files.

use crate::types::ProgressEvent;
use console::style;
use indicatif::{HumanBytes, MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;

/// Interactive progress display for a single transfer
pub struct TransferBar {
    multi: MultiProgress,
    overall: ProgressBar,
    file_bars: Mutex<HashMap<String, ProgressBar>>,
}

impl TransferBar {
    /// Create a display with the given title
    pub fn new(title: impl Into<String>) -> Self {
        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(0));
        if let Ok(template) = ProgressStyle::with_template(
            "{msg} {bar:30.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, ETA {eta})",
        ) {
            overall.set_style(template.progress_chars("=>-"));
        }
        overall.set_message(title.into());

        Self {
            multi,
            overall,
            file_bars: Mutex::new(HashMap::new()),
        }
    }

    /// Apply one progress snapshot
    pub fn update(&self, event: &ProgressEvent) {
        if let Some(total) = event.bytes_total {
            self.overall.set_length(total);
        }
        self.overall.set_position(event.bytes_transferred);

        let Ok(mut file_bars) = self.file_bars.lock() else {
            return;
        };

        for file in &event.files {
            let bar = file_bars.entry(file.name.clone()).or_insert_with(|| {
                let bar = self.multi.add(ProgressBar::new(100));
                if let Ok(template) =
                    ProgressStyle::with_template(" ├─ {msg} {bar:20.green} {pos}%")
                {
                    bar.set_style(template.progress_chars("=>-"));
                }
                bar.set_message(file.name.clone());
                bar
            });
            if let Some(percentage) = file.percentage {
                bar.set_position(u64::from(percentage));
            }
            if let Some(rate) = file.rate {
                bar.set_message(format!(
                    "{} ({}/s)",
                    file.name,
                    HumanBytes(rate.round() as u64)
                ));
            }
        }

        // drop bars for files rclone no longer reports (their transfer
        // completed)
        let current: Vec<String> = event.files.iter().map(|f| f.name.clone()).collect();
        file_bars.retain(|name, bar| {
            let keep = current.contains(name);
            if !keep {
                bar.finish_and_clear();
                self.multi.remove(bar);
            }
            keep
        });
    }

    /// Finalize the display once the transfer ended
    pub fn finish(&self, success: bool) {
        if let Ok(mut file_bars) = self.file_bars.lock() {
            for (_, bar) in file_bars.drain() {
                bar.finish_and_clear();
                self.multi.remove(&bar);
            }
        }

        if success {
            if let Some(total) = self.overall.length() {
                self.overall.set_position(total);
            }
            self.overall.finish();
        } else {
            self.overall
                .abandon_with_message(style("transfer failed").red().to_string());
        }
    }

    #[cfg(test)]
    fn overall_position(&self) -> u64 {
        self.overall.position()
    }

    #[cfg(test)]
    fn file_bar_count(&self) -> usize {
        self.file_bars.lock().map(|bars| bars.len()).unwrap_or(0)
    }
}

/// Shorten a path or `remote:path` for display, keeping only the last
/// component once it exceeds `max_length`.
pub fn shorten_path(path: &str, max_length: usize) -> String {
    if path.chars().count() <= max_length {
        return path.to_string();
    }

    let without_remote = match path.split_once(':') {
        Some((_, rest)) if !rest.is_empty() => rest,
        Some((remote, _)) => remote,
        None => path,
    };

    without_remote
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(without_remote)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileProgress;

    fn event(sent: u64, total: Option<u64>, names: &[&str]) -> ProgressEvent {
        ProgressEvent {
            bytes_transferred: sent,
            bytes_total: total,
            percentage: None,
            rate: None,
            eta: None,
            files: names
                .iter()
                .map(|name| FileProgress {
                    name: name.to_string(),
                    percentage: Some(50),
                    size: None,
                    rate: None,
                    eta: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_overall_bar_tracks_event_bytes() {
        let bar = TransferBar::new("Copying a to b");
        bar.update(&event(512, Some(2048), &[]));
        assert_eq!(bar.overall_position(), 512);

        bar.update(&event(2048, Some(2048), &[]));
        assert_eq!(bar.overall_position(), 2048);
        bar.finish(true);
    }

    #[test]
    fn test_file_bars_follow_event_file_set() {
        let bar = TransferBar::new("Copying");
        bar.update(&event(0, None, &["a.bin", "b.bin"]));
        assert_eq!(bar.file_bar_count(), 2);

        // b.bin finished and disappeared from the stats block
        bar.update(&event(100, None, &["a.bin"]));
        assert_eq!(bar.file_bar_count(), 1);

        bar.finish(true);
        assert_eq!(bar.file_bar_count(), 0);
    }

    #[test]
    fn test_shorten_path() {
        assert_eq!(shorten_path("short", 20), "short");
        assert_eq!(
            shorten_path("remote:very/long/path/to/file.txt", 10),
            "file.txt"
        );
        assert_eq!(shorten_path("/local/dir/with/file.txt", 10), "file.txt");
        assert_eq!(shorten_path("remote-with-a-long-name:", 10), "remote-with-a-long-name");
    }
}
