//! Tests for the transfer progress monitor against scripted subprocesses

#![cfg(unix)]

use rclone_rs::monitor::{self, CancelToken};
use rclone_rs::{ProgressEvent, RcloneError, RcloneSession};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Route parse warnings and monitor debug logs into the test harness so
/// failures come with the diagnostic trail. `RUST_LOG` narrows it down.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fake_rclone(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-rclone");
    fs::write(&path, format!("#!/bin/sh\n{body}")).expect("write fake rclone");
    let mut perms = fs::metadata(&path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("make script executable");
    path
}

fn collecting_sink() -> (Arc<Mutex<Vec<ProgressEvent>>>, impl Fn(&ProgressEvent) + Send + Sync)
{
    let events: Arc<Mutex<Vec<ProgressEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_events = Arc::clone(&events);
    let sink = move |event: &ProgressEvent| {
        sink_events.lock().expect("lock events").push(event.clone());
    };
    (events, sink)
}

#[test]
fn test_nonzero_exit_captures_output_verbatim() {
    init_logging();
    let dir = TempDir::new().expect("tempdir");
    let script = fake_rclone(
        dir.path(),
        "printf 'partial listing\\n'\n\
         printf '%s\\n' 'ERROR : directory not found' >&2\n\
         exit 3\n",
    );
    let session = RcloneSession::new().with_binary(&script);

    let result = monitor::run(&session, &["copy".to_string()], None, None).expect("monitor run");

    assert!(!result.success());
    assert_eq!(result.exit_code, Some(3));
    assert_eq!(result.stdout, "partial listing\n");
    assert_eq!(result.stderr, "ERROR : directory not found\n");
    assert!(!result.cancelled);
}

#[test]
fn test_progress_events_reach_the_sink_in_order() {
    init_logging();
    let dir = TempDir::new().expect("tempdir");
    let script = fake_rclone(
        dir.path(),
        "printf '%s\\n' 'Transferred:        10 MiB / 100 MiB, 10%, 5.0 MiB/s, ETA 18s' >&2\n\
         printf '%s\\n' 'Transferring:' >&2\n\
         printf '%s\\n' ' * a.bin: 10% /50Mi, 2.5Mi/s, 18s' >&2\n\
         printf '%s\\n' ' * b file.bin: 10% /50Mi, 2.5Mi/s, 18s' >&2\n\
         printf '%s\\n' 'Transferred:       100 MiB / 100 MiB, 100%, 5.0 MiB/s, ETA 0s' >&2\n\
         exit 0\n",
    );
    let session = RcloneSession::new().with_binary(&script);
    let (events, sink) = collecting_sink();

    let result =
        monitor::run(&session, &["copy".to_string()], Some(&sink), None).expect("monitor run");
    assert!(result.success());

    let events = events.lock().expect("lock events");
    assert_eq!(events.len(), 2);

    let first = &events[0];
    assert_eq!(first.bytes_transferred, 10 * 1024 * 1024);
    assert_eq!(first.bytes_total, Some(100 * 1024 * 1024));
    assert_eq!(first.percentage, Some(10));
    let names: Vec<_> = first.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["a.bin", "b file.bin"]);

    let last = &events[1];
    assert_eq!(last.percentage, Some(100));
    assert!(last.files.is_empty());
}

#[test]
fn test_unparseable_lines_do_not_abort_the_stream() {
    init_logging();
    let dir = TempDir::new().expect("tempdir");
    let script = fake_rclone(
        dir.path(),
        "printf '%s\\n' 'random diagnostic noise' >&2\n\
         printf '%s\\n' 'Transferred:        garbage / wat' >&2\n\
         printf '%s\\n' 'Transferred:        10 MiB / 100 MiB, 10%, 5.0 MiB/s, ETA 18s' >&2\n\
         exit 0\n",
    );
    let session = RcloneSession::new().with_binary(&script);
    let (events, sink) = collecting_sink();

    let result =
        monitor::run(&session, &["copy".to_string()], Some(&sink), None).expect("monitor run");

    assert!(result.success());
    // the malformed lines stayed in the raw buffer for diagnosis
    assert!(result.stderr.contains("random diagnostic noise"));
    assert!(result.stderr.contains("garbage / wat"));
    // and the valid stats block still produced an event
    assert_eq!(events.lock().expect("lock events").len(), 1);
}

#[test]
fn test_cancellation_terminates_within_grace_period() {
    init_logging();
    let dir = TempDir::new().expect("tempdir");
    let script = fake_rclone(
        dir.path(),
        "while true; do\n\
           printf '%s\\n' 'Transferred:         1 MiB / -, -, 1.0 MiB/s, -' >&2\n\
           sleep 0.1\n\
         done\n",
    );
    let session = RcloneSession::new()
        .with_binary(&script)
        .with_grace_period(Duration::from_secs(2));

    let token = CancelToken::new();
    let cancel_handle = token.clone();
    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(300));
        cancel_handle.cancel();
    });

    let started = Instant::now();
    let result =
        monitor::run(&session, &["copy".to_string()], None, Some(&token)).expect("monitor run");
    canceller.join().expect("join canceller");

    assert!(result.cancelled);
    assert!(!result.success());
    // cancelled promptly: well under cancel delay + grace period + margin
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "took {:?}",
        started.elapsed()
    );
}

#[test]
fn test_missing_binary_is_a_precondition_failure() {
    init_logging();
    let session = RcloneSession::new().with_binary("this-binary-does-not-exist-anywhere");
    let err = monitor::run(&session, &["version".to_string()], None, None).unwrap_err();

    assert!(matches!(err, RcloneError::BinaryNotFound { .. }));
    assert!(err.is_precondition());
}
