//! Transfer progress monitor
//!
//! Owns exactly one rclone child process per invocation. Standard output
//! is drained on a background thread; standard error (where rclone writes
//! its logs and stats blocks) is read line-by-line through a channel so
//! the monitor loop can observe cancellation between lines. Every line is
//! kept in the raw output buffer for failure diagnosis, whether or not it
//! parsed as progress.

pub mod parse;

use crate::session::RcloneSession;
use crate::types::{ProcessResult, RcloneError};
use parse::ProgressParser;
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Cooperative cancellation signal.
///
/// Cloning shares the flag, so one token can be handed to another thread
/// and cancelled from there while the monitor blocks on output.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the running operation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// How often the monitor loop wakes up to check the cancel token while no
/// output is arriving.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run rclone with the given argument list and drain it to completion.
///
/// The returned [`ProcessResult`] always reflects the true exit status of
/// the subprocess; progress parsing can never turn a failed run into a
/// success. Zero or more events reach `on_progress` strictly before this
/// function returns.
pub fn run(
    session: &RcloneSession,
    args: &[String],
    on_progress: Option<&(dyn Fn(&crate::types::ProgressEvent) + Send + Sync)>,
    cancel: Option<&CancelToken>,
) -> Result<ProcessResult, RcloneError> {
    let binary = session.resolve_binary()?;

    if cancel.map(CancelToken::is_cancelled).unwrap_or(false) {
        return Ok(ProcessResult {
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            cancelled: true,
        });
    }

    debug!(binary = %binary.display(), ?args, "spawning rclone");

    let mut child = Command::new(&binary)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout_pipe = child.stdout.take().expect("stdout was piped");
    let stdout_thread = thread::spawn(move || {
        let mut buf = String::new();
        let mut reader = BufReader::new(stdout_pipe);
        let _ = reader.read_to_string(&mut buf);
        buf
    });

    let stderr_pipe = child.stderr.take().expect("stderr was piped");
    let (line_tx, line_rx) = mpsc::channel::<String>();
    let stderr_thread = thread::spawn(move || {
        let mut reader = BufReader::new(stderr_pipe);
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(%err, "error reading rclone stderr");
                    break;
                }
            }
        }
    });

    let mut parser = ProgressParser::new();
    let mut stderr_buf = String::new();
    let mut cancelled = false;

    loop {
        if !cancelled && cancel.map(CancelToken::is_cancelled).unwrap_or(false) {
            cancelled = true;
            terminate(&mut child, session.grace_period());
        }

        match line_rx.recv_timeout(POLL_INTERVAL) {
            Ok(raw) => {
                stderr_buf.push_str(&raw);
                let line = raw.trim_end_matches(&['\r', '\n'][..]);
                if let Some(event) = parser.feed(line) {
                    if let Some(sink) = on_progress {
                        sink(&event);
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    if let Some(event) = parser.finish() {
        if let Some(sink) = on_progress {
            sink(&event);
        }
    }

    // the child is always reaped, even after a kill
    let status = child.wait()?;
    let _ = stderr_thread.join();
    let stdout = stdout_thread.join().unwrap_or_default();

    let result = ProcessResult {
        exit_code: status.code(),
        stdout,
        stderr: stderr_buf,
        cancelled,
    };
    debug!(exit_code = ?result.exit_code, cancelled, "rclone exited");
    Ok(result)
}

/// Ask the child to stop, escalating to a forced kill after the grace
/// period. On unix a SIGTERM gives rclone the chance to clean up partial
/// transfers; elsewhere only a hard kill is available.
fn terminate(child: &mut Child, grace_period: Duration) {
    #[cfg(unix)]
    {
        // SAFETY: the pid belongs to a child we own and have not reaped yet
        unsafe {
            libc::kill(child.id() as libc::pid_t, libc::SIGTERM);
        }
    }
    #[cfg(not(unix))]
    {
        let _ = child.kill();
    }

    let deadline = Instant::now() + grace_period;
    while Instant::now() < deadline {
        match child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) => thread::sleep(Duration::from_millis(25)),
            Err(_) => break,
        }
    }

    warn!("rclone did not exit within the grace period, killing");
    let _ = child.kill();
}
