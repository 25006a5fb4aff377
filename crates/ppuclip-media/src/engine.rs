//! Extraction engine driver.
//!
//! Spawns ffmpeg against a stream manifest and drives it to completion,
//! forwarding percent updates parsed from the progress pipe. The driver never
//! blocks indefinitely on the pipe: when no progress arrives within the poll
//! interval it checks whether the engine is still alive, so an engine that
//! goes quiet cannot hang the run.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::command::FfmpegCommand;
use crate::error::{EngineError, EngineResult};
use crate::progress::ProgressTracker;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Drives ffmpeg to pull a clip out of a stream manifest.
pub struct Extractor {
    /// Engine binary name or path, resolved through PATH before spawning
    binary: String,
    /// User-Agent for the stream fetch
    user_agent: String,
    /// Referer for the stream fetch
    referer: String,
    /// How long to wait for a progress line before checking liveness
    poll_interval: Duration,
    /// Cancellation signal receiver
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl Extractor {
    /// Create a new extractor.
    pub fn new(
        binary: impl Into<String>,
        user_agent: impl Into<String>,
        referer: impl Into<String>,
    ) -> Self {
        Self {
            binary: binary.into(),
            user_agent: user_agent.into(),
            referer: referer.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            cancel_rx: None,
        }
    }

    /// Set a cancellation signal.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Override the liveness poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Extract a clip window from a manifest into `output`.
    ///
    /// `on_progress` receives each percent advance exactly once. Fails with
    /// [`EngineError::EngineNotFound`] before spawning anything when the
    /// binary is not on PATH.
    pub async fn download<F>(
        &self,
        manifest_url: &str,
        output: &Path,
        start_secs: u64,
        duration_secs: u64,
        on_progress: F,
    ) -> EngineResult<()>
    where
        F: Fn(u8),
    {
        let binary = which::which(&self.binary).map_err(|_| EngineError::EngineNotFound)?;

        let cmd = FfmpegCommand::new(manifest_url, output)
            .seek(start_secs)
            .permissive_hls_input()
            .headers(&self.user_agent, &self.referer)
            .duration(duration_secs)
            .stream_copy();
        let args = cmd.build_args();

        info!(start_secs, duration_secs, "starting clip extraction");
        debug!("running {} {}", binary.display(), args.join(" "));

        let mut child = Command::new(&binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        self.drive_process(&mut child, duration_secs, on_progress)
            .await
    }

    /// Drive a spawned engine process to completion.
    ///
    /// Reads the progress pipe line by line; when the pipe stays quiet for a
    /// poll interval, checks `try_wait` so an exited engine ends the loop.
    /// Cancellation is observed between reads and kills the process.
    async fn drive_process<F>(
        &self,
        child: &mut Child,
        duration_secs: u64,
        on_progress: F,
    ) -> EngineResult<()>
    where
        F: Fn(u8),
    {
        let stdout = child.stdout.take().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "progress pipe not captured")
        })?;
        let mut lines = BufReader::new(stdout).lines();
        let mut tracker = ProgressTracker::new(duration_secs);

        let status = loop {
            if self.cancelled() {
                info!("cancellation requested, killing engine");
                let _ = child.kill().await;
                return Err(EngineError::Cancelled);
            }

            match tokio::time::timeout(self.poll_interval, lines.next_line()).await {
                Ok(Ok(Some(line))) => {
                    if let Some(percent) = tracker.observe_line(&line) {
                        on_progress(percent);
                    }
                }
                // Progress pipe closed: the engine is done writing.
                Ok(Ok(None)) => break child.wait().await?,
                Ok(Err(e)) => return Err(EngineError::Io(e)),
                // Nothing within the poll window; is the engine still alive?
                Err(_) => {
                    if let Some(status) = child.try_wait()? {
                        break status;
                    }
                }
            }
        };

        if status.success() {
            return Ok(());
        }

        let stderr = drain_stderr(child).await;
        error!(exit_code = ?status.code(), "engine failed");
        if !stderr.is_empty() {
            error!("engine stderr:\n{stderr}");
        }
        Err(EngineError::engine_failed(status.code(), stderr))
    }

    fn cancelled(&self) -> bool {
        self.cancel_rx.as_ref().is_some_and(|rx| *rx.borrow())
    }
}

async fn drain_stderr(child: &mut Child) -> String {
    let Some(mut stderr) = child.stderr.take() else {
        return String::new();
    };
    let mut buf = Vec::new();
    let _ = stderr.read_to_end(&mut buf).await;
    String::from_utf8_lossy(&buf).trim().to_string()
}
