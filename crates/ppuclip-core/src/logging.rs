//! Log sink setup for downloader hosts.
//!
//! Front ends call [`LogConfig::init`] once at startup. Errors go to stderr,
//! where they cannot collide with progress rendering, while the full DEBUG
//! stream lands in a daily-rolled file under the log directory. Rolled files
//! older than the retention window are deleted on startup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Days, Local, NaiveDate};
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Log sink configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory rolled log files land in
    pub dir: PathBuf,
    /// Filename prefix of the rolled files
    pub file_prefix: String,
    /// Days of rolled files to keep
    pub retention_days: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            file_prefix: "ppuclip.log".to_string(),
            retention_days: 7,
        }
    }
}

/// Keeps the non-blocking file writer alive; dropping it flushes the log.
pub struct LogGuard {
    _file_guard: WorkerGuard,
}

impl LogConfig {
    /// Install the global subscriber.
    ///
    /// Stderr carries ERROR and above; the rolling file carries DEBUG and
    /// above, adjustable through the `PPUCLIP_LOG` environment variable.
    /// Call once per process and hold the returned guard for its lifetime.
    pub fn init(&self) -> io::Result<LogGuard> {
        fs::create_dir_all(&self.dir)?;

        let file_appender = tracing_appender::rolling::daily(&self.dir, &self.file_prefix);
        let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);

        let file_filter =
            EnvFilter::try_from_env("PPUCLIP_LOG").unwrap_or_else(|_| EnvFilter::new("debug"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(false)
                    .with_filter(LevelFilter::ERROR),
            )
            .with(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_filter(file_filter),
            )
            .init();

        self.sweep_expired()?;

        Ok(LogGuard {
            _file_guard: file_guard,
        })
    }

    /// Delete rolled files that fell out of the retention window.
    fn sweep_expired(&self) -> io::Result<()> {
        let cutoff = Local::now()
            .date_naive()
            .checked_sub_days(Days::new(u64::from(self.retention_days)))
            .unwrap_or(NaiveDate::MIN);
        sweep_dir(&self.dir, &self.file_prefix, cutoff)
    }
}

/// Rolled filenames look like `{prefix}.YYYY-MM-DD`; anything else in the
/// directory is left alone.
fn sweep_dir(dir: &Path, prefix: &str, cutoff: NaiveDate) -> io::Result<()> {
    let dated_prefix = format!("{prefix}.");

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(date_part) = name.strip_prefix(&dated_prefix) else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") else {
            continue;
        };
        if date < cutoff {
            debug!(file = name, "removing expired log file");
            let _ = fs::remove_file(entry.path());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_documented_retention() {
        let config = LogConfig::default();
        assert_eq!(config.dir, PathBuf::from("logs"));
        assert_eq!(config.retention_days, 7);
    }

    #[test]
    fn sweep_removes_only_expired_matching_files() {
        let dir = TempDir::new().unwrap();
        let today = Local::now().date_naive();
        let recent = dir
            .path()
            .join(format!("ppuclip.log.{}", today.format("%Y-%m-%d")));
        let expired = dir.path().join("ppuclip.log.2024-01-01");
        let undated = dir.path().join("ppuclip.log");
        let unrelated = dir.path().join("notes.2024-01-01");
        let malformed = dir.path().join("ppuclip.log.not-a-date");
        for file in [&recent, &expired, &undated, &unrelated, &malformed] {
            fs::write(file, b"x").unwrap();
        }

        let cutoff = today.checked_sub_days(Days::new(7)).unwrap();
        sweep_dir(dir.path(), "ppuclip.log", cutoff).unwrap();

        assert!(recent.exists());
        assert!(!expired.exists(), "expired rolled file should be deleted");
        assert!(undated.exists());
        assert!(unrelated.exists());
        assert!(malformed.exists());
    }
}
