//! Error types for clip extraction.

use thiserror::Error;

/// Result type for extraction operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while driving the extraction engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("ffmpeg not found in PATH")]
    EngineNotFound,

    /// The engine exited non-zero. Never retried: stream manifests expire
    /// quickly and a partial output file may already exist.
    #[error("ffmpeg exited with status {exit_code:?}: {stderr}")]
    EngineFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("extraction cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Create an engine failure from an exit status and drained stderr.
    pub fn engine_failed(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::EngineFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }
}
