//! ffmpeg wrapper for stream clip extraction.
//!
//! This crate provides:
//! - Type-safe ffmpeg command building for HLS input
//! - Percent progress parsing from `-progress pipe:1`
//! - A poll-driven process driver with cancellation support
//! - Deterministic output naming with duplicate detection

pub mod command;
pub mod engine;
pub mod error;
pub mod output;
pub mod progress;

pub use command::FfmpegCommand;
pub use engine::Extractor;
pub use error::{EngineError, EngineResult};
pub use output::{sanitize_title, OutputPlanner, PlannedOutput};
pub use progress::ProgressTracker;
