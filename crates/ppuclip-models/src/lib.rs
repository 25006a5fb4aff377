//! Shared data models for the ppuclip downloader.
//!
//! This crate provides the pure, I/O-free pieces of the pipeline:
//! - Source URL resolution ([`VideoRef`])
//! - Clock-time parsing and formatting ([`timestamp`])
//! - Depth-first search helpers over schema-less JSON trees ([`tree`])
//! - The request/outcome types crossing the front-end boundary ([`request`])

pub mod request;
pub mod timestamp;
pub mod tree;
pub mod video;

// Re-export common types
pub use request::{ClipArtifact, ClipRequest, DownloadOutcome};
pub use timestamp::{format_compact, format_hms, parse_hms, TimestampError};
pub use video::{strip_current_time, UrlError, VideoRef};
