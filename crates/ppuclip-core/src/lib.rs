//! Chzzk clip download orchestration.
//!
//! This crate provides:
//! - The one-call downloader front ends build on
//! - Start-time conflict and duration validation ahead of any network use
//! - Duplicate-aware output handling (a re-request is a skip, not an error)
//! - Host log setup with an error console stream and a rolling debug file

pub mod downloader;
pub mod error;
pub mod logging;

pub use downloader::{ClipDownloader, DownloadRequest, DownloaderConfig};
pub use error::{DownloadError, DownloadResult};
pub use logging::{LogConfig, LogGuard};

pub use ppuclip_models::{ClipArtifact, DownloadOutcome};
