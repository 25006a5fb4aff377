//! Clip download orchestration.
//!
//! One [`ClipDownloader::run`] call takes a share URL all the way to a clip
//! file: resolve the video, pick the effective start, fetch metadata, resolve
//! the playback descriptor, locate the stream manifest, plan the output path
//! and drive the extraction engine. Runs share no mutable state, so a host
//! may execute several concurrently as long as the requests map to distinct
//! output paths.

use std::path::PathBuf;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use ppuclip_chzzk::{locate_manifest, video_title, ChzzkClient, ChzzkConfig};
use ppuclip_media::{Extractor, OutputPlanner, PlannedOutput};
use ppuclip_models::{ClipArtifact, ClipRequest, DownloadOutcome, VideoRef};

use crate::error::{DownloadError, DownloadResult};

/// One download request, the way front ends hand it over.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Share URL as pasted by the user
    pub url: String,
    /// Explicit start in seconds; conflicts with an embedded `currentTime`
    pub start_override: Option<u64>,
    /// Clip length in seconds
    pub duration_secs: u64,
    /// Optional destination file (`.mp4`) or directory
    pub output_override: Option<PathBuf>,
}

/// Downloader configuration.
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// Directory clips land in when the request has no override
    pub output_dir: PathBuf,
    /// Engine binary name or path
    pub ffmpeg_binary: String,
    /// API client settings
    pub chzzk: ChzzkConfig,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("clips"),
            ffmpeg_binary: "ffmpeg".to_string(),
            chzzk: ChzzkConfig::default(),
        }
    }
}

impl DownloaderConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            output_dir: std::env::var("PPUCLIP_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("clips")),
            ffmpeg_binary: std::env::var("PPUCLIP_FFMPEG")
                .unwrap_or_else(|_| "ffmpeg".to_string()),
            chzzk: ChzzkConfig::from_env(),
        }
    }
}

/// Orchestrates a download from share URL to clip file.
pub struct ClipDownloader {
    client: ChzzkClient,
    planner: OutputPlanner,
    extractor: Extractor,
}

impl ClipDownloader {
    /// Create a new downloader.
    pub fn new(config: DownloaderConfig) -> DownloadResult<Self> {
        let extractor = Extractor::new(
            &config.ffmpeg_binary,
            &config.chzzk.user_agent,
            &config.chzzk.referer,
        );
        Ok(Self {
            client: ChzzkClient::new(config.chzzk)?,
            planner: OutputPlanner::new(config.output_dir),
            extractor,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> DownloadResult<Self> {
        Self::new(DownloaderConfig::from_env())
    }

    /// Attach a cancellation signal; flipping it to `true` kills a running
    /// extraction.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.extractor = self.extractor.with_cancel(cancel_rx);
        self
    }

    /// Run one download to completion.
    ///
    /// `on_progress` receives extraction percents as they advance. A clip
    /// that already exists at the planned path is a successful
    /// [`DownloadOutcome::SkippedDuplicate`], not an error. Start-time and
    /// duration validation happen before any network traffic.
    pub async fn run<F>(
        &self,
        request: &DownloadRequest,
        on_progress: F,
    ) -> DownloadResult<DownloadOutcome>
    where
        F: Fn(u8),
    {
        let video = VideoRef::parse(&request.url)?;
        let start_secs = effective_start(&video, request.start_override)?;
        if request.duration_secs == 0 {
            return Err(DownloadError::InvalidDuration);
        }
        let clip = ClipRequest {
            video,
            start_secs,
            duration_secs: request.duration_secs,
        };

        let meta = self.client.fetch_metadata(&clip.video.id).await?;
        let title = video_title(&meta).unwrap_or(&clip.video.id).to_string();
        info!(video_id = %clip.video.id, %title, "resolved video");
        info!(
            start_secs = clip.start_secs,
            duration_secs = clip.duration_secs,
            "clip window"
        );

        let descriptor = self.client.playback_descriptor(&meta).await?;
        let manifest_url = locate_manifest(&descriptor)?;
        debug!(%manifest_url, "located stream manifest");

        let planned = self
            .planner
            .plan_with_override(
                request.output_override.as_deref(),
                &title,
                clip.start_secs,
                clip.duration_secs,
            )
            .await?;
        let target = match planned {
            PlannedOutput::Exists(artifact) => {
                warn!(path = %artifact.path.display(), "identical clip already on disk, skipping");
                return Ok(DownloadOutcome::SkippedDuplicate(artifact));
            }
            PlannedOutput::New(path) => path,
        };
        info!(path = %target.display(), "downloading clip");

        self.extractor
            .download(
                manifest_url,
                &target,
                clip.start_secs,
                clip.duration_secs,
                on_progress,
            )
            .await?;

        let size_bytes = tokio::fs::metadata(&target)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        info!(path = %target.display(), size_bytes, "clip saved");

        Ok(DownloadOutcome::Completed(ClipArtifact {
            path: target,
            already_existed: false,
            size_bytes,
        }))
    }
}

/// Pick the start the clip window actually uses.
///
/// An explicit start wins over nothing, an embedded `currentTime` wins over
/// nothing, and both at once is a conflict the caller must resolve.
fn effective_start(video: &VideoRef, start_override: Option<u64>) -> DownloadResult<u64> {
    match (video.embedded_start_secs, start_override) {
        (Some(url_secs), Some(explicit_secs)) => {
            Err(DownloadError::StartConflict {
                url_secs,
                explicit_secs,
            })
        }
        (None, Some(explicit)) => Ok(explicit),
        (Some(embedded), None) => Ok(embedded),
        (None, None) => Ok(0),
    }
}
