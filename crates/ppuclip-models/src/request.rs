//! Boundary types exchanged between front ends and the downloader.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::video::VideoRef;

/// A fully resolved clip extraction request.
///
/// Front ends hand this to the orchestrator after URL parsing and start-time
/// resolution; `duration_secs >= 1` is enforced there, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipRequest {
    pub video: VideoRef,
    pub start_secs: u64,
    pub duration_secs: u64,
}

impl ClipRequest {
    /// Exclusive end of the clip window.
    pub fn end_secs(&self) -> u64 {
        self.start_secs.saturating_add(self.duration_secs)
    }
}

/// The file a request produced (or was found to already have).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipArtifact {
    pub path: PathBuf,
    /// True when the file predates this request (duplicate skip).
    pub already_existed: bool,
    pub size_bytes: u64,
}

/// Terminal result of a download run.
///
/// A duplicate is a successful outcome, not an error: the requested clip is on
/// disk either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadOutcome {
    Completed(ClipArtifact),
    SkippedDuplicate(ClipArtifact),
}

impl DownloadOutcome {
    pub fn artifact(&self) -> &ClipArtifact {
        match self {
            Self::Completed(artifact) | Self::SkippedDuplicate(artifact) => artifact,
        }
    }

    pub fn was_skipped(&self) -> bool {
        matches!(self, Self::SkippedDuplicate(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_is_start_plus_duration() {
        let req = ClipRequest {
            video: VideoRef {
                id: "10646413".into(),
                embedded_start_secs: None,
            },
            start_secs: 2293,
            duration_secs: 60,
        };
        assert_eq!(req.end_secs(), 2353);
    }

    #[test]
    fn outcome_exposes_artifact_either_way() {
        let artifact = ClipArtifact {
            path: PathBuf::from("clips/clip_1.mp4"),
            already_existed: true,
            size_bytes: 1024,
        };
        let outcome = DownloadOutcome::SkippedDuplicate(artifact.clone());
        assert!(outcome.was_skipped());
        assert_eq!(outcome.artifact(), &artifact);

        let outcome = DownloadOutcome::Completed(artifact.clone());
        assert!(!outcome.was_skipped());
        assert_eq!(outcome.artifact().size_bytes, 1024);
    }
}
