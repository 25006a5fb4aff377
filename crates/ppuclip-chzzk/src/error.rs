//! Chzzk client error types.

use thiserror::Error;

pub type ChzzkResult<T> = Result<T, ChzzkError>;

#[derive(Debug, Error)]
pub enum ChzzkError {
    /// Every metadata API version was tried and none produced a usable body.
    #[error("metadata unavailable for video {video_id}: {detail}")]
    MetadataUnavailable { video_id: String, detail: String },

    /// Metadata carries no value for a field the playback call needs.
    #[error("no '{0}' found in video metadata")]
    MissingField(&'static str),

    /// A playback descriptor was delivered but does not parse as JSON.
    #[error("playback descriptor does not parse: {0}")]
    CorruptPlayback(#[source] serde_json::Error),

    /// The playback endpoint answered with a non-success status.
    #[error("playback request rejected with {status}: {body}")]
    PlaybackRequest {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The playback descriptor contains no `.m3u8` manifest URL.
    #[error("no .m3u8 manifest in playback descriptor")]
    ManifestNotFound,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
