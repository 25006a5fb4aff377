//! Downloader error types.

use thiserror::Error;

pub type DownloadResult<T> = Result<T, DownloadError>;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// The URL embeds a `currentTime` and an explicit start was also given.
    /// Never resolved silently; the caller has to drop one of the two.
    #[error(
        "start given twice: URL carries currentTime={url_secs}s and start={explicit_secs}s was also passed"
    )]
    StartConflict { url_secs: u64, explicit_secs: u64 },

    #[error("clip duration must be at least one second")]
    InvalidDuration,

    #[error("URL error: {0}")]
    Url(#[from] ppuclip_models::UrlError),

    #[error("time format error: {0}")]
    Time(#[from] ppuclip_models::TimestampError),

    #[error("Chzzk API error: {0}")]
    Chzzk(#[from] ppuclip_chzzk::ChzzkError),

    #[error("extraction error: {0}")]
    Engine(#[from] ppuclip_media::EngineError),

    #[error("output planning failed: {0}")]
    Output(#[from] std::io::Error),
}
