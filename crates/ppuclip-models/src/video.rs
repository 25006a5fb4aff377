//! Source URL resolution.
//!
//! A share URL looks like `https://chzzk.naver.com/video/10646413?currentTime=2293`:
//! the video id is the last non-empty path segment and `currentTime` is an
//! optional playback offset the site embeds when a viewer copies a link
//! mid-watch.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Query parameter carrying the embedded playback offset.
const CURRENT_TIME_PARAM: &str = "currentTime";

/// Errors that can occur while resolving a source URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("invalid URL: {0}")]
    Invalid(String),

    #[error("no video id in URL path")]
    MissingVideoId,

    #[error("currentTime is not a whole number of seconds: '{0}'")]
    BadCurrentTime(String),
}

/// A resolved reference to an archived video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    /// Platform video id (numeric today, treated as opaque)
    pub id: String,
    /// Playback offset embedded in the share URL, if any
    pub embedded_start_secs: Option<u64>,
}

impl VideoRef {
    /// Resolve a share URL into a video reference.
    ///
    /// Pure, no I/O. The id is the last non-empty path segment; trailing
    /// slashes are ignored. A `currentTime` parameter that is present but not
    /// a non-negative integer fails with [`UrlError::BadCurrentTime`]; an
    /// absent (or empty-valued) parameter yields no embedded offset.
    ///
    /// # Examples
    /// ```
    /// use ppuclip_models::VideoRef;
    /// let v = VideoRef::parse("https://chzzk.naver.com/video/10646413?currentTime=2293").unwrap();
    /// assert_eq!(v.id, "10646413");
    /// assert_eq!(v.embedded_start_secs, Some(2293));
    /// ```
    pub fn parse(url: &str) -> Result<Self, UrlError> {
        let parsed = Url::parse(url.trim()).map_err(|e| UrlError::Invalid(e.to_string()))?;

        let id = parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            .map(str::to_string)
            .ok_or(UrlError::MissingVideoId)?;
        if id.is_empty() {
            return Err(UrlError::MissingVideoId);
        }

        // First occurrence wins when the parameter is repeated.
        let embedded_start_secs = match parsed
            .query_pairs()
            .find(|(key, value)| key == CURRENT_TIME_PARAM && !value.is_empty())
        {
            Some((_, value)) => Some(
                value
                    .parse::<u64>()
                    .map_err(|_| UrlError::BadCurrentTime(value.into_owned()))?,
            ),
            None => None,
        };

        Ok(Self {
            id,
            embedded_start_secs,
        })
    }
}

/// Remove the `currentTime` parameter from a share URL, keeping everything
/// else intact.
///
/// Front ends call this after absorbing the embedded offset into their own
/// start field, so the displayed URL no longer carries a conflicting time.
pub fn strip_current_time(url: &str) -> Result<String, UrlError> {
    let mut parsed = Url::parse(url.trim()).map_err(|e| UrlError::Invalid(e.to_string()))?;

    let remaining: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| key != CURRENT_TIME_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if remaining.is_empty() {
        parsed.set_query(None);
    } else {
        parsed
            .query_pairs_mut()
            .clear()
            .extend_pairs(remaining.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    Ok(parsed.into())
}
