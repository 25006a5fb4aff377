//! HTTP client for the Chzzk metadata and playback APIs.

use std::time::Duration;

use reqwest::{header, Client};
use serde_json::Value;
use tracing::{debug, warn};

use ppuclip_models::tree;

use crate::error::{ChzzkError, ChzzkResult};

const DEFAULT_API_BASE: &str = "https://api.chzzk.naver.com";
const DEFAULT_PLAYBACK_BASE: &str = "https://apis.naver.com/neonplayer";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
const DEFAULT_REFERER: &str = "https://chzzk.naver.com/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Metadata API versions, newest first. Each is tried exactly once.
const METADATA_VERSIONS: [&str; 2] = ["v3", "v2"];

/// How much of an error body to keep in diagnostics.
const BODY_SNIPPET_LEN: usize = 200;

/// Configuration for the Chzzk client.
#[derive(Debug, Clone)]
pub struct ChzzkConfig {
    /// Base URL of the metadata API
    pub api_base: String,
    /// Base URL of the playback (neonplayer) API
    pub playback_base: String,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Referer sent with every request
    pub referer: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ChzzkConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            playback_base: DEFAULT_PLAYBACK_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ChzzkConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            api_base: std::env::var("PPUCLIP_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            playback_base: std::env::var("PPUCLIP_PLAYBACK_BASE")
                .unwrap_or_else(|_| DEFAULT_PLAYBACK_BASE.to_string()),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            timeout: Duration::from_secs(
                std::env::var("PPUCLIP_HTTP_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }
}

/// Client for the Chzzk VOD APIs.
pub struct ChzzkClient {
    http: Client,
    config: ChzzkConfig,
}

impl ChzzkClient {
    /// Create a new client.
    pub fn new(config: ChzzkConfig) -> ChzzkResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ChzzkError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ChzzkResult<Self> {
        Self::new(ChzzkConfig::from_env())
    }

    /// Fetch metadata for a video, trying each API version newest-first.
    ///
    /// The conventional `content` envelope is unwrapped when present. A
    /// version that answers with a non-success status or an unparseable body
    /// counts as failed and the next one is tried; when every version fails
    /// the error carries the last observed status and body snippet.
    pub async fn fetch_metadata(&self, video_id: &str) -> ChzzkResult<Value> {
        let mut detail = String::from("no version attempted");

        for version in METADATA_VERSIONS {
            let url = format!(
                "{}/service/{}/videos/{}",
                self.config.api_base, version, video_id
            );
            debug!(video_id, version, "requesting video metadata");

            match self.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    match response.json::<Value>().await {
                        Ok(body) => return Ok(unwrap_content(body)),
                        Err(e) => {
                            warn!(video_id, version, error = %e, "metadata body unreadable");
                            detail = format!("{version} body unreadable: {e}");
                        }
                    }
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    warn!(video_id, version, %status, "metadata endpoint refused");
                    detail = format!(
                        "{version} returned {status}: {}",
                        truncate(&body, BODY_SNIPPET_LEN)
                    );
                }
                Err(e) => {
                    warn!(video_id, version, error = %e, "metadata request failed");
                    detail = format!("{version} failed: {e}");
                }
            }
        }

        Err(ChzzkError::MetadataUnavailable {
            video_id: video_id.to_string(),
            detail,
        })
    }

    /// Resolve the playback descriptor for a video from its metadata.
    ///
    /// Archived live rewinds embed the whole descriptor as a JSON string in
    /// the metadata; regular VODs require one authenticated call to the
    /// playback endpoint using the session key from the metadata. An embedded
    /// descriptor that fails to parse is fatal, never a reason to fall
    /// through to the VOD path.
    pub async fn playback_descriptor(&self, meta: &Value) -> ChzzkResult<Value> {
        if let Some(embedded) = meta
            .get("liveRewindPlaybackJson")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            debug!("using embedded live-rewind playback descriptor");
            return serde_json::from_str(embedded).map_err(ChzzkError::CorruptPlayback);
        }

        let session_key = ["inKey", "inkey"]
            .iter()
            .find_map(|name| meta.get(*name).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| tree::string_at(meta, "inKey").map(str::to_string))
            .ok_or(ChzzkError::MissingField("inKey"))?;

        let canonical_id = ["videoId", "id"]
            .iter()
            .find_map(|name| meta.get(*name).and_then(id_string))
            .or_else(|| tree::find_first(meta, "videoId").and_then(id_string))
            .ok_or(ChzzkError::MissingField("videoId"))?;

        let url = format!(
            "{}/vodplay/v2/playback/{}",
            self.config.playback_base, canonical_id
        );
        debug!(video_id = %canonical_id, "requesting playback descriptor");

        let response = self
            .get(&url)
            .query(&[
                ("key", session_key.as_str()),
                ("env", "real"),
                ("lc", "ko"),
                ("cpl", "ko"),
                ("sid", "2099"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChzzkError::PlaybackRequest {
                status,
                body: truncate(&body, BODY_SNIPPET_LEN).to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(ChzzkError::CorruptPlayback)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header(header::USER_AGENT, &self.config.user_agent)
            .header(header::REFERER, &self.config.referer)
    }
}

/// Display title of a video, if the metadata carries one.
///
/// Callers fall back to the video id.
pub fn video_title(meta: &Value) -> Option<&str> {
    ["videoTitle", "title"]
        .iter()
        .find_map(|name| meta.get(*name).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
}

fn unwrap_content(body: Value) -> Value {
    match body.get("content") {
        Some(content) if !content.is_null() => content.clone(),
        _ => body,
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
