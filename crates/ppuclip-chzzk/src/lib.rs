//! Chzzk VOD API client.
//!
//! Talks to the public metadata endpoint and the playback endpoint that
//! serves stream descriptors for archived videos. Neither API is published,
//! so responses are handled as schema-less JSON and every lookup is
//! best-effort; the versioned metadata route is tried newest-first.

pub mod client;
pub mod error;
pub mod manifest;

pub use client::{video_title, ChzzkClient, ChzzkConfig};
pub use error::{ChzzkError, ChzzkResult};
pub use manifest::locate_manifest;
