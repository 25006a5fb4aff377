//! Manifest discovery inside playback descriptors.

use serde_json::Value;

use ppuclip_models::tree;

use crate::error::{ChzzkError, ChzzkResult};

const MANIFEST_MARKER: &str = ".m3u8";

/// Find the stream manifest URL inside a playback descriptor.
///
/// The descriptor shape varies between live rewinds and regular VODs, so this
/// takes the first string mentioning `.m3u8` anywhere in the tree, in
/// depth-first insertion order. The first entry is the platform's preferred
/// rendition.
pub fn locate_manifest(descriptor: &Value) -> ChzzkResult<&str> {
    tree::collect_strings_containing(descriptor, MANIFEST_MARKER)
        .first()
        .copied()
        .ok_or(ChzzkError::ManifestNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_manifest_wins() {
        let descriptor = json!({
            "meta": { "videoId": "10646413" },
            "period": [{
                "adaptationSet": [
                    { "representation": [{ "path": "https://cdn/hd.m3u8?tok=1" }] },
                    { "representation": [{ "path": "https://cdn/sd.m3u8?tok=2" }] }
                ]
            }]
        });
        assert_eq!(
            locate_manifest(&descriptor).unwrap(),
            "https://cdn/hd.m3u8?tok=1"
        );
    }

    #[test]
    fn manifest_deep_in_live_rewind_shape() {
        let descriptor = json!({
            "media": [{
                "protocol": "HLS",
                "path": "https://livecloud/rewind/playlist.m3u8?session=abc"
            }]
        });
        assert_eq!(
            locate_manifest(&descriptor).unwrap(),
            "https://livecloud/rewind/playlist.m3u8?session=abc"
        );
    }

    #[test]
    fn descriptor_without_manifest_is_an_error() {
        let descriptor = json!({
            "period": [{ "path": "https://cdn/video.mpd" }]
        });
        assert!(matches!(
            locate_manifest(&descriptor),
            Err(ChzzkError::ManifestNotFound)
        ));
    }
}
