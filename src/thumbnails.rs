use serde::Serialize;

use crate::VideoId;

const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";

/// Thumbnail URLs for every quality tier YouTube publishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbnailSet {
    pub default: String,
    pub medium: String,
    pub high: String,
    pub standard: String,
    pub maxres: String,
}

impl ThumbnailSet {
    /// Build the fixed CDN URLs; no network lookup is involved
    pub fn for_video(video_id: &VideoId) -> Self {
        let url = |file: &str| format!("{THUMBNAIL_BASE}/{video_id}/{file}.jpg");
        Self {
            default: url("default"),
            medium: url("mqdefault"),
            high: url("hqdefault"),
            standard: url("sddefault"),
            maxres: url("maxresdefault"),
        }
    }
}
