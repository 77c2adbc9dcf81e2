pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod seo;
pub mod server;
pub mod summarize;
pub mod thumbnails;
pub mod transcript;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

pub use error::Error;

/// YouTube's opaque video key, as captured from a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single caption fragment as received from upstream.
///
/// Upstream sources disagree on the name of the offset field, so both
/// `offset` and `start` are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    #[serde(default)]
    pub offset: Option<f64>,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl TranscriptSegment {
    /// Start of the segment in seconds: `offset`, then `start`, then zero.
    ///
    /// A zero or NaN `offset` counts as missing and falls through to `start`.
    pub fn offset_seconds(&self) -> f64 {
        self.offset
            .filter(|o| *o != 0.0 && !o.is_nan())
            .or(self.start)
            .unwrap_or(0.0)
    }
}

static VIDEO_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([^&\n?#]+)").expect("watch pattern"),
        Regex::new(r"youtube\.com/embed/([^&\n?#]+)").expect("embed pattern"),
        Regex::new(r"youtube\.com/v/([^&\n?#]+)").expect("v pattern"),
    ]
});

/// Extract the video ID from a watch, youtu.be, embed or /v/ URL.
///
/// Patterns are tried in that order and the first capture is returned as-is;
/// the capture is not checked against the 11-character key format.
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| VideoId(caps[1].to_string()))
}
