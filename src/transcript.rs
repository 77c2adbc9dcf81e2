use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::TranscriptSegment;

/// A caption fragment ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedSegment {
    pub text: String,
    pub timestamp: String,
}

static NAMED_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#39|apos|quot|lt|gt);").expect("entity pattern"));

/// Decode the handful of HTML entities YouTube leaves in caption text.
///
/// `&amp;` must be collapsed first so double-encoded input such as
/// `&amp;#39;` resolves to `'`. The remaining entities are then resolved in
/// a single pass, so `&amp;amp;` only ever loses one level.
pub fn decode_entities(text: &str) -> String {
    let text = text.replace("&amp;", "&");
    NAMED_ENTITY
        .replace_all(&text, |caps: &Captures| match &caps[1] {
            "#39" | "apos" => "'".to_string(),
            "quot" => "\"".to_string(),
            "lt" => "<".to_string(),
            "gt" => ">".to_string(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Format seconds as `MM:SS`.
///
/// There is no hour component: an hour and a minute renders as `61:01`.
/// NaN, infinite and negative input degrade to `00:00`.
pub fn format_timestamp(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }
    let minutes = (seconds / 60.0).floor() as u64;
    let remaining = (seconds % 60.0).floor() as u64;
    format!("{minutes:02}:{remaining:02}")
}

/// Map raw segments to display segments, one-to-one and in order
pub fn normalize(segments: &[TranscriptSegment]) -> Vec<NormalizedSegment> {
    segments
        .iter()
        .map(|s| NormalizedSegment {
            text: decode_entities(&s.text),
            timestamp: format_timestamp(s.offset_seconds()),
        })
        .collect()
}

/// Keep segments whose text contains `query`, ignoring case
pub fn search(segments: Vec<NormalizedSegment>, query: &str) -> Vec<NormalizedSegment> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return segments;
    }
    segments
        .into_iter()
        .filter(|s| s.text.to_lowercase().contains(&query))
        .collect()
}

/// Join decoded segment text into one block for summarization
pub fn full_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| decode_entities(&s.text))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str, start: f64) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start: Some(start),
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_double_encoded_apostrophe() {
        assert_eq!(decode_entities("&amp;#39;"), "'");
        assert_eq!(decode_entities("it&amp;#39;s a &amp;quot;test&amp;quot;"), "it's a \"test\"");
    }

    #[test]
    fn test_decode_single_level_of_amp() {
        assert_eq!(decode_entities("a &amp;amp; b"), "a &amp; b");
    }

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(decode_entities("&lt;b&gt; &apos;x&apos; &#39;y&#39;"), "<b> 'x' 'y'");
    }

    #[test]
    fn test_decode_leaves_unknown_entities() {
        assert_eq!(decode_entities("caf&eacute; &nbsp;"), "caf&eacute; &nbsp;");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(65.0), "01:05");
        assert_eq!(format_timestamp(59.999), "00:59");
        assert_eq!(format_timestamp(f64::NAN), "00:00");
        assert_eq!(format_timestamp(3661.0), "61:01");
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(-5.0), "00:00");
        assert_eq!(format_timestamp(f64::INFINITY), "00:00");
    }

    #[test]
    fn test_normalize_preserves_order() {
        let raw = vec![seg("first", 0.5), seg("second &amp;amp; more", 65.2), seg("third", 3661.0)];
        let out = normalize(&raw);
        assert_eq!(out.len(), raw.len());
        assert_eq!(
            out,
            vec![
                NormalizedSegment {
                    text: "first".to_string(),
                    timestamp: "00:00".to_string()
                },
                NormalizedSegment {
                    text: "second &amp; more".to_string(),
                    timestamp: "01:05".to_string()
                },
                NormalizedSegment {
                    text: "third".to_string(),
                    timestamp: "61:01".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let segments = normalize(&[seg("Hello World", 0.0), seg("goodbye", 1.0), seg("WORLD peace", 2.0)]);
        let hits = search(segments, "world");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "Hello World");
        assert_eq!(hits[1].text, "WORLD peace");
    }

    #[test]
    fn test_search_blank_query_keeps_everything() {
        let segments = normalize(&[seg("a", 0.0), seg("b", 1.0)]);
        assert_eq!(search(segments, "  ").len(), 2);
    }

    #[test]
    fn test_full_text() {
        assert_eq!(full_text(&[seg("it&amp;#39;s", 0.0), seg("fine", 1.0)]), "it's fine");
    }
}
