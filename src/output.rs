use crate::transcript::NormalizedSegment;

/// Render segments one per line, optionally prefixed with `[MM:SS]`
pub fn render_text(segments: &[NormalizedSegment], timestamps: bool) -> String {
    segments
        .iter()
        .map(|s| {
            if timestamps {
                format!("[{}] {}", s.timestamp, s.text)
            } else {
                s.text.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
