use log::debug;

use crate::error::{Error, Result};
use crate::llm::{Completion, CompletionRequest};

pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

const SYSTEM_PROMPT: &str = "When summarizing YouTube videos: \
1) Begin with a brief introduction that captures the video's topic and purpose, using an emoji to set the tone. \
2) Present main points using bullet points with emojis. \
3) Provide a relatable analogy. \
4) List important keywords. \
5) End with a key takeaway. \
Keep the format clean and avoid using any special formatting characters like asterisks or underscores. \
Use clear section headers like 'Main Points:' and 'Keywords:' without any special formatting.";

/// Summarize transcript text and strip any emphasis markers from the reply
pub async fn summarize(llm: &dyn Completion, transcript_text: &str, model: &str) -> Result<String> {
    debug!("Summarizing {} chars of transcript with {model}", transcript_text.len());

    let request = CompletionRequest {
        model: model.to_string(),
        system: SYSTEM_PROMPT.to_string(),
        user: transcript_text.to_string(),
        temperature: 0.5,
        max_tokens: 1024,
        top_p: Some(1.0),
    };

    let text = llm
        .complete(&request)
        .await?
        .ok_or(Error::EmptyCompletion("Failed to generate summary"))?;

    let summary = clean_summary_text(&text);
    if summary.is_empty() {
        return Err(Error::EmptyCompletion("Failed to generate summary"));
    }
    Ok(summary)
}

/// Remove `**bold**` markers, then any stray `*`, then surrounding whitespace
pub fn clean_summary_text(text: &str) -> String {
    text.replace("**", "").replace('*', "").trim().to_string()
}
