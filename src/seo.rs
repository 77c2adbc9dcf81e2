use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::llm::{Completion, CompletionRequest};

pub const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";

const SYSTEM_PROMPT: &str = "You are a YouTube SEO expert. Always respond with properly formatted JSON objects. \
Use \\n for newlines in descriptions.";

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```json\n?|\n?```").expect("fence pattern"));

/// Tags as sent by the client: either the raw comma-separated input or a list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Tags {
    Text(String),
    List(Vec<String>),
}

impl std::fmt::Display for Tags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tags::Text(s) => f.write_str(s),
            Tags::List(v) => f.write_str(&v.join(",")),
        }
    }
}

/// Validated model suggestions; every list is non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoSuggestions {
    pub title: Vec<String>,
    pub description: Vec<String>,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
}

/// Ask the model for SEO suggestions and validate the JSON it returns
pub async fn enhance(
    llm: &dyn Completion,
    title: &str,
    description: &str,
    tags: Option<&Tags>,
    model: &str,
) -> Result<SeoSuggestions> {
    let tags = tags.map(|t| t.to_string()).unwrap_or_default();
    debug!("Requesting SEO suggestions with {model} for title {title:?}");

    let request = CompletionRequest {
        model: model.to_string(),
        system: SYSTEM_PROMPT.to_string(),
        user: build_prompt(title, description, &tags),
        temperature: 0.7,
        max_tokens: 1024,
        top_p: None,
    };

    let response = llm
        .complete(&request)
        .await?
        .ok_or(Error::EmptyCompletion("Failed to generate suggestions"))?;

    parse_suggestions(&response)
}

/// Strip code fences, parse, validate and unescape the model output
pub fn parse_suggestions(response: &str) -> Result<SeoSuggestions> {
    let cleaned = strip_code_fences(response);

    let value: serde_json::Value = serde_json::from_str(&cleaned).map_err(|e| {
        warn!("Failed to parse model output as JSON ({e}): {cleaned}");
        Error::MalformedOutput
    })?;

    let (Some(title), Some(description), Some(tags), Some(keywords)) = (
        string_list(&value, "title"),
        string_list(&value, "description"),
        string_list(&value, "tags"),
        string_list(&value, "keywords"),
    ) else {
        return Err(Error::InvalidSuggestions);
    };

    Ok(SeoSuggestions {
        title,
        description: description.iter().map(|d| d.replace("\\n", "\n")).collect(),
        tags,
        keywords,
    })
}

/// Remove ```json / ``` markers the model wraps around its JSON
pub fn strip_code_fences(response: &str) -> String {
    CODE_FENCE.replace_all(response, "").trim().to_string()
}

fn string_list(value: &serde_json::Value, key: &str) -> Option<Vec<String>> {
    let items = value.get(key)?.as_array()?;
    if items.is_empty() {
        return None;
    }
    items.iter().map(|v| v.as_str().map(str::to_string)).collect()
}

fn build_prompt(title: &str, description: &str, tags: &str) -> String {
    format!(
        r#"As a YouTube SEO expert, analyze and enhance this video metadata for maximum visibility:

Title: "{title}"
Description: "{description}"
Tags: "{tags}"

Provide optimization suggestions following YouTube's current best practices. Focus on creating:

1. Engaging titles that drive clicks (45-70 characters)
2. A comprehensive, well-structured description that includes:
   - An engaging hook in the first 2-3 lines
   - Main value points and content overview
   - Relevant timestamps (if applicable)
   - Call-to-action (subscribe, like, etc.)
   - Social media links
   - 3-5 relevant hashtags

3. Strategic tags and keywords that boost discoverability

Format the description with proper sections and spacing. Use \n for newlines. Example format:

🎥 [Engaging Hook / Main Value Proposition]\n\n
In this video, you'll discover:\n
• [Key Point 1]\n
• [Key Point 2]\n
• [Key Point 3]\n\n
🕒 TIMESTAMPS:\n
00:00 - Introduction\n
02:30 - Main Topic 1\n
05:45 - Main Topic 2\n\n
📱 CONNECT WITH ME:\n
Instagram: @handle\n
Twitter: @handle\n
Website: example.com\n\n
#Hashtag1 #Hashtag2 #Hashtag3

Respond with a JSON object in this format:
{{
  "title": [
    "Primary SEO-optimized title",
    "Alternative engaging title",
    "Question-based title variation"
  ],
  "description": [
    "Full optimized description with all sections",
    "Alternative description with different emphasis",
    "Condensed version for sharing"
  ],
  "tags": [
    "primary-keyword",
    "secondary-keyword",
    "long-tail-keyword",
    "related-term",
    "niche-specific",
    "broader-topic"
  ],
  "keywords": [
    "trending-term-1",
    "trending-term-2",
    "trending-term-3",
    "trending-term-4"
  ]
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    const VALID: &str = r#"{
        "title": ["Best Title", "Other Title"],
        "description": ["Hook\\n\\nMore", "Short"],
        "tags": ["rust", "tutorial"],
        "keywords": ["rust lang"]
    }"#;

    struct FakeLlm(Option<String>);

    #[async_trait]
    impl Completion for FakeLlm {
        async fn complete(&self, request: &CompletionRequest) -> eyre::Result<Option<String>> {
            assert!(request.user.contains("Title: \"My video\""));
            assert!(request.user.contains("Tags: \"a,b\""));
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fences("```{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_parse_valid_suggestions() {
        let fenced = format!("```json\n{VALID}\n```");
        let s = parse_suggestions(&fenced).unwrap();
        assert_eq!(s.title, vec!["Best Title", "Other Title"]);
        assert_eq!(s.description[0], "Hook\n\nMore");
        assert_eq!(s.tags, vec!["rust", "tutorial"]);
        assert_eq!(s.keywords, vec!["rust lang"]);
    }

    #[test]
    fn test_missing_keywords_is_invalid() {
        let json = r#"{"title":["t"],"description":["d"],"tags":["x"]}"#;
        assert!(matches!(parse_suggestions(json), Err(Error::InvalidSuggestions)));
    }

    #[test]
    fn test_empty_tags_is_invalid() {
        let json = r#"{"title":["t"],"description":["d"],"tags":[],"keywords":["k"]}"#;
        assert!(matches!(parse_suggestions(json), Err(Error::InvalidSuggestions)));
    }

    #[test]
    fn test_non_list_value_is_invalid() {
        let json = r#"{"title":"t","description":["d"],"tags":["x"],"keywords":["k"]}"#;
        assert!(matches!(parse_suggestions(json), Err(Error::InvalidSuggestions)));
    }

    #[test]
    fn test_non_json_is_malformed() {
        let err = parse_suggestions("Sure! Here are some ideas: ...").unwrap_err();
        assert!(matches!(err, Error::MalformedOutput));
        assert_eq!(err.to_string(), "Failed to parse suggestions");
    }

    #[test]
    fn test_tags_display() {
        assert_eq!(Tags::Text("a, b".to_string()).to_string(), "a, b");
        assert_eq!(Tags::List(vec!["a".to_string(), "b".to_string()]).to_string(), "a,b");
    }

    #[test]
    fn test_prompt_embeds_inputs_verbatim() {
        let prompt = build_prompt("My \"title\"", "Desc", "a,b");
        assert!(prompt.contains("Title: \"My \"title\"\""));
        assert!(prompt.contains("Description: \"Desc\""));
        assert!(prompt.contains(r"Use \n for newlines."));
        assert!(prompt.contains("\"keywords\": ["));
    }

    #[tokio::test]
    async fn test_enhance() {
        let llm = FakeLlm(Some(VALID.to_string()));
        let tags = Tags::List(vec!["a".to_string(), "b".to_string()]);
        let s = enhance(&llm, "My video", "About things", Some(&tags), DEFAULT_MODEL)
            .await
            .unwrap();
        assert_eq!(s.title[0], "Best Title");
    }

    #[tokio::test]
    async fn test_enhance_empty_reply() {
        let llm = FakeLlm(None);
        let tags = Tags::Text("a,b".to_string());
        let err = enhance(&llm, "My video", "d", Some(&tags), DEFAULT_MODEL).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate suggestions");
    }
}
