use async_trait::async_trait;
use eyre::{Result, bail};
use log::debug;
use serde::Serialize;

/// A single chat-completion call
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: Option<f32>,
}

/// Text-generation backend.
///
/// `Ok(None)` means the backend answered but produced no content.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>>;
}

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";

/// HTTP client for OpenAI-compatible chat completions, with Anthropic's
/// Messages API used for `claude*` models
pub struct ChatClient {
    client: reqwest::Client,
    completion_url: String,
    api_key_env: String,
}

impl ChatClient {
    pub fn new(client: reqwest::Client, completion_url: impl Into<String>, api_key_env: impl Into<String>) -> Self {
        Self {
            client,
            completion_url: completion_url.into(),
            api_key_env: api_key_env.into(),
        }
    }

    async fn complete_openai(&self, request: &CompletionRequest) -> Result<Option<String>> {
        let api_key = std::env::var(&self.api_key_env)
            .map_err(|_| eyre::eyre!("{} environment variable not set", self.api_key_env))?;

        debug!("Requesting completion from {} with model {}", self.completion_url, request.model);

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": [
                {
                    "role": "system",
                    "content": request.system
                },
                {
                    "role": "user",
                    "content": request.user
                }
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": false
        });
        if let Some(top_p) = request.top_p {
            body["top_p"] = serde_json::json!(top_p);
        }

        let resp = self
            .client
            .post(&self.completion_url)
            .bearer_auth(&api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("completion API returned {status}: {body}");
        }

        let json: serde_json::Value = resp.json().await?;
        Ok(extract_openai_text(&json))
    }

    async fn complete_anthropic(&self, request: &CompletionRequest) -> Result<Option<String>> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            eyre::eyre!("ANTHROPIC_API_KEY environment variable not set (required for Claude models)")
        })?;

        debug!("Requesting completion from Anthropic API with model {}", request.model);

        let mut body = serde_json::json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "system": request.system,
            "messages": [
                {
                    "role": "user",
                    "content": request.user
                }
            ]
        });
        if let Some(top_p) = request.top_p {
            body["top_p"] = serde_json::json!(top_p);
        }

        let resp = self
            .client
            .post(ANTHROPIC_URL)
            .header("x-api-key", &api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("Anthropic API returned {status}: {body}");
        }

        let json: serde_json::Value = resp.json().await?;
        Ok(extract_anthropic_text(&json))
    }
}

#[async_trait]
impl Completion for ChatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>> {
        if is_anthropic_model(&request.model) {
            self.complete_anthropic(request).await
        } else {
            self.complete_openai(request).await
        }
    }
}

fn is_anthropic_model(model: &str) -> bool {
    model.starts_with("claude")
}

fn extract_anthropic_text(json: &serde_json::Value) -> Option<String> {
    let content = json.get("content")?.as_array()?;
    let text: String = content
        .iter()
        .filter_map(|block| {
            if block.get("type")?.as_str()? == "text" {
                block.get("text")?.as_str()
            } else {
                None
            }
        })
        .collect();
    (!text.is_empty()).then_some(text)
}

fn extract_openai_text(json: &serde_json::Value) -> Option<String> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_anthropic_model() {
        assert!(is_anthropic_model("claude-sonnet-4-6"));
        assert!(!is_anthropic_model("llama3-8b-8192"));
        assert!(!is_anthropic_model("mixtral-8x7b-32768"));
    }

    #[test]
    fn test_extract_anthropic_text() {
        let json = serde_json::json!({
            "content": [
                {"type": "text", "text": "Here is "},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "the summary."}
            ]
        });
        assert_eq!(extract_anthropic_text(&json).as_deref(), Some("Here is the summary."));
    }

    #[test]
    fn test_extract_anthropic_text_empty() {
        let json = serde_json::json!({"content": []});
        assert!(extract_anthropic_text(&json).is_none());
    }

    #[test]
    fn test_extract_openai_text() {
        let json = serde_json::json!({
            "choices": [
                {
                    "message": {
                        "role": "assistant",
                        "content": "Summary of the video."
                    }
                }
            ]
        });
        assert_eq!(extract_openai_text(&json).as_deref(), Some("Summary of the video."));
    }

    #[test]
    fn test_extract_openai_text_missing_content() {
        assert!(extract_openai_text(&serde_json::json!({"choices": []})).is_none());
        let json = serde_json::json!({"choices": [{"message": {"role": "assistant", "content": ""}}]});
        assert!(extract_openai_text(&json).is_none());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_an_error() {
        let client = ChatClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9/v1/chat/completions",
            "YTKIT_TEST_UNSET_API_KEY",
        );
        let request = CompletionRequest {
            model: "llama3-8b-8192".to_string(),
            system: "s".to_string(),
            user: "u".to_string(),
            temperature: 0.5,
            max_tokens: 16,
            top_p: None,
        };
        let err = client.complete(&request).await.unwrap_err();
        assert!(err.to_string().contains("YTKIT_TEST_UNSET_API_KEY"));
    }
}
