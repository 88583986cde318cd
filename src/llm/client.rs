//! Non-streaming chat client for Ollama-compatible endpoints.

use crate::config::LlmConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

/// A model that turns a system prompt and a user prompt into a reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;

    fn model_name(&self) -> &str;
}

/// Message in the chat history.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Ollama chat API request.
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f64,
    num_predict: u32,
}

/// Ollama chat API response.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client bound to one agent's model settings.
///
/// The HTTP client is built on the first request, so a construction failure
/// is reported by the handler that needed it.
pub struct LlmClient {
    config: LlmConfig,
    http_client: OnceLock<reqwest::Client>,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            config,
            http_client: OnceLock::new(),
        }
    }

    fn http_client(&self) -> Result<&reqwest::Client> {
        if let Some(client) = self.http_client.get() {
            return Ok(client);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(self.http_client.get_or_init(|| client))
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let url = self.chat_url();

        let request = OllamaChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        debug!(
            "Sending {} prompt chars to {} ({})",
            prompt.len(),
            url,
            self.config.model
        );

        let response = self
            .http_client()?
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow::anyhow!("Request timed out after {}s", self.config.timeout_seconds)
                } else if e.is_connect() {
                    anyhow::anyhow!(
                        "Cannot connect to LLM at {}. Is Ollama running?",
                        self.config.base_url
                    )
                } else {
                    anyhow::anyhow!("Failed to send request: {}", e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("LLM API error {}: {}", status, body));
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .context("Failed to parse LLM response")?;

        info!(
            "{} replied with {} chars",
            self.config.model,
            chat_response.message.content.len()
        );

        Ok(chat_response.message.content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Remove a surrounding ```` ```markdown ```` fence if the model added one.
pub fn strip_markdown_fence(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed.to_string();
    };

    // Drop the info string ("markdown", "md", ...) on the opening line.
    match body.split_once('\n') {
        Some((info, inner)) if !info.trim().contains(' ') => inner.trim().to_string(),
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markdown_fence() {
        assert_eq!(strip_markdown_fence("# Title\n\nBody"), "# Title\n\nBody");
        assert_eq!(
            strip_markdown_fence("```markdown\n# Title\n\nBody\n```"),
            "# Title\n\nBody"
        );
        assert_eq!(strip_markdown_fence("```\n# Title\n```\n"), "# Title");
        assert_eq!(
            strip_markdown_fence("```rust\nfn main() {}\n``` trailing"),
            "```rust\nfn main() {}\n``` trailing"
        );
    }

    #[test]
    fn test_chat_url_trims_slash() {
        let client = LlmClient::new(LlmConfig {
            base_url: "http://localhost:11434/".to_string(),
            ..LlmConfig::default()
        });
        assert_eq!(client.chat_url(), "http://localhost:11434/api/chat");
        assert_eq!(client.model_name(), "llama3.2:latest");
    }

    #[test]
    fn test_http_client_is_built_once() {
        let client = LlmClient::new(LlmConfig::default());
        assert!(client.http_client.get().is_none());

        let first: *const reqwest::Client = client.http_client().unwrap();
        let second: *const reqwest::Client = client.http_client().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_request_serialization() {
        let request = OllamaChatRequest {
            model: "llama3.2:latest",
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            stream: false,
            options: OllamaOptions {
                temperature: 0.5,
                num_predict: 128,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 128);
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
