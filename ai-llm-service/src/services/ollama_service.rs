//! Thin Ollama chat client used to obtain review text.
//!
//! - `POST {endpoint}/api/chat` with a single user message and `stream=false`
//! - the whole reply is buffered; the assistant text is `message.content`
//!
//! No retries happen here. A failed call surfaces as
//! [`ModelUnavailableError`] and the caller decides what to do with it.
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::{LlmModelConfig, LlmProvider, OllamaService};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = LlmModelConfig {
//!     provider: LlmProvider::Ollama,
//!     model: "llama3.1".into(),
//!     endpoint: "http://localhost:11434".into(),
//!     api_key: None,
//!     max_tokens: None,
//!     temperature: Some(0.2),
//!     top_p: None,
//!     timeout_secs: Some(600),
//! };
//!
//! let svc = OllamaService::new(cfg)?;
//! let reply = svc.chat("Score this repository.").await?;
//! println!("{reply}");
//! # Ok(()) }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::llm_model_config::LlmModelConfig;
use crate::error_handler::{ConfigError, ModelUnavailableError, Result};

/// Client for a single configured chat model.
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` pools
/// connections.
#[derive(Debug)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    timeout: Duration,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError`] variants if `cfg` fails validation
    /// - [`ConfigError::Client`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        cfg.validate()?;

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(ConfigError::Client)?;

        let base = cfg.endpoint.trim().trim_end_matches('/').to_string();
        let url_chat = format!("{base}/api/chat");

        Ok(Self {
            client,
            cfg,
            url_chat,
            timeout,
        })
    }

    /// Model name this client sends with every request.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Sends `prompt` as one user message and returns the assistant reply.
    ///
    /// # Errors
    /// - [`ModelUnavailableError::Transport`] when the endpoint is unreachable
    /// - [`ModelUnavailableError::Timeout`] when the configured timeout elapses
    /// - [`ModelUnavailableError::HttpStatus`] for non-2xx responses
    /// - [`ModelUnavailableError::Decode`] if the body is not a chat response
    #[instrument(skip_all, fields(model = %self.cfg.model, prompt_chars = prompt.len()))]
    pub async fn chat(&self, prompt: &str) -> std::result::Result<String, ModelUnavailableError> {
        let body = ChatRequest::from_cfg(&self.cfg, prompt);

        debug!("POST {}", self.url_chat);
        let mut req = self.client.post(&self.url_chat).json(&body);
        if let Some(key) = self.cfg.api_key.as_deref() {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await.map_err(|e| self.transport_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = text.chars().take(240).collect::<String>();
            return Err(ModelUnavailableError::HttpStatus {
                status,
                url: self.url_chat.clone(),
                snippet,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        let out: ChatResponse = serde_json::from_slice(&bytes).map_err(|e| {
            ModelUnavailableError::Decode(format!(
                "serde error: {e}; expected `{{ message: {{ content: string }} }}` with `stream=false`"
            ))
        })?;

        debug!(reply_chars = out.message.content.len(), "chat reply received");
        Ok(out.message.content)
    }

    fn transport_error(&self, e: reqwest::Error) -> ModelUnavailableError {
        if e.is_timeout() {
            ModelUnavailableError::Timeout {
                url: self.url_chat.clone(),
                timeout: self.timeout,
            }
        } else {
            ModelUnavailableError::Transport {
                url: self.url_chat.clone(),
                source: e,
            }
        }
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/chat` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
}

impl<'a> ChatRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str) -> Self {
        let options = ChatOptions {
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            num_predict: cfg.max_tokens,
        };

        Self {
            model: &cfg.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            options: (!options.is_empty()).then_some(options),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl ChatOptions {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.top_p.is_none() && self.num_predict.is_none()
    }
}

/// Response body for `/api/chat`. Only the assistant text is read.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::llm_provider::LlmProvider;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "llama3.1".into(),
            endpoint: "http://localhost:11434/".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn request_body_matches_chat_contract() {
        let cfg = cfg();
        let body = serde_json::to_value(ChatRequest::from_cfg(&cfg, "hello")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "llama3.1",
                "messages": [{ "role": "user", "content": "hello" }],
                "stream": false
            })
        );
    }

    #[test]
    fn options_are_sent_when_configured() {
        let mut cfg = cfg();
        cfg.temperature = Some(0.5);
        let body = serde_json::to_value(ChatRequest::from_cfg(&cfg, "hi")).unwrap();
        assert_eq!(body["options"], serde_json::json!({ "temperature": 0.5 }));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let svc = OllamaService::new(cfg()).unwrap();
        assert_eq!(svc.url_chat, "http://localhost:11434/api/chat");
        assert_eq!(svc.model(), "llama3.1");
    }

    #[test]
    fn rejects_invalid_endpoint() {
        let mut cfg = cfg();
        cfg.endpoint = "ftp://nowhere".into();
        assert!(OllamaService::new(cfg).is_err());
    }
}
