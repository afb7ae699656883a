//! Chat client for the review model.
//!
//! The crate exposes a single provider today (local Ollama) behind an
//! explicit [`LlmModelConfig`](config::llm_model_config::LlmModelConfig)
//! that is built once at startup and injected into
//! [`OllamaService`](services::ollama_service::OllamaService).

pub mod config;
pub mod error_handler;
pub mod services;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, ConfigError, ModelUnavailableError};
pub use services::ollama_service::OllamaService;
