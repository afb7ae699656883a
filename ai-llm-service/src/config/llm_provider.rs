use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Backend used for review inference.
///
/// Only the local Ollama runtime is wired today. Parsing any other
/// `LLM_KIND` value fails with [`ConfigError::UnsupportedProvider`] instead
/// of silently falling back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// Local Ollama runtime (`/api/chat`).
    Ollama,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "ollama" => Ok(LlmProvider::Ollama),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
