//! Review model config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `LLM_KIND`          = provider kind (only `ollama`; default `ollama`)
//! - `OLLAMA_URL`        = endpoint base URL, or
//! - `OLLAMA_PORT`       = port on localhost (used when `OLLAMA_URL` is unset)
//! - `OLLAMA_MODEL`      = model name (default `llama3.1`)
//! - `LLM_API_KEY`       = optional bearer credential
//! - `LLM_MAX_TOKENS`    = optional max tokens (u32)
//! - `LLM_TEMPERATURE`   = optional sampling temperature
//! - `LLM_TIMEOUT_SECS`  = request timeout (default 600)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError, Result, non_empty, opt_number},
};

/// Default model when `OLLAMA_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "llama3.1";

/// Default request timeout. Local models can take minutes on long histories.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. `http://localhost:11434`
///
/// # Errors
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint<F>(lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = non_empty(lookup, "OLLAMA_URL") {
        return Ok(url.trim().to_string());
    }
    if let Some(port) = non_empty(lookup, "OLLAMA_PORT") {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Ok("http://localhost:11434".to_string())
}

/// Constructs the review model config, reading variables through `lookup`
/// (`|name| std::env::var(name).ok()` for the process environment).
///
/// # Defaults
/// - `temperature = Some(0.2)` unless `LLM_TEMPERATURE` is set
/// - `timeout_secs = Some(600)` unless `LLM_TIMEOUT_SECS` is set
pub fn config_from_lookup<F>(lookup: F) -> Result<LlmModelConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let provider: LlmProvider = non_empty(&lookup, "LLM_KIND")
        .unwrap_or_default()
        .parse()
        .map_err(AiLlmError::Config)?;
    let endpoint = ollama_endpoint(&lookup)?;
    let model = non_empty(&lookup, "OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let cfg = LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key: non_empty(&lookup, "LLM_API_KEY"),
        max_tokens: opt_number(&lookup, "LLM_MAX_TOKENS", "expected u32")?,
        temperature: Some(
            opt_number(&lookup, "LLM_TEMPERATURE", "expected a decimal number")?.unwrap_or(0.2),
        ),
        top_p: None,
        timeout_secs: Some(
            opt_number(&lookup, "LLM_TIMEOUT_SECS", "expected u64")?
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        ),
    };
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_local_ollama() {
        let cfg = config_from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.endpoint, "http://localhost:11434");
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn url_wins_over_port() {
        let cfg = config_from_lookup(lookup(&[
            ("OLLAMA_URL", "http://gpu-box:11434"),
            ("OLLAMA_PORT", "9999"),
            ("OLLAMA_MODEL", "qwen3:14b"),
            ("LLM_API_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(cfg.endpoint, "http://gpu-box:11434");
        assert_eq!(cfg.model, "qwen3:14b");
        assert_eq!(cfg.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn port_builds_localhost_url() {
        let cfg = config_from_lookup(lookup(&[("OLLAMA_PORT", "11500")])).unwrap();
        assert_eq!(cfg.endpoint, "http://localhost:11500");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_from_lookup(lookup(&[("OLLAMA_PORT", "abc")])),
            Err(AiLlmError::Config(ConfigError::InvalidNumber { var: "OLLAMA_PORT", .. }))
        ));
        assert!(matches!(
            config_from_lookup(lookup(&[("OLLAMA_URL", "localhost:11434")])),
            Err(AiLlmError::Config(ConfigError::InvalidFormat { .. }))
        ));
        assert!(matches!(
            config_from_lookup(lookup(&[("LLM_TEMPERATURE", "7.5")])),
            Err(AiLlmError::Config(ConfigError::OutOfRange { field: "temperature", .. }))
        ));
        assert!(matches!(
            config_from_lookup(lookup(&[("LLM_KIND", "chatgpt")])),
            Err(AiLlmError::Config(ConfigError::UnsupportedProvider(_)))
        ));
    }
}
