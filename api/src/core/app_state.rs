use std::{path::PathBuf, sync::Arc};

use ai_llm_service::{AiLlmError, OllamaService, config::default_config::config_from_lookup};
use jury_review::{ReviewConfig, ReviewConfigError, Reviewer};
use repo_snapshot::SnapshotConfig;
use thiserror::Error;

/// Default bind address.
pub const DEFAULT_API_ADDRESS: &str = "127.0.0.1:3001";

/// Default dashboard origin allowed by CORS.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Startup configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    Review(#[from] ReviewConfigError),

    #[error("invalid boolean in {var}: `{value}` (expected true/false/1/0)")]
    InvalidBool { var: &'static str, value: String },
}

/// HTTP-level settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `API_ADDRESS`
    pub address: String,
    /// `CORS_ORIGIN`
    pub cors_origin: String,
    /// `ANALYZE_INCLUDE_FILES`: attach the final working tree to `/git/analyze`.
    pub include_files: bool,
    /// `ANALYSIS_DUMP_DIR`: where successful analyses are written, if set.
    pub dump_dir: Option<PathBuf>,
}

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub snapshot: SnapshotConfig,
    pub reviewer: Arc<Reviewer>,
}

impl AppState {
    /// Load shared state from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`AppState::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config = ApiConfig {
            address: get("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.into()),
            cors_origin: get("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.into()),
            include_files: match get("ANALYZE_INCLUDE_FILES") {
                Some(v) => parse_bool("ANALYZE_INCLUDE_FILES", &v)?,
                None => false,
            },
            dump_dir: get("ANALYSIS_DUMP_DIR").map(PathBuf::from),
        };

        let llm = OllamaService::new(config_from_lookup(&lookup)?)?;
        let reviewer = Reviewer::new(Arc::new(llm), ReviewConfig::from_lookup(&lookup)?);

        Ok(Self {
            config,
            snapshot: SnapshotConfig::from_lookup(&lookup),
            reviewer: Arc::new(reviewer),
        })
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}
