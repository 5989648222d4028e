use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project config file, read from the working directory
pub const CONFIG_FILE: &str = "ragloom.yaml";
/// Optional local overrides, read from the working directory
pub const LOCAL_CONFIG_FILE: &str = "ragloom.local.yaml";
/// Environment variable prefix; nested keys use `__`
pub const ENV_PREFIX: &str = "RAGLOOM_";

/// Configuration error types
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid port: {0}. Must be greater than 0")]
    InvalidPort(u16),

    #[error("Server host cannot be empty")]
    EmptyHost,

    #[error("Invalid Ollama base_url: {0}. Must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Model name cannot be empty: {0}")]
    EmptyModel(&'static str),

    #[error("Invalid temperature: {0}. Must be between 0.0 and 2.0")]
    InvalidTemperature(f64),

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid embedding dimensions: {0}. Must be between 1 and 8192")]
    InvalidDimensions(usize),

    #[error("Invalid default_max_results: {0}. Must be at least 1")]
    InvalidMaxResults(usize),

    #[error(
        "Invalid chunking: chunk_overlap ({1}) must be less than max_chunk_size ({0}) and max_chunk_size must be positive"
    )]
    InvalidChunking(usize, usize),

    #[error("Invalid min_score: {0}. Must be between -1.0 and 1.0")]
    InvalidMinScore(f64),

    #[error("Invalid max_messages: {0}. Must be at least 1")]
    InvalidMaxMessages(usize),

    #[error("Invalid max_tool_rounds: {0}. Must be at least 1")]
    InvalidMaxToolRounds(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. ragloom.yaml
    /// 3. ragloom.local.yaml (optional overrides)
    /// 4. Environment variables (RAGLOOM_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(CONFIG_FILE))
            .merge(Yaml::file(LOCAL_CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables still take precedence over the file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        // Server
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort(config.server.port));
        }
        if config.server.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        // Ollama
        let base_url = &config.ollama.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url.clone()));
        }
        if config.ollama.chat_model.trim().is_empty() {
            return Err(ConfigError::EmptyModel("chat_model"));
        }
        if config.ollama.embedding_model.trim().is_empty() {
            return Err(ConfigError::EmptyModel("embedding_model"));
        }
        if !(0.0..=2.0).contains(&config.ollama.temperature) {
            return Err(ConfigError::InvalidTemperature(config.ollama.temperature));
        }
        if config.ollama.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.ollama.timeout_secs));
        }

        // Embedding
        if config.embedding.dimensions == 0 || config.embedding.dimensions > 8192 {
            return Err(ConfigError::InvalidDimensions(config.embedding.dimensions));
        }

        // RAG
        if config.rag.default_max_results == 0 {
            return Err(ConfigError::InvalidMaxResults(config.rag.default_max_results));
        }
        if config.rag.max_chunk_size == 0 || config.rag.chunk_overlap >= config.rag.max_chunk_size
        {
            return Err(ConfigError::InvalidChunking(
                config.rag.max_chunk_size,
                config.rag.chunk_overlap,
            ));
        }
        if !(-1.0..=1.0).contains(&config.rag.min_score) {
            return Err(ConfigError::InvalidMinScore(config.rag.min_score));
        }

        // Memory and tools
        if config.memory.max_messages == 0 {
            return Err(ConfigError::InvalidMaxMessages(config.memory.max_messages));
        }
        if config.tools.max_tool_rounds == 0 {
            return Err(ConfigError::InvalidMaxToolRounds(config.tools.max_tool_rounds));
        }

        // Logging
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}
