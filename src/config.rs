use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct VecsearchConfig {
    pub log: LogConfig,
    pub embedding: EmbeddingConfig,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub api_base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

/// Initial form contents used when the CLI is given no explicit input.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DefaultsConfig {
    pub query: String,
    pub candidates: Vec<String>,
}

impl Default for VecsearchConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            embedding: EmbeddingConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            model: "text-embedding-3-large".into(),
            api_base: "https://api.openai.com/v1".into(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            query: "Yellow fruit".into(),
            candidates: vec!["apple".into(), "orange".into(), "banana".into()],
        }
    }
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Returns `~/.vecsearch/`, or `./.vecsearch/` when no home directory is known.
pub fn default_vecsearch_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vecsearch")
}

/// Returns the default config file path: `~/.vecsearch/config.toml`
pub fn default_config_path() -> PathBuf {
    default_vecsearch_dir().join("config.toml")
}

impl VecsearchConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            VecsearchConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (OPENAI_TOKEN, VECSEARCH_MODEL, VECSEARCH_API_BASE, VECSEARCH_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("OPENAI_TOKEN") {
            self.embedding.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("VECSEARCH_MODEL") {
            self.embedding.model = val;
        }
        if let Ok(val) = std::env::var("VECSEARCH_API_BASE") {
            self.embedding.api_base = val;
        }
        if let Ok(val) = std::env::var("VECSEARCH_LOG_LEVEL") {
            self.log.level = val;
        }
    }

    /// Copy of this config that is safe to print: the API key is masked.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.embedding.api_key.is_some() {
            config.embedding.api_key = Some("********".into());
        }
        config
    }
}
