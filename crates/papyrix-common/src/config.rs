//! Application configuration: `papyrix.toml` plus `PAPYRIX_*` environment
//! overrides. Every field has a serde default so a missing file yields a
//! fully usable configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::Result;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PapyrixConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Hugging Face model id of the seq2seq model.
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Encoder input budget; prompts are truncated to this many tokens.
    #[serde(default = "default_max_input_tokens")]
    pub max_input_tokens: usize,
    #[serde(default)]
    pub use_gpu: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// LanceDB directory used by the CLI's document insert.
    #[serde(default = "default_db_uri")]
    pub uri: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9000
}

fn default_model_id() -> String {
    "t5-large".to_string()
}

fn default_max_input_tokens() -> usize {
    512
}

fn default_db_uri() -> String {
    "data/papyrix-db".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            max_input_tokens: default_max_input_tokens(),
            use_gpu: false,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { uri: default_db_uri() }
    }
}

impl PapyrixConfig {
    /// Load `papyrix.toml` from the working directory, falling back to
    /// defaults when the file is absent, then apply environment overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from(Path::new("papyrix.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = if path.exists() {
            debug!(path = %path.display(), "Loading config file");
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("PAPYRIX_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PAPYRIX_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(model_id) = std::env::var("PAPYRIX_MODEL_ID") {
            self.model.model_id = model_id;
        }
        if let Ok(max_tokens) = std::env::var("PAPYRIX_MAX_INPUT_TOKENS") {
            if let Ok(max_tokens) = max_tokens.parse() {
                self.model.max_input_tokens = max_tokens;
            }
        }
        if let Ok(use_gpu) = std::env::var("PAPYRIX_USE_GPU") {
            self.model.use_gpu = matches!(use_gpu.as_str(), "1" | "true" | "yes");
        }
        if let Ok(uri) = std::env::var("PAPYRIX_DB_URI") {
            self.database.uri = uri;
        }
    }
}
