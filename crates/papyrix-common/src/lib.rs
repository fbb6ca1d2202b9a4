//! papyrix-common — configuration shared by the web server and the CLI.

pub mod config;

pub use config::{DatabaseConfig, ModelConfig, PapyrixConfig, ServerConfig};

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
