//! Configuration loading from TOML files

mod auras;
mod content;
mod mastery;

pub use auras::{load_aura_configs, parse_aura_configs, AurasConfig};
pub use content::{default_content, load_content_configs, parse_content_configs, ContentConfig};
pub use mastery::{default_mastery, load_mastery_configs, parse_mastery_configs, MasteryConfig};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_toml(&content)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Reject empty and repeated ids
fn check_ids<'a>(kind: &str, ids: impl IntoIterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!("{} with empty id", kind)));
        }
        if !seen.insert(id) {
            return Err(ConfigError::ValidationError(format!("duplicate {} '{}'", kind, id)));
        }
    }
    Ok(())
}
