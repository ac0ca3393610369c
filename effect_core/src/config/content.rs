//! Content configuration loading (stats, materials, auras)

use super::{AurasConfig, ConfigError};
use crate::content::{ContentRegistry, MaterialDefinition, StatDefinition};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Container for content definitions
///
/// Buffs and debuffs may sit in the same file or in a separate auras file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default)]
    pub stats: Vec<StatDefinition>,
    #[serde(default)]
    pub materials: Vec<MaterialDefinition>,
    #[serde(flatten)]
    pub auras: AurasConfig,
}

impl ContentConfig {
    pub fn into_registry(self) -> Result<ContentRegistry, ConfigError> {
        super::check_ids("stat", self.stats.iter().map(|s| s.id.as_str()))?;
        super::check_ids("material", self.materials.iter().map(|m| m.id.as_str()))?;

        let mut registry = ContentRegistry::new();
        registry.auras = self.auras.into_registry()?;
        for stat in self.stats {
            registry.add_stat(stat);
        }
        for material in self.materials {
            registry.add_material(material);
        }
        Ok(registry)
    }
}

/// Load content definitions from a TOML file
pub fn load_content_configs(path: &Path) -> Result<ContentRegistry, ConfigError> {
    let config: ContentConfig = super::load_toml(path)?;
    config.into_registry()
}

/// Load content definitions from a TOML string
pub fn parse_content_configs(content: &str) -> Result<ContentRegistry, ConfigError> {
    let config: ContentConfig = super::parse_toml(content)?;
    config.into_registry()
}

fn bundled_content() -> Result<ContentRegistry, ConfigError> {
    let mut content = parse_content_configs(include_str!("../../config/content.toml"))?;
    let auras = super::parse_aura_configs(include_str!("../../config/auras.toml"))?;
    content.auras.extend(auras);
    Ok(content)
}

/// Get the bundled stats, materials and auras
pub fn default_content() -> ContentRegistry {
    bundled_content().unwrap_or_else(|err| {
        warn!(%err, "bundled content failed to load");
        ContentRegistry::new()
    })
}
