//! Mastery configuration loading

use super::ConfigError;
use crate::mastery::{MasteryCategory, MasteryRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Container for mastery categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasteryConfig {
    #[serde(default)]
    pub categories: Vec<MasteryCategory>,
}

impl MasteryConfig {
    pub fn into_registry(self) -> Result<MasteryRegistry, ConfigError> {
        super::check_ids("mastery category", self.categories.iter().map(|c| c.id.as_str()))?;

        let mut registry = MasteryRegistry::new();
        for category in self.categories {
            if let Some(milestone) = category.milestones().iter().find(|m| m.level > category.max_level) {
                return Err(ConfigError::ValidationError(format!(
                    "mastery category '{}' has a milestone at level {} above max level {}",
                    category.id, milestone.level, category.max_level
                )));
            }
            registry.register(category);
        }
        Ok(registry)
    }
}

/// Load mastery categories from a TOML file
pub fn load_mastery_configs(path: &Path) -> Result<MasteryRegistry, ConfigError> {
    let config: MasteryConfig = super::load_toml(path)?;
    config.into_registry()
}

/// Load mastery categories from a TOML string
pub fn parse_mastery_configs(content: &str) -> Result<MasteryRegistry, ConfigError> {
    let config: MasteryConfig = super::parse_toml(content)?;
    config.into_registry()
}

/// Get the bundled mastery categories
pub fn default_mastery() -> MasteryRegistry {
    parse_mastery_configs(include_str!("../../config/mastery.toml")).unwrap_or_else(|err| {
        warn!(%err, "bundled mastery categories failed to load");
        MasteryRegistry::new()
    })
}
