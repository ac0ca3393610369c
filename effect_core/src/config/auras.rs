//! Aura configuration loading

use super::ConfigError;
use crate::aura::{AuraDefinition, AuraDefinitionConfig, AuraRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for aura definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AurasConfig {
    #[serde(default)]
    pub buffs: Vec<AuraDefinitionConfig>,
    #[serde(default)]
    pub debuffs: Vec<AuraDefinitionConfig>,
}

impl AurasConfig {
    /// Validate stacking flags and ids, building the registry
    pub fn into_registry(self) -> Result<AuraRegistry, ConfigError> {
        super::check_ids("buff", self.buffs.iter().map(|b| b.id.as_str()))?;
        super::check_ids("debuff", self.debuffs.iter().map(|d| d.id.as_str()))?;

        let mut registry = AuraRegistry::new();
        for buff in self.buffs {
            registry.register_buff(validate(buff)?);
        }
        for debuff in self.debuffs {
            registry.register_debuff(validate(debuff)?);
        }
        Ok(registry)
    }
}

fn validate(config: AuraDefinitionConfig) -> Result<AuraDefinition, ConfigError> {
    AuraDefinition::try_from(config).map_err(|e| ConfigError::ValidationError(e.to_string()))
}

/// Load aura definitions from a TOML file
pub fn load_aura_configs(path: &Path) -> Result<AuraRegistry, ConfigError> {
    let config: AurasConfig = super::load_toml(path)?;
    config.into_registry()
}

/// Load aura definitions from a TOML string
pub fn parse_aura_configs(content: &str) -> Result<AuraRegistry, ConfigError> {
    let config: AurasConfig = super::parse_toml(content)?;
    config.into_registry()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aura::{AmountPolicy, StackPolicy};

    #[test]
    fn test_parse_auras() {
        let toml = r#"
[[buffs]]
id = "might"
name = "Might"
stack = true

[[buffs.effects]]
type = "stat_modifier"
stat = "strength"
amount = 3
stack = true

[[debuffs]]
id = "poison"
name = "Poison"
combine = true
accumulate = true

[[debuffs.effects]]
type = "damage"
trigger = "turn_end"
target = "self"
amount = 2
"#;

        let registry = parse_aura_configs(toml).unwrap();
        let might = registry.buff("might").unwrap();
        assert_eq!(might.stack_policy, StackPolicy::Stack);
        assert_eq!(might.effects.len(), 1);

        let poison = registry.debuff("poison").unwrap();
        assert!(poison.combine);
        assert_eq!(poison.amount_policy, AmountPolicy::Accumulate);
        assert!(registry.buff("poison").is_none());
    }

    #[test]
    fn test_conflicting_flags_rejected_at_load() {
        let toml = r#"
[[buffs]]
id = "confused"
stack = true
refresh = true
"#;
        let err = parse_aura_configs(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("confused")));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let toml = r#"
[[buffs]]
id = "might"

[[buffs]]
id = "might"
"#;
        assert!(matches!(parse_aura_configs(toml), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            parse_aura_configs("[[buffs]\nid ="),
            Err(ConfigError::ParseError(_))
        ));
    }
}
