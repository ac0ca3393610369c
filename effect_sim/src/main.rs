//! Effect Sim - A headless skirmish demonstrating effect_core
//!
//! This runner shows:
//! - Loading stats, materials, auras and mastery from bundled TOML
//! - Heroes and enemies whose stats come from base, gear and aura sources
//! - Abilities resolved through the effect handler registry
//! - Turn/round triggers firing aura effects, with usage limits reset per scope
//! - Enemy abilities rolled from weighted tables, loot granted into a stash
//!
//! Set `RUST_LOG=effect_core=debug` to see engine decisions.

use effect_core::config::{parse_toml, ConfigError};
use effect_core::prelude::*;
use effect_core::{AppliedEffect, EquipmentSlot, MilestoneEffect};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

const ROSTER: &str = include_str!("../skirmish.toml");
const MAX_ROUNDS: u32 = 20;
const SWORDSMANSHIP_LEVEL: u32 = 50;

#[derive(Debug, Deserialize)]
struct Roster {
    heroes: Vec<HeroConfig>,
    enemies: Vec<EnemyConfig>,
    abilities: HashMap<String, Vec<EffectSpec>>,
}

#[derive(Debug, Deserialize)]
struct MemberConfig {
    id: String,
    name: String,
    role: String,
    stats: StatBlock,
    #[serde(default)]
    gear: Vec<GearConfig>,
}

#[derive(Debug, Deserialize)]
struct GearConfig {
    slot: EquipmentSlot,
    stats: StatBlock,
}

#[derive(Debug, Deserialize)]
struct HeroConfig {
    #[serde(flatten)]
    member: MemberConfig,
    ability: String,
    #[serde(default)]
    opening: Vec<EffectSpec>,
}

#[derive(Debug, Deserialize)]
struct EnemyConfig {
    #[serde(flatten)]
    member: MemberConfig,
    abilities: WeightedTable<String>,
    #[serde(default)]
    loot: Vec<EffectSpec>,
}

impl MemberConfig {
    fn build(&self) -> Character {
        let mut character =
            Character::new(&self.id, &self.name, &self.role).with_base_stats(self.stats.clone());
        for item in &self.gear {
            character.equip(item.slot, item.stats.clone());
        }
        character.heal(character.max_hitpoints());
        character
    }
}

/// How each slot picks its ability
enum Behaviour {
    Fixed(String),
    Weighted(WeightedTable<String>),
}

/// The knight's sword drills, scaled by Swordsmanship
struct SwordDrill {
    level: u32,
    cache: MasteryEffectCache,
}

impl MasteryAction for SwordDrill {
    fn mastery_category_id(&self) -> &str {
        "swordsmanship"
    }

    fn mastery_level(&self) -> u32 {
        self.level
    }

    fn mastery_cache(&mut self) -> &mut MasteryEffectCache {
        &mut self.cache
    }
}

/// Mutable state of one skirmish
struct Skirmish {
    encounter: Encounter,
    limits: EffectLimitTracker,
    stash: MaterialStash,
    log: Vec<String>,
    rng: ChaCha8Rng,
}

impl Skirmish {
    fn context<'a>(&'a mut self, content: &'a ContentRegistry) -> EffectContext<'a> {
        EffectContext::new(&mut self.encounter, content, &mut self.log, &mut self.rng)
            .with_stash(&mut self.stash)
            .with_limits(&mut self.limits)
    }

    fn flush_log(&mut self) {
        for line in self.log.drain(..) {
            println!("  {}", line);
        }
    }
}

fn slots(side: Side) -> impl Iterator<Item = CharacterRef> {
    Position::ALL.into_iter().map(move |p| CharacterRef::new(side, p))
}

/// Characters hit (or killed) in these outcomes, each once
fn damaged(outcomes: &[EffectOutcome], lethal: bool) -> Vec<CharacterRef> {
    let mut hit = Vec::new();
    for applied in outcomes.iter().flat_map(|o| &o.applied) {
        if let AppliedEffect::Damage {
            target,
            amount,
            killing_blow,
        } = applied
        {
            let counts = if lethal { *killing_blow } else { *amount > 0 };
            if counts && !hit.contains(target) {
                hit.push(*target);
            }
        }
    }
    hit
}

fn print_party(encounter: &Encounter, side: Side) {
    for at in slots(side) {
        let c = encounter.get(at);
        let auras: Vec<String> = c
            .auras()
            .instances()
            .iter()
            .filter(|a| a.is_active())
            .map(|a| format!("{}x{}", a.id().unwrap_or("?"), a.stacks))
            .collect();
        println!(
            "  {:<14} {:>4}/{:<4} str {:<3} {}",
            c.name,
            c.hitpoints,
            c.max_hitpoints(),
            c.stats().get("strength"),
            if c.dead { "DEAD".to_string() } else { auras.join(" ") }
        );
    }
}

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let content = default_content();
    let mastery = default_mastery();
    let registry = EffectHandlerRegistry::with_defaults();
    let roster: Roster = parse_toml(ROSTER)?;
    info!(
        stats = content.stats().count(),
        auras = content.auras.len(),
        abilities = roster.abilities.len(),
        "content loaded"
    );

    if roster.heroes.len() != 3 || roster.enemies.len() != 3 {
        return Err(ConfigError::ValidationError(
            "a skirmish needs exactly three heroes and three enemies".to_string(),
        ));
    }

    // === Build the encounter ===
    let heroes: Vec<Character> = roster.heroes.iter().map(|h| h.member.build()).collect();
    let enemies: Vec<Character> = roster.enemies.iter().map(|e| e.member.build()).collect();
    let [h0, h1, h2]: [Character; 3] = heroes
        .try_into()
        .map_err(|_| ConfigError::ValidationError("hero count".to_string()))?;
    let [e0, e1, e2]: [Character; 3] = enemies
        .try_into()
        .map_err(|_| ConfigError::ValidationError("enemy count".to_string()))?;

    let mut behaviour: HashMap<CharacterRef, Behaviour> = HashMap::new();
    for (at, hero) in slots(Side::Heroes).zip(&roster.heroes) {
        behaviour.insert(at, Behaviour::Fixed(hero.ability.clone()));
    }
    for (at, enemy) in slots(Side::Enemies).zip(&roster.enemies) {
        behaviour.insert(at, Behaviour::Weighted(enemy.abilities.clone()));
    }

    let mut skirmish = Skirmish {
        encounter: Encounter::new(Party::new(h0, h1, h2), Party::new(e0, e1, e2)),
        limits: EffectLimitTracker::new(),
        stash: MaterialStash::new(),
        log: Vec::new(),
        rng: ChaCha8Rng::seed_from_u64(42),
    };

    // === Encounter start ===
    println!("=== Encounter start ===");
    for (at, hero) in slots(Side::Heroes).zip(&roster.heroes) {
        let mut ctx = skirmish.context(&content).with_source(at);
        registry.process_all(&hero.opening, &mut ctx);
    }

    let knight = CharacterRef::hero(Position::Front);
    let mut drill = SwordDrill {
        level: SWORDSMANSHIP_LEVEL,
        cache: MasteryEffectCache::new(),
    };
    let bonus = drill.mastery_bonus(&mastery, "damage_bonus");
    let rewards: Vec<EffectSpec> = drill
        .active_mastery_effects(&mastery)
        .iter()
        .filter_map(MilestoneEffect::to_effect_spec)
        .collect();
    info!(level = drill.level, bonus, rewards = rewards.len(), "swordsmanship");
    {
        let mut ctx = skirmish.context(&content).with_source(knight);
        registry.process_all(&rewards, &mut ctx);
    }
    for at in Encounter::refs() {
        let mut ctx = skirmish.context(&content);
        trigger_auras(&registry, at, Trigger::EncounterStart, &mut ctx);
    }
    skirmish.flush_log();

    // === Rounds ===
    let mut round = 0;
    while round < MAX_ROUNDS && !skirmish.encounter.is_finished() {
        round += 1;
        println!("\n=== Round {} ===", round);
        skirmish.limits.reset(LimitScope::Round);
        for at in Encounter::refs() {
            let mut ctx = skirmish.context(&content);
            trigger_auras(&registry, at, Trigger::RoundStart, &mut ctx);
        }

        for actor in Encounter::refs() {
            if skirmish.encounter.is_finished() {
                break;
            }
            if !skirmish.encounter.get(actor).is_alive() {
                continue;
            }
            skirmish.limits.reset(LimitScope::Turn);

            let mut outcomes = {
                let mut ctx = skirmish.context(&content);
                trigger_auras(&registry, actor, Trigger::TurnStart, &mut ctx)
            };

            if skirmish.encounter.get(actor).is_alive() {
                let ability = match behaviour.get(&actor) {
                    Some(Behaviour::Fixed(id)) => Some(id.clone()),
                    Some(Behaviour::Weighted(table)) if !table.is_empty() => {
                        Some(table.get_entry(&mut skirmish.rng).clone())
                    }
                    _ => None,
                };
                match ability.as_deref().map(|id| (id, roster.abilities.get(id))) {
                    Some((id, Some(effects))) => {
                        debug!(actor = %skirmish.encounter.get(actor).name, ability = id, "act");
                        let mut ctx = skirmish.context(&content).with_source(actor);
                        outcomes.extend(registry.process_all(effects, &mut ctx));
                    }
                    Some((id, None)) => warn!(ability = id, "ability not in roster"),
                    None => {}
                }
            }

            // Reactions: damage-received auras on everyone who was hit
            for hit in damaged(&outcomes, false) {
                let mut ctx = skirmish.context(&content).with_attacker(actor);
                outcomes.extend(trigger_auras(&registry, hit, Trigger::AfterDamageReceived, &mut ctx));
            }

            {
                let mut ctx = skirmish.context(&content);
                outcomes.extend(trigger_auras(&registry, actor, Trigger::TurnEnd, &mut ctx));
            }

            for dead in damaged(&outcomes, true) {
                if dead.side != Side::Enemies {
                    continue;
                }
                let Some(enemy) = roster.enemies.get(dead.position.index()) else {
                    continue;
                };
                let mut ctx = skirmish.context(&content).with_source(dead);
                registry.process_all(&enemy.loot, &mut ctx);
            }

            skirmish.flush_log();
        }

        for at in Encounter::refs() {
            let mut ctx = skirmish.context(&content);
            trigger_auras(&registry, at, Trigger::RoundEnd, &mut ctx);
        }
        skirmish.flush_log();

        println!("-- Heroes --");
        print_party(&skirmish.encounter, Side::Heroes);
        println!("-- Enemies --");
        print_party(&skirmish.encounter, Side::Enemies);
    }

    // === Encounter end ===
    for at in Encounter::refs() {
        let mut ctx = skirmish.context(&content);
        trigger_auras(&registry, at, Trigger::EncounterEnd, &mut ctx);
    }
    skirmish.limits.reset(LimitScope::Combat);
    skirmish.flush_log();

    let heroes_won = skirmish.encounter.party(Side::Heroes).any_alive();
    println!(
        "\n=== {} after {} round(s) ===",
        if !skirmish.encounter.is_finished() {
            "Stalemate"
        } else if heroes_won {
            "Victory"
        } else {
            "Defeat"
        },
        round
    );

    let mut loot: Vec<(&str, u32)> = skirmish.stash.iter().collect();
    loot.sort();
    for (id, count) in loot {
        let name = content.material(id).map_or(id, |m| m.name.as_str());
        println!("  {} x{}", name, count);
    }

    Ok(())
}
