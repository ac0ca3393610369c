//! Built-in effect handlers

use super::{AppliedEffect, EffectContext, EffectKind, EffectSpec, EffectType, HealMode};
use crate::aura::{AuraApplication, AuraKind};
use crate::types::CharacterRef;
use std::sync::Arc;
use tracing::{debug, trace, warn};

pub(super) type HandlerFn =
    fn(&EffectSpec, &[CharacterRef], &mut EffectContext<'_>) -> Vec<AppliedEffect>;

/// Built-in handler for an effect type
pub(super) fn builtin(effect_type: EffectType) -> HandlerFn {
    match effect_type {
        EffectType::Damage => damage,
        EffectType::Heal => heal,
        EffectType::RestoreEnergy => restore_energy,
        EffectType::Revive => revive,
        EffectType::ApplyBuff | EffectType::ApplyDebuff => apply_aura,
        EffectType::RemoveBuff | EffectType::RemoveDebuff => remove_aura,
        EffectType::StatModifier => stat_modifier,
        EffectType::GrantMaterial => grant_material,
        EffectType::ConsumeMaterial => consume_material,
    }
}

fn percent_of(value: i64, percent: i64) -> i64 {
    (value * percent).div_euclid(100)
}

fn damage(effect: &EffectSpec, targets: &[CharacterRef], ctx: &mut EffectContext<'_>) -> Vec<AppliedEffect> {
    let mut amount = ctx.amount(effect);
    if let EffectKind::Damage { stat: Some(stat) } = &effect.kind {
        let basis = ctx
            .source_character()
            .map_or(0, |c| c.stats().get(stat.as_str()));
        amount = percent_of(basis, amount);
    }

    let mut applied = Vec::with_capacity(targets.len());
    for &target in targets {
        let attacker = ctx.damage_source();
        let character = ctx.encounter.get_mut(target);
        let taken = character.take_damage(amount, attacker);
        let name = character.name.clone();
        trace!(?target, amount = taken.amount, "damage");

        ctx.log.add(format!("{} takes {} damage", name, taken.amount));
        if taken.killing_blow {
            ctx.log.add(format!("{} is defeated", name));
        }
        applied.push(AppliedEffect::Damage {
            target,
            amount: taken.amount,
            killing_blow: taken.killing_blow,
        });
    }
    applied
}

fn heal(effect: &EffectSpec, targets: &[CharacterRef], ctx: &mut EffectContext<'_>) -> Vec<AppliedEffect> {
    let mode = match &effect.kind {
        EffectKind::Heal { mode } => *mode,
        _ => HealMode::Flat,
    };
    let amount = ctx.amount(effect);

    let mut applied = Vec::with_capacity(targets.len());
    for &target in targets {
        let character = ctx.encounter.get_mut(target);
        let value = match mode {
            HealMode::Flat => amount,
            HealMode::MissingHp => {
                percent_of(character.max_hitpoints() - character.hitpoints, amount)
            }
            HealMode::MaxHpPercent => percent_of(character.max_hitpoints(), amount),
        };
        let healed = character.heal(value);
        let name = character.name.clone();
        trace!(?target, healed, "heal");

        if healed > 0 {
            ctx.log.add(format!("{} recovers {} hitpoints", name, healed));
        }
        applied.push(AppliedEffect::Heal {
            target,
            amount: healed,
        });
    }
    applied
}

fn restore_energy(effect: &EffectSpec, targets: &[CharacterRef], ctx: &mut EffectContext<'_>) -> Vec<AppliedEffect> {
    let amount = ctx.amount(effect);
    targets
        .iter()
        .map(|&target| {
            let restored = ctx.encounter.get_mut(target).restore_energy(amount);
            trace!(?target, restored, "energy");
            AppliedEffect::EnergyRestored {
                target,
                amount: restored,
            }
        })
        .collect()
}

fn revive(effect: &EffectSpec, targets: &[CharacterRef], ctx: &mut EffectContext<'_>) -> Vec<AppliedEffect> {
    let percent = ctx.amount(effect);
    let mut applied = Vec::new();
    for &target in targets {
        let character = ctx.encounter.get_mut(target);
        if let Some(hitpoints) = character.revive(percent) {
            let name = character.name.clone();
            ctx.log.add(format!("{} is revived with {} hitpoints", name, hitpoints));
            applied.push(AppliedEffect::Revived { target, hitpoints });
        }
    }
    applied
}

fn aura_kind(effect: &EffectSpec) -> AuraKind {
    match effect.effect_type() {
        Some(EffectType::ApplyDebuff | EffectType::RemoveDebuff) => AuraKind::Debuff,
        _ => AuraKind::Buff,
    }
}

fn apply_aura(effect: &EffectSpec, targets: &[CharacterRef], ctx: &mut EffectContext<'_>) -> Vec<AppliedEffect> {
    let Some(id) = effect.kind.reference_id() else {
        return Vec::new();
    };
    let kind = aura_kind(effect);
    let Some(definition) = ctx.content.auras.lookup(kind, id).map(Arc::clone) else {
        warn!(aura = id, ?kind, "unknown aura, skipping");
        return Vec::new();
    };

    let application = AuraApplication {
        stacks: ctx.stacks(effect),
        amount: effect.amount.as_ref().map(|_| ctx.amount(effect) as f64),
        source: ctx.source,
    };

    let mut applied = Vec::new();
    for &target in targets {
        let character = ctx.encounter.get_mut(target);
        let added = character.with_auras(|auras| auras.add(&definition, application));
        if added.is_none() {
            continue;
        }
        let stacks = character.auras().stacks_of(&definition.id);
        let name = character.name.clone();
        ctx.log.add(format!("{} gains {} ({})", name, definition.name, stacks));
        applied.push(AppliedEffect::AuraApplied {
            target,
            aura_id: definition.id.clone(),
            stacks,
        });
    }
    applied
}

fn remove_aura(effect: &EffectSpec, targets: &[CharacterRef], ctx: &mut EffectContext<'_>) -> Vec<AppliedEffect> {
    let Some(id) = effect.kind.reference_id() else {
        return Vec::new();
    };
    let kind = aura_kind(effect);
    if ctx.content.auras.lookup(kind, id).is_none() {
        warn!(aura = id, ?kind, "unknown aura, skipping");
        return Vec::new();
    }

    // An explicit stack count strips stacks instead of the whole aura
    let stacks = effect.stacks.as_ref().map(|_| ctx.stacks(effect));

    let mut applied = Vec::new();
    for &target in targets {
        let character = ctx.encounter.get_mut(target);
        let removed = character.with_auras(|auras| match stacks {
            Some(count) => auras.remove_stacks(id, count),
            None => auras.remove(id),
        });
        if removed {
            let name = character.name.clone();
            ctx.log.add(format!("{} loses {}", name, id));
            applied.push(AppliedEffect::AuraRemoved {
                target,
                aura_id: id.to_string(),
            });
        }
    }
    applied
}

fn stat_modifier(effect: &EffectSpec, _targets: &[CharacterRef], ctx: &mut EffectContext<'_>) -> Vec<AppliedEffect> {
    let EffectKind::StatModifier { stat, percent } = &effect.kind else {
        return Vec::new();
    };
    if !ctx.content.has_stat(stat.as_str()) {
        warn!(%stat, "unknown stat, skipping");
        return Vec::new();
    }
    vec![AppliedEffect::StatModifier {
        stat: stat.clone(),
        amount: ctx.amount(effect),
        percent: *percent,
    }]
}

/// Material quantity; one when the effect gives no amount
fn material_quantity(effect: &EffectSpec, ctx: &EffectContext<'_>) -> u32 {
    match effect.amount {
        Some(_) => u32::try_from(ctx.amount(effect).max(0)).unwrap_or(u32::MAX),
        None => 1,
    }
}

fn grant_material(effect: &EffectSpec, _targets: &[CharacterRef], ctx: &mut EffectContext<'_>) -> Vec<AppliedEffect> {
    let Some(id) = effect.kind.reference_id() else {
        return Vec::new();
    };
    let Some(material) = ctx.content.material(id) else {
        warn!(material = id, "unknown material, skipping");
        return Vec::new();
    };
    let amount = material_quantity(effect, ctx);
    let Some(stash) = ctx.stash.as_deref_mut() else {
        debug!(material = id, "no stash available");
        return Vec::new();
    };
    if amount == 0 {
        return Vec::new();
    }

    stash.add_material(id, amount);
    ctx.log.add(format!("Gained {} {}", amount, material.name));
    vec![AppliedEffect::MaterialGranted {
        id: id.to_string(),
        amount,
    }]
}

fn consume_material(effect: &EffectSpec, _targets: &[CharacterRef], ctx: &mut EffectContext<'_>) -> Vec<AppliedEffect> {
    let Some(id) = effect.kind.reference_id() else {
        return Vec::new();
    };
    let Some(material) = ctx.content.material(id) else {
        warn!(material = id, "unknown material, skipping");
        return Vec::new();
    };
    let amount = material_quantity(effect, ctx);
    let Some(stash) = ctx.stash.as_deref_mut() else {
        debug!(material = id, "no stash available");
        return Vec::new();
    };

    match stash.remove_material(id, amount) {
        Ok(()) => {
            ctx.log.add(format!("Used {} {}", amount, material.name));
            vec![AppliedEffect::MaterialConsumed {
                id: id.to_string(),
                amount,
            }]
        }
        Err(err) => {
            warn!(material = id, %err, "cannot consume material");
            Vec::new()
        }
    }
}
