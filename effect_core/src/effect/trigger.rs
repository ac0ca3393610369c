//! Aura triggering - Fire a character's aura effects for a trigger

use super::{EffectContext, EffectHandlerRegistry, EffectOutcome};
use crate::scaling::{ScalableValue, StatLookup};
use crate::types::{CharacterRef, Trigger};
use tracing::debug;

/// Fire every active aura effect `owner` carries for `trigger`
///
/// Each effect draws its amount from the owning instance (applying the
/// stack and split rules) and is then processed with `owner` as the
/// source. Amounts scale with whoever applied the aura while that
/// character still holds its slot, otherwise with the owner. Effects
/// marked `consume` remove their stack count from the instance after
/// firing. Every draw and consume rebuilds the owner's auras before the
/// next effect is looked at, and an effect whose aura left its slot
/// during the pass is skipped. Damage is credited to the applier while
/// it still holds its slot.
pub fn trigger_auras(
    registry: &EffectHandlerRegistry,
    owner: CharacterRef,
    trigger: Trigger,
    ctx: &mut EffectContext<'_>,
) -> Vec<EffectOutcome> {
    if matches!(trigger, Trigger::Passive | Trigger::Other) {
        return Vec::new();
    }
    if !ctx.encounter.get(owner).is_in_combat() {
        return Vec::new();
    }

    let pending = ctx.encounter.get(owner).auras().effects_for(trigger);
    if pending.is_empty() {
        return Vec::new();
    }
    debug!(?owner, ?trigger, count = pending.len(), "triggering auras");

    let previous_source = ctx.source.replace(owner);
    let previous_credited = ctx.credited.take();
    let source_key = ctx.source_key();
    let mut outcomes = Vec::new();

    for queued in pending {
        let slot = queued.slot;
        let effect = &queued.effect;
        let owner_character = ctx.encounter.get(owner);
        let Some(instance) = owner_character.auras().instance(slot).filter(|a| queued.is_from(a)) else {
            continue;
        };

        if let Some(limits) = ctx.limits.as_deref() {
            if !limits.can_trigger(effect, &source_key) {
                if let Some(effect_type) = effect.effect_type() {
                    outcomes.push(EffectOutcome::blocked(effect_type));
                }
                continue;
            }
        }

        let applier_ref = instance.source;
        let resolved = ctx.encounter.resolve_source(applier_ref);
        let credited = resolved.and(applier_ref);
        let applier: &dyn StatLookup = resolved.unwrap_or(owner_character);
        let evaluated = effect.amount_value(Some(applier));
        let consumed = effect.stacks_value(Some(applier)).max(0);
        let stored_amount = instance.amount.is_some();

        let drawn = ctx
            .encounter
            .get_mut(owner)
            .with_auras(|auras| auras.draw(slot, effect, evaluated));

        let mut fired = effect.clone();
        if effect.amount.is_some() || stored_amount {
            fired.amount = Some(ScalableValue::flat(drawn as f64));
        }

        // Limits are keyed on the authored effect, not the drawn amount
        let limits = ctx.limits.take();
        ctx.credited = credited;
        let outcome = registry.process(&fired, ctx);
        ctx.credited = None;
        ctx.limits = limits;

        if let Some(outcome) = outcome {
            if let Some(limits) = ctx.limits.as_deref_mut() {
                limits.record(effect, &source_key);
            }
            outcomes.push(outcome);
        }

        if effect.consume {
            let count = u32::try_from(consumed).unwrap_or(u32::MAX);
            ctx.encounter.get_mut(owner).with_auras(|auras| {
                if auras.instance(slot).is_some_and(|a| queued.is_from(a)) {
                    auras.remove_stacks_at(slot, count);
                }
            });
        }
    }

    ctx.source = previous_source;
    ctx.credited = previous_credited;
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aura::{AuraApplication, AuraDefinition, StackPolicy};
    use crate::character::{Character, Encounter, Party};
    use crate::content::ContentRegistry;
    use crate::effect::{EffectKind, EffectSpec, HealMode};
    use crate::limits::EffectLimitTracker;
    use crate::stat_block::StatBlock;
    use crate::targeting::TargetSelector;
    use crate::types::{LimitScope, Position};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn fighter(id: &str) -> Character {
        Character::new(id, id, "fighter").with_base_stats(
            StatBlock::new()
                .with("hitpoints", 100)
                .with("wisdom", 10),
        )
    }

    fn encounter() -> Encounter {
        Encounter::new(
            Party::new(fighter("a"), fighter("b"), fighter("c")),
            Party::new(fighter("x"), fighter("y"), fighter("z")),
        )
    }

    const OWNER: CharacterRef = CharacterRef {
        side: crate::types::Side::Heroes,
        position: Position::Front,
    };

    fn regen(stacked: bool) -> Arc<AuraDefinition> {
        let mut heal = EffectSpec::new(EffectKind::Heal { mode: HealMode::Flat })
            .with_trigger(Trigger::TurnStart)
            .with_target(TargetSelector::SelfTarget)
            .with_amount(ScalableValue::flat(2.0).with_scaling("wisdom", 0.5));
        heal.stack = stacked;
        Arc::new(
            AuraDefinition::new("regen", "Regeneration")
                .with_effect(heal)
                .with_stack_policy(StackPolicy::Stack),
        )
    }

    fn fire(enc: &mut Encounter, trigger: Trigger, limits: Option<&mut EffectLimitTracker>) -> Vec<EffectOutcome> {
        let content = ContentRegistry::new();
        let mut log: Vec<String> = Vec::new();
        let mut rng = StdRng::seed_from_u64(5);
        let mut ctx = EffectContext::new(enc, &content, &mut log, &mut rng);
        if let Some(limits) = limits {
            ctx = ctx.with_limits(limits);
        }
        let outcomes = trigger_auras(&EffectHandlerRegistry::with_defaults(), OWNER, trigger, &mut ctx);
        assert_eq!(ctx.source, None);
        assert_eq!(ctx.credited, None);
        outcomes
    }

    fn fire_with_content(enc: &mut Encounter, trigger: Trigger, content: &ContentRegistry) -> Vec<String> {
        let mut log: Vec<String> = Vec::new();
        let mut rng = StdRng::seed_from_u64(5);
        let mut ctx = EffectContext::new(enc, content, &mut log, &mut rng);
        trigger_auras(&EffectHandlerRegistry::with_defaults(), OWNER, trigger, &mut ctx);
        log
    }

    #[test]
    fn test_turn_start_heal_scales_with_applier() {
        let mut enc = encounter();
        enc.get_mut(OWNER).take_damage(50, None);
        enc.get_mut(OWNER).with_auras(|a| {
            a.add(&regen(true), AuraApplication::new(3).with_source(CharacterRef::hero(Position::Back)))
        });

        let outcomes = fire(&mut enc, Trigger::TurnStart, None);
        // (2 + 10 * 0.5) * 3 stacks
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].total_healing(), 21);
        assert_eq!(enc.get(OWNER).hitpoints, 71);
    }

    #[test]
    fn test_other_triggers_do_nothing() {
        let mut enc = encounter();
        enc.get_mut(OWNER).with_auras(|a| a.add(&regen(false), AuraApplication::new(1)));
        assert!(fire(&mut enc, Trigger::TurnEnd, None).is_empty());
        assert!(fire(&mut enc, Trigger::Passive, None).is_empty());
        assert!(fire(&mut enc, Trigger::Other, None).is_empty());
    }

    #[test]
    fn test_consume_removes_stacks() {
        let mut heal = EffectSpec::new(EffectKind::Heal { mode: HealMode::Flat })
            .with_trigger(Trigger::AfterDamageReceived)
            .with_target(TargetSelector::SelfTarget)
            .with_amount(ScalableValue::flat(5.0));
        heal.consume = true;
        let def = Arc::new(AuraDefinition::new("second_wind", "Second Wind").with_effect(heal));

        let mut enc = encounter();
        enc.get_mut(OWNER).take_damage(40, None);
        enc.get_mut(OWNER).with_auras(|a| a.add(&def, AuraApplication::new(2)));

        fire(&mut enc, Trigger::AfterDamageReceived, None);
        assert_eq!(enc.get(OWNER).auras().stacks_of("second_wind"), 1);
        fire(&mut enc, Trigger::AfterDamageReceived, None);
        assert!(!enc.get(OWNER).auras().has("second_wind"));
        assert!(fire(&mut enc, Trigger::AfterDamageReceived, None).is_empty());
        assert_eq!(enc.get(OWNER).hitpoints, 70);
    }

    #[test]
    fn test_split_draws_from_stored_amount() {
        let mut shield = EffectSpec::new(EffectKind::Heal { mode: HealMode::Flat })
            .with_trigger(Trigger::TurnEnd)
            .with_target(TargetSelector::SelfTarget)
            .with_amount(ScalableValue::flat(1.0));
        shield.split = true;
        let def = Arc::new(AuraDefinition::new("reservoir", "Reservoir").with_effect(shield));

        let mut enc = encounter();
        enc.get_mut(OWNER).take_damage(90, None);
        enc.get_mut(OWNER)
            .with_auras(|a| a.add(&def, AuraApplication::new(4).with_amount(40.0)));

        let outcomes = fire(&mut enc, Trigger::TurnEnd, None);
        assert_eq!(outcomes[0].total_healing(), 10);
        let stored = enc.get(OWNER).auras().get("reservoir").next().and_then(|a| a.amount);
        assert_eq!(stored, Some(30.0));
    }

    #[test]
    fn test_limit_applies_to_authored_effect() {
        let mut heal = EffectSpec::new(EffectKind::Heal { mode: HealMode::Flat })
            .with_trigger(Trigger::TurnEnd)
            .with_target(TargetSelector::SelfTarget)
            .with_amount(ScalableValue::flat(1.0))
            .with_limit(LimitScope::Round, 1);
        heal.split = true;
        let def = Arc::new(AuraDefinition::new("reservoir", "Reservoir").with_effect(heal));

        let mut enc = encounter();
        enc.get_mut(OWNER).take_damage(90, None);
        enc.get_mut(OWNER)
            .with_auras(|a| a.add(&def, AuraApplication::new(2).with_amount(40.0)));

        let mut limits = EffectLimitTracker::new();
        let first = fire(&mut enc, Trigger::TurnEnd, Some(&mut limits));
        assert!(!first[0].blocked_by_limit);
        let second = fire(&mut enc, Trigger::TurnEnd, Some(&mut limits));
        assert!(second[0].blocked_by_limit);
        // Blocked effects do not draw
        let stored = enc.get(OWNER).auras().get("reservoir").next().and_then(|a| a.amount);
        assert_eq!(stored, Some(20.0));
    }

    #[test]
    fn test_dead_owner_heal_does_nothing() {
        let mut enc = encounter();
        enc.get_mut(OWNER).with_auras(|a| a.add(&regen(false), AuraApplication::new(1)));
        enc.get_mut(OWNER).take_damage(500, None);
        let outcomes = fire(&mut enc, Trigger::TurnStart, None);
        assert!(outcomes[0].targets.is_empty());
    }

    #[test]
    fn test_removed_aura_does_not_fire_through_reused_slot() {
        let remove = EffectSpec::new(EffectKind::RemoveBuff { id: "blessing".to_string() })
            .with_trigger(Trigger::TurnStart)
            .with_target(TargetSelector::SelfTarget);
        let apply = EffectSpec::new(EffectKind::ApplyBuff { id: "ward".to_string() })
            .with_trigger(Trigger::TurnStart)
            .with_target(TargetSelector::SelfTarget)
            .with_stacks(ScalableValue::flat(3.0));
        let cleanse = Arc::new(
            AuraDefinition::new("cleanse", "Cleanse")
                .with_effect(remove)
                .with_effect(apply),
        );

        let mut heal = EffectSpec::new(EffectKind::Heal { mode: HealMode::Flat })
            .with_trigger(Trigger::TurnStart)
            .with_target(TargetSelector::SelfTarget)
            .with_amount(ScalableValue::flat(10.0));
        heal.consume = true;
        let blessing = Arc::new(AuraDefinition::new("blessing", "Blessing").with_effect(heal));

        let mut content = ContentRegistry::new();
        content.auras.register_buff(AuraDefinition::new("ward", "Ward"));
        content.auras.register_buff((*blessing).clone());

        let mut enc = encounter();
        enc.get_mut(OWNER).take_damage(50, None);
        enc.get_mut(OWNER).with_auras(|a| {
            a.add(&cleanse, AuraApplication::new(1));
            a.add(&blessing, AuraApplication::new(1));
        });

        let log = fire_with_content(&mut enc, Trigger::TurnStart, &content);
        println!("{:?}", log);

        // Ward took the freed slot; blessing's queued heal must not fire through it
        let owner = enc.get(OWNER);
        assert_eq!(owner.auras().instances()[1].id(), Some("ward"));
        assert_eq!(owner.hitpoints, 50);
        assert_eq!(owner.auras().stacks_of("ward"), 3);
        assert!(!owner.auras().has("blessing"));
    }

    #[test]
    fn test_damage_credited_to_applier() {
        let tick = EffectSpec::new(EffectKind::Damage { stat: None })
            .with_trigger(Trigger::TurnEnd)
            .with_target(TargetSelector::SelfTarget)
            .with_amount(ScalableValue::flat(3.0));
        let def = Arc::new(AuraDefinition::new("bleed", "Bleed").with_effect(tick));
        let enemy = CharacterRef::enemy(Position::Front);

        let mut enc = encounter();
        enc.get_mut(OWNER)
            .with_auras(|a| a.add(&def, AuraApplication::new(1).with_source(enemy)));

        let outcomes = fire(&mut enc, Trigger::TurnEnd, None);
        assert_eq!(outcomes[0].total_damage(), 3);
        assert_eq!(enc.get(OWNER).last_attacker, Some(enemy));
    }

    #[test]
    fn test_damage_without_applier_credits_owner() {
        let tick = EffectSpec::new(EffectKind::Damage { stat: None })
            .with_trigger(Trigger::TurnEnd)
            .with_target(TargetSelector::SelfTarget)
            .with_amount(ScalableValue::flat(3.0));
        let def = Arc::new(AuraDefinition::new("bleed", "Bleed").with_effect(tick));

        let mut enc = encounter();
        enc.get_mut(OWNER).with_auras(|a| a.add(&def, AuraApplication::new(1)));

        fire(&mut enc, Trigger::TurnEnd, None);
        assert_eq!(enc.get(OWNER).last_attacker, Some(OWNER));
    }
}
