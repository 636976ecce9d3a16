//! Single-execution resolution of a skill against one target.

use crate::action::{ActionRef, ActionResult};
use crate::archive::Archive;
use crate::config::CombatConfig;
use crate::entity::Roster;
use crate::error::CombatError;
use crate::expr::{DamageScope, ExecContext, Who};
use crate::rng::CombatRng;

use super::formula::{base_damage, base_heal, effectiveness_rate};

/// Resolve the context's acting skill against the context's target.
///
/// ## Resolution order
///
/// 1. Resolve power (modifier override, else the skill's base power).
/// 2. `power == 0`: run the skill's extra only.
/// 3. `power < 0`: heal from the user's (possibly overridden) ATK, then extra.
/// 4. `power > 0`: miss roll (skipped for bullseye skills), base damage from
///    the possibly-overridden ATK/DEF, critical roll, category effectiveness,
///    critical multiplier, attack/defend rate multipliers, truncation, shield
///    absorption, HP application — then the skill's extra, the user's
///    on-attack trigger, and (entities swapped) the target's on-defend
///    trigger, all inside the damage-result scope.
///
/// # Errors
///
/// [`CombatError::NotASkill`] when the acting action is an effect — a
/// precondition violation, not a gameplay outcome.
pub fn single_execute(ctx: &mut ExecContext) -> Result<(), CombatError> {
    let ActionRef::Skill { owner, slot } = ctx.action else {
        return Err(CombatError::NotASkill);
    };
    let spec = ctx
        .roster
        .get(owner)
        .ok_or(CombatError::IndexOutOfBounds { index: owner })?
        .skills
        .get(slot)
        .ok_or(CombatError::SkillSlotOutOfBounds { index: owner, slot })?
        .spec
        .clone();

    let modifier = spec.modifier.as_ref();
    let power = modifier.and_then(|m| m.power).unwrap_or(spec.power);
    let (from, to) = (ctx.user, ctx.target);

    // ===== no-op power: extra only =====
    if power == 0 {
        if let Some(extra) = &spec.extra {
            extra.eval(ctx);
        }
        return Ok(());
    }

    // ===== healing =====
    if power < 0 {
        let atk = match modifier.and_then(|m| m.user_atk.as_ref()) {
            Some(value) => value.eval(ctx),
            None => ctx.user().atk as f32,
        };
        let heal = base_heal(-power, atk);
        let target = ctx.target();
        let coerced = heal.min(target.max_hp - target.hp);
        ctx.record(ActionResult::Heal {
            from,
            to,
            amount: heal,
            coerced,
        });
        ctx.entity_mut(Who::Target).change_hp(heal);
        if let Some(extra) = &spec.extra {
            extra.eval(ctx);
        }
        return Ok(());
    }

    // ===== damage =====
    let target_rate = ctx.user().target_rate + modifier.map_or(0.0, |m| m.target_rate_offset);
    if !spec.bullseye {
        let miss_bound = 1.0 - target_rate + ctx.target().hide_rate;
        if ctx.rng.next_f32() < miss_bound {
            ctx.record(ActionResult::Missed { from, to });
            return Ok(());
        }
    }

    let atk = match modifier.and_then(|m| m.user_atk.as_ref()) {
        Some(value) => value.eval(ctx),
        None => ctx.user().atk as f32,
    };
    let def = match modifier.and_then(|m| m.target_def.as_ref()) {
        Some(value) => value.eval(ctx),
        None => ctx.target().def as f32,
    };
    let mut damage = base_damage(power, atk, def);

    let crit_rate = ctx.user().crit_rate + modifier.map_or(0.0, |m| m.crit_rate_offset);
    let critical = ctx.rng.chance(crit_rate);

    let table = ctx.archive.effectiveness(ctx.user().primary_category);
    let target = ctx.target();
    damage *= effectiveness_rate(
        table.against(target.primary_category),
        target.secondary_category.map(|c| table.against(c)),
    );

    if critical {
        damage *= 1.0 + ctx.user().crit_dmg + modifier.map_or(0.0, |m| m.crit_dmg_offset);
    }

    damage *= ctx.user().attack_rate.clamp(
        CombatConfig::RATE_MULTIPLIER_MIN,
        CombatConfig::RATE_MULTIPLIER_MAX,
    );
    damage *= ctx.target().defend_rate.clamp(
        CombatConfig::RATE_MULTIPLIER_MIN,
        CombatConfig::RATE_MULTIPLIER_MAX,
    );

    let final_damage = (damage as i32).max(1);
    let absorbed = if modifier.is_some_and(|m| m.ignores_shield) {
        0
    } else {
        ctx.entity_mut(Who::Target).absorb(final_damage).0
    };
    let taken = final_damage - absorbed;
    let coerced = taken.min(ctx.target().hp);
    ctx.record(ActionResult::Damage {
        from,
        to,
        damage: final_damage,
        shielded: absorbed,
        coerced,
        critical,
    });
    ctx.entity_mut(Who::Target).change_hp(-taken);

    // Triggers see the damage numbers through the context scope.
    ctx.attack_damage = Some(DamageScope {
        damage: final_damage,
        taken,
        shielded: absorbed,
        critical,
    });
    if let Some(extra) = &spec.extra {
        extra.eval(ctx);
    }
    if let Some(on_attack) = ctx.user().on_attack.clone() {
        on_attack.eval(ctx);
    }
    if let Some(on_defend) = ctx.target().on_defend.clone() {
        ctx.swapped(|ctx| on_defend.eval(ctx));
    }
    ctx.attack_damage = None;

    Ok(())
}

/// Resolve one skill invocation against its full target list.
///
/// Deducts the SP cost once (recording the applied change), bumps the usage
/// counter, then single-executes against each target in order. This is the
/// arena-facing entry point.
pub fn execute_skill(
    roster: &mut Roster,
    archive: &dyn Archive,
    rng: &mut dyn CombatRng,
    user: usize,
    slot: usize,
    targets: &[usize],
) -> Result<Vec<ActionResult>, CombatError> {
    let entity = roster
        .get(user)
        .ok_or(CombatError::IndexOutOfBounds { index: user })?;
    let sp_cost = entity
        .skills
        .get(slot)
        .ok_or(CombatError::SkillSlotOutOfBounds { index: user, slot })?
        .spec
        .sp_cost;
    for &target in targets {
        if roster.get(target).is_none() {
            return Err(CombatError::IndexOutOfBounds { index: target });
        }
    }

    let mut results = Vec::new();

    if sp_cost != 0 {
        let entity = &mut roster.entities_mut()[user];
        let before = entity.sp;
        entity.change_sp(-sp_cost);
        let applied = entity.sp - before;
        results.push(ActionResult::SpChange {
            from: user,
            to: user,
            amount: applied,
        });
    }
    roster.entities_mut()[user].skills[slot].times_used += 1;

    for &target in targets {
        let mut ctx = ExecContext::new(
            roster,
            archive,
            rng,
            ActionRef::Skill { owner: user, slot },
            user,
            target,
        );
        single_execute(&mut ctx)?;
        results.extend(ctx.results);
    }

    Ok(results)
}
