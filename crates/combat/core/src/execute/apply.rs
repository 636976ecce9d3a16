//! Instant-change, effect, and shield mutation routines.
//!
//! These are the imperative backends of the [`crate::expr::Extra`] variants.
//! Each routine mutates the context's target entity and records a result —
//! including the "nothing happened" cases, which log as `NoEffect`.

use crate::action::{ActionResult, Effect};
use crate::entity::Shield;
use crate::expr::{ExecContext, Who};

/// Instant HP change, bypassing attack multipliers.
///
/// Positive amounts heal directly; negative amounts resolve like damage
/// including shield absorption (unless bypassed), but with no miss or
/// critical rolls.
pub fn instant_hp_change(ctx: &mut ExecContext, amount: i32, ignores_shield: bool, to: Who) {
    let from = ctx.user;
    let to_index = ctx.index_of(to);

    if amount == 0 {
        ctx.record(ActionResult::NoEffect {
            from,
            to: to_index,
        });
        return;
    }

    if amount > 0 {
        let entity = ctx.entity(to);
        let coerced = amount.min(entity.max_hp - entity.hp);
        ctx.record(ActionResult::Heal {
            from,
            to: to_index,
            amount,
            coerced,
        });
        ctx.entity_mut(to).change_hp(amount);
        return;
    }

    let damage = -amount;
    let absorbed = if ignores_shield {
        0
    } else {
        ctx.entity_mut(to).absorb(damage).0
    };
    let taken = damage - absorbed;
    let coerced = taken.min(ctx.entity(to).hp);
    ctx.record(ActionResult::Damage {
        from,
        to: to_index,
        damage,
        shielded: absorbed,
        coerced,
        critical: false,
    });
    ctx.entity_mut(to).change_hp(-taken);
}

/// Instant SP change, clamped to `[0, max_sp]`. Records the applied delta.
pub fn instant_sp_change(ctx: &mut ExecContext, amount: i32, to: Who) {
    let from = ctx.user;
    let to_index = ctx.index_of(to);

    let before = ctx.entity(to).sp;
    ctx.entity_mut(to).change_sp(amount);
    let applied = ctx.entity(to).sp - before;
    ctx.record(ActionResult::SpChange {
        from,
        to: to_index,
        amount: applied,
    });
}

/// Instant AP change. Intentionally unclamped in both directions.
pub fn instant_ap_change(ctx: &mut ExecContext, amount: f32, to: Who) {
    let from = ctx.user;
    let to_index = ctx.index_of(to);

    ctx.entity_mut(to).change_ap(amount);
    ctx.record(ActionResult::ApChange {
        from,
        to: to_index,
        amount,
    });
}

/// Attach the named archive effect to a participant.
///
/// Stackable effects always coexist. A nonstackable duplicate fights the
/// incumbent by rank: the newcomer wins on `new >= old`, seeds its scratch
/// values by summing the incumbent's, and the incumbent detaches first. A
/// losing newcomer records `NoEffect` and changes nothing.
pub fn attach_effect(ctx: &mut ExecContext, name: &str, tier: u32, turns: i32, to: Who) {
    let from = ctx.user;
    let to_index = ctx.index_of(to);

    let Some(spec) = ctx.archive.effect(name) else {
        ctx.record(ActionResult::NoEffect {
            from,
            to: to_index,
        });
        return;
    };

    let mut incoming = Effect::new(spec.clone(), tier, turns, from);

    if !spec.stackable {
        let existing = ctx
            .entity(to)
            .effects
            .iter()
            .position(|e| e.name() == name);
        if let Some(slot) = existing {
            let incumbent = &ctx.entity(to).effects[slot];
            if incoming.rank() >= incumbent.rank() {
                incoming.times_repeated = incumbent.times_repeated + 1;
                for (key, value) in &incumbent.values {
                    *incoming.values.entry(key.clone()).or_insert(0.0) += value;
                }
                ctx.entity_mut(to).detach_effect(slot);
                ctx.record(ActionResult::RemoveEffect {
                    from,
                    to: to_index,
                    effect: name.to_owned(),
                });
            } else {
                ctx.record(ActionResult::NoEffect {
                    from,
                    to: to_index,
                });
                return;
            }
        }
    }

    ctx.entity_mut(to).attach_effect(incoming);
    ctx.record(ActionResult::AttachEffect {
        from,
        to: to_index,
        effect: name.to_owned(),
    });
}

/// Remove the named effect from a participant.
pub fn remove_effect(ctx: &mut ExecContext, name: &str, from_who: Who) {
    let from = ctx.user;
    let to_index = ctx.index_of(from_who);

    let slot = ctx
        .entity(from_who)
        .effects
        .iter()
        .position(|e| e.name() == name);
    match slot {
        Some(slot) => {
            ctx.entity_mut(from_who).detach_effect(slot);
            ctx.record(ActionResult::RemoveEffect {
                from,
                to: to_index,
                effect: name.to_owned(),
            });
        }
        None => ctx.record(ActionResult::NoEffect {
            from,
            to: to_index,
        }),
    }
}

/// Attach a shield to a participant.
///
/// A same-key shield is only replaced when the new value is strictly
/// greater; otherwise the attempt records `NoEffect`.
pub fn attach_shield(ctx: &mut ExecContext, key: &str, value: i32, turns: Option<i32>, to: Who) {
    let from = ctx.user;
    let to_index = ctx.index_of(to);

    let weaker = value <= 0
        || ctx
            .entity(to)
            .shields
            .get(key)
            .is_some_and(|existing| existing.value >= value);
    if weaker {
        ctx.record(ActionResult::NoEffect {
            from,
            to: to_index,
        });
        return;
    }

    ctx.entity_mut(to)
        .shields
        .insert(key.to_owned(), Shield::new(value, turns));
    ctx.record(ActionResult::AttachShield {
        from,
        to: to_index,
        key: key.to_owned(),
        value,
    });
}

/// Remove a shield from a participant.
pub fn remove_shield(ctx: &mut ExecContext, key: &str, from_who: Who) {
    let from = ctx.user;
    let to_index = ctx.index_of(from_who);

    match ctx.entity_mut(from_who).shields.remove(key) {
        Some(_) => ctx.record(ActionResult::RemoveShield {
            from,
            to: to_index,
            key: key.to_owned(),
        }),
        None => ctx.record(ActionResult::NoEffect {
            from,
            to: to_index,
        }),
    }
}
