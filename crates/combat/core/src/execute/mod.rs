//! Action resolution.
//!
//! - [`single_execute`] / [`execute_skill`]: skill resolution against targets.
//! - [`apply`] routines: the imperative backends for instant changes, effect
//!   attachment, and shields.
//! - [`process_effect_turns`]: per-turn effect programs and expiry.
//!
//! All functions here are deterministic given the injected random source, and
//! fail-fast: a precondition violation aborts the combat session.

mod apply;
mod formula;
mod single;

pub use apply::{
    attach_effect, attach_shield, instant_ap_change, instant_hp_change, instant_sp_change,
    remove_effect, remove_shield,
};
pub use formula::{base_damage, base_heal, effectiveness_rate};
pub use single::{execute_skill, single_execute};

use crate::action::{ActionRef, ActionResult};
use crate::archive::Archive;
use crate::entity::Roster;
use crate::error::CombatError;
use crate::expr::ExecContext;
use crate::rng::CombatRng;

/// One effect's per-turn application, for logging.
#[derive(Clone, Debug)]
pub struct EffectTurn {
    pub effect: String,
    pub results: Vec<ActionResult>,
}

/// Run the per-turn program of every effect attached to `carrier`, then
/// decrement durations and detach expired effects.
///
/// Each program runs with the effect's original attacher as `user` and the
/// carrier as `target`. Programs may mutate the carrier's effect list
/// (including removing themselves); slots are re-resolved defensively so no
/// effect runs twice and none is skipped.
pub fn process_effect_turns(
    roster: &mut Roster,
    archive: &dyn Archive,
    rng: &mut dyn CombatRng,
    carrier: usize,
) -> Result<Vec<EffectTurn>, CombatError> {
    if roster.get(carrier).is_none() {
        return Err(CombatError::IndexOutOfBounds { index: carrier });
    }

    let mut turns = Vec::new();
    let mut slot = 0;
    while slot < roster.entities()[carrier].effects.len() {
        let (name, user, spec) = {
            let effect = &roster.entities()[carrier].effects[slot];
            (effect.name().to_owned(), effect.user, effect.spec.clone())
        };

        let mut ctx = ExecContext::new(
            roster,
            archive,
            rng,
            ActionRef::Effect {
                owner: carrier,
                slot,
            },
            user,
            carrier,
        );
        if let Some(program) = &spec.apply_on {
            program.eval(&mut ctx);
        }
        let mut results = ctx.results;

        // The program may have reshaped the list; only touch the slot if the
        // same attachment still occupies it.
        let entity = &mut roster.entities_mut()[carrier];
        let mut advance = false;
        if let Some(effect) = entity.effects.get_mut(slot) {
            if effect.name() == name && effect.user == user {
                effect.times_used += 1;
                effect.turns_left -= 1;
                if effect.turns_left <= 0 {
                    entity.detach_effect(slot);
                    results.push(ActionResult::RemoveEffect {
                        from: user,
                        to: carrier,
                        effect: name.clone(),
                    });
                } else {
                    advance = true;
                }
            }
        }
        if advance {
            slot += 1;
        }

        turns.push(EffectTurn {
            effect: name,
            results,
        });
    }

    Ok(turns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Effect;
    use crate::rng::SequenceRng;
    use crate::test_support::{TestArchive, sample_roster};

    #[test]
    fn effect_programs_run_and_durations_tick_down() {
        let archive = TestArchive::default();
        let mut roster = sample_roster();
        let corrupted = archive.effect("corrupted").unwrap();
        roster.entities_mut()[1].attach_effect(Effect::new(corrupted, 1, 2, 0));
        let mut rng = SequenceRng::new(vec![0.9]);

        let before = roster.entities()[1].hp;
        let turns = process_effect_turns(&mut roster, &archive, &mut rng, 1).unwrap();

        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].effect, "corrupted");
        assert_eq!(roster.entities()[1].hp, before - 5);
        assert_eq!(roster.entities()[1].effects[0].turns_left, 1);
    }

    #[test]
    fn expired_effects_detach_with_a_result() {
        let archive = TestArchive::default();
        let mut roster = sample_roster();
        let corrupted = archive.effect("corrupted").unwrap();
        roster.entities_mut()[1].attach_effect(Effect::new(corrupted, 1, 1, 0));
        let mut rng = SequenceRng::new(vec![0.9]);

        let turns = process_effect_turns(&mut roster, &archive, &mut rng, 1).unwrap();

        assert!(roster.entities()[1].effects.is_empty());
        assert!(matches!(
            turns[0].results.last(),
            Some(ActionResult::RemoveEffect { .. })
        ));
    }

    #[test]
    fn modifier_effect_expiry_restores_stats() {
        let archive = TestArchive::default();
        let mut roster = sample_roster();
        let before = roster.entities()[1].atk;
        let optimized = archive.effect("optimized").unwrap();
        roster.entities_mut()[1].attach_effect(Effect::new(optimized, 1, 1, 0));
        assert!(roster.entities()[1].atk > before);
        let mut rng = SequenceRng::new(vec![0.9]);

        process_effect_turns(&mut roster, &archive, &mut rng, 1).unwrap();

        assert_eq!(roster.entities()[1].atk, before);
    }

    #[test]
    fn every_attached_effect_gets_a_turn() {
        let archive = TestArchive::default();
        let mut roster = sample_roster();
        let corrupted = archive.effect("corrupted").unwrap();
        let optimized = archive.effect("optimized").unwrap();
        roster.entities_mut()[1].attach_effect(Effect::new(corrupted, 1, 3, 0));
        roster.entities_mut()[1].attach_effect(Effect::new(optimized, 1, 3, 0));
        let mut rng = SequenceRng::new(vec![0.9]);

        let turns = process_effect_turns(&mut roster, &archive, &mut rng, 1).unwrap();
        let names: Vec<_> = turns.iter().map(|t| t.effect.as_str()).collect();
        assert_eq!(names, vec!["corrupted", "optimized"]);
    }
}
