//! Random action policy for auto-combat and non-party entities.

use combat_core::{BASELINE_SKILLS, CombatRng, FunctionTarget, Roster};

use crate::handle::SkillExecution;

/// Synthesize a uniformly random, SP-affordable skill invocation.
///
/// Prefers a learned function the entity can pay for, chosen uniformly among
/// the eligible ones; when none is affordable, falls back to a uniform pick
/// among the attack/defend/relax baselines. Targets resolve randomly per the
/// skill's targeting policy.
pub fn random_skill_execution_for(
    roster: &Roster,
    rng: &mut dyn CombatRng,
    user: usize,
) -> SkillExecution {
    let entity = &roster.entities()[user];

    let affordable: Vec<usize> = (BASELINE_SKILLS..entity.skills.len())
        .filter(|&slot| entity.skills[slot].spec.sp_cost <= entity.sp)
        .collect();
    let slot = if affordable.is_empty() {
        rng.pick(BASELINE_SKILLS)
    } else {
        affordable[rng.pick(affordable.len())]
    };

    let targets = resolve_targets(roster, rng, user, entity.skills[slot].spec.target);
    SkillExecution {
        user,
        slot,
        targets,
    }
}

/// Resolve a targeting policy into concrete living roster indices.
fn resolve_targets(
    roster: &Roster,
    rng: &mut dyn CombatRng,
    user: usize,
    target: FunctionTarget,
) -> Vec<usize> {
    let side = roster.entities()[user].is_party;
    match target {
        FunctionTarget::SingleEnemy => pick_one(roster.living_on_side(!side), rng),
        FunctionTarget::AllEnemies => roster.living_on_side(!side),
        FunctionTarget::SingleAlly => pick_one(roster.living_on_side(side), rng),
        FunctionTarget::AllAllies => roster.living_on_side(side),
        FunctionTarget::User => vec![user],
    }
}

fn pick_one(candidates: Vec<usize>, rng: &mut dyn CombatRng) -> Vec<usize> {
    if candidates.is_empty() {
        return Vec::new();
    }
    let index = rng.pick(candidates.len());
    vec![candidates[index]]
}
