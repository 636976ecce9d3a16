//! Execution context threaded through all expression evaluation.

use super::Who;
use crate::action::{ActionRef, ActionResult};
use crate::archive::Archive;
use crate::entity::{Entity, Roster};
use crate::rng::CombatRng;

/// Damage numbers visible to extras running inside a successful attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageScope {
    /// Full damage before shields.
    pub damage: i32,
    /// Damage actually applied to HP.
    pub taken: i32,
    /// Portion absorbed by shields.
    pub shielded: i32,
    pub critical: bool,
}

/// Everything one action resolution reads and mutates.
///
/// Holds the roster mutably plus plain indices for the participants, so every
/// access re-borrows for exactly as long as it needs — expressions can read
/// the user, mutate the target, and append results without aliasing.
pub struct ExecContext<'a> {
    pub roster: &'a mut Roster,
    pub archive: &'a dyn Archive,
    pub rng: &'a mut dyn CombatRng,
    /// Handle to the acting skill or effect.
    pub action: ActionRef,
    pub user: usize,
    pub target: usize,
    /// Set only while extras run in the scope of a successful attack.
    pub attack_damage: Option<DamageScope>,
    /// Results recorded so far, in resolution order.
    pub results: Vec<ActionResult>,
}

impl<'a> ExecContext<'a> {
    pub fn new(
        roster: &'a mut Roster,
        archive: &'a dyn Archive,
        rng: &'a mut dyn CombatRng,
        action: ActionRef,
        user: usize,
        target: usize,
    ) -> Self {
        Self {
            roster,
            archive,
            rng,
            action,
            user,
            target,
            attack_damage: None,
            results: Vec::new(),
        }
    }

    pub fn index_of(&self, who: Who) -> usize {
        match who {
            Who::User => self.user,
            Who::Target => self.target,
        }
    }

    pub fn entity(&self, who: Who) -> &Entity {
        &self.roster.entities()[self.index_of(who)]
    }

    pub fn entity_mut(&mut self, who: Who) -> &mut Entity {
        let index = self.index_of(who);
        &mut self.roster.entities_mut()[index]
    }

    pub fn user(&self) -> &Entity {
        self.entity(Who::User)
    }

    pub fn target(&self) -> &Entity {
        self.entity(Who::Target)
    }

    pub fn record(&mut self, result: ActionResult) {
        self.results.push(result);
    }

    /// Run a block with user and target swapped, restoring them after.
    ///
    /// Results recorded inside land in the same buffer, which is how
    /// symmetric triggers ("apply to both attacker and defender") merge back
    /// without duplicated logic.
    pub fn swapped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        std::mem::swap(&mut self.user, &mut self.target);
        let out = f(self);
        std::mem::swap(&mut self.user, &mut self.target);
        out
    }

    /// Run a block with the target collapsed onto the user.
    pub fn for_user<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.target;
        self.target = self.user;
        let out = f(self);
        self.target = saved;
        out
    }

    // ========================================================================
    // Acting-action scratch storage
    // ========================================================================
    //
    // The handle is re-resolved on every access. If the acting action has
    // vanished mid-program (an effect removing itself), reads default to zero
    // and writes are dropped.

    pub fn action_value(&self, key: &str) -> f32 {
        self.with_values(|values| values.get(key).copied().unwrap_or(0.0))
            .unwrap_or(0.0)
    }

    pub fn set_action_value(&mut self, key: &str, value: f32) {
        self.with_values_mut(|values| {
            values.insert(key.to_owned(), value);
        });
    }

    pub fn action_times_used(&self) -> u32 {
        match self.action {
            ActionRef::Skill { owner, slot } => self
                .roster
                .get(owner)
                .and_then(|e| e.skills.get(slot))
                .map_or(0, |s| s.times_used),
            ActionRef::Effect { owner, slot } => self
                .roster
                .get(owner)
                .and_then(|e| e.effects.get(slot))
                .map_or(0, |e| e.times_used),
        }
    }

    fn with_values<R>(
        &self,
        f: impl FnOnce(&std::collections::HashMap<String, f32>) -> R,
    ) -> Option<R> {
        match self.action {
            ActionRef::Skill { owner, slot } => self
                .roster
                .get(owner)
                .and_then(|e| e.skills.get(slot))
                .map(|s| f(&s.values)),
            ActionRef::Effect { owner, slot } => self
                .roster
                .get(owner)
                .and_then(|e| e.effects.get(slot))
                .map(|e| f(&e.values)),
        }
    }

    fn with_values_mut(
        &mut self,
        f: impl FnOnce(&mut std::collections::HashMap<String, f32>),
    ) -> Option<()> {
        match self.action {
            ActionRef::Skill { owner, slot } => self
                .roster
                .get_mut(owner)
                .and_then(|e| e.skills.get_mut(slot))
                .map(|s| f(&mut s.values)),
            ActionRef::Effect { owner, slot } => self
                .roster
                .get_mut(owner)
                .and_then(|e| e.effects.get_mut(slot))
                .map(|e| f(&mut e.values)),
        }
    }
}
