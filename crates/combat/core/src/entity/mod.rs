//! Combat participants and the roster that owns them.
//!
//! An [`Entity`] is plain mutable state: base stats fixed at spawn, derived
//! stats recomputed from scratch whenever the attached effect set changes,
//! and clamped current resources. All mutation happens on the single logical
//! sequence driving a combat, so nothing here is synchronized.

mod shield;
mod spawn;

use std::collections::HashMap;
use std::sync::Arc;

use strum::IntoEnumIterator;

pub use shield::Shield;
pub use spawn::{CarriedState, spawn_entity};

use crate::action::{Effect, ModifierTarget, Skill};
use crate::archive::Category;
use crate::expr::Extra;
use crate::stats::{RateKind, StatKind};

/// Base stats fixed at instantiation (level- and plugin-scaled).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseStats {
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
    pub hp: i32,
    pub sp: i32,
    pub ap: i32,
}

/// Baseline rate constants for one entity.
///
/// Starts from the global rate constants, with plugin flat additions folded
/// in at spawn. Effect recomputation folds offsets on top of these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateBases {
    pub crit_rate: f32,
    pub crit_dmg: f32,
    pub target_rate: f32,
    pub hide_rate: f32,
    pub attack_rate: f32,
    pub defend_rate: f32,
}

impl Default for RateBases {
    fn default() -> Self {
        Self {
            crit_rate: RateKind::CritRate.base(),
            crit_dmg: RateKind::CritDmg.base(),
            target_rate: RateKind::TargetRate.base(),
            hide_rate: RateKind::HideRate.base(),
            attack_rate: RateKind::AttackRate.base(),
            defend_rate: RateKind::DefendRate.base(),
        }
    }
}

impl RateBases {
    fn get(&self, kind: RateKind) -> f32 {
        match kind {
            RateKind::CritRate => self.crit_rate,
            RateKind::CritDmg => self.crit_dmg,
            RateKind::TargetRate => self.target_rate,
            RateKind::HideRate => self.hide_rate,
            RateKind::AttackRate => self.attack_rate,
            RateKind::DefendRate => self.defend_rate,
        }
    }
}

/// One combat participant.
#[derive(Clone, Debug)]
pub struct Entity {
    /// Flat arena index (parties first). Assigned by the roster.
    pub index: usize,
    pub is_party: bool,
    pub name: String,
    pub level: u32,
    pub primary_category: Category,
    pub secondary_category: Option<Category>,

    pub base: BaseStats,
    pub rate_bases: RateBases,

    // Derived stats, recomputed from base whenever effects change.
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
    pub max_hp: i32,
    pub max_sp: i32,
    pub max_ap: i32,
    pub crit_rate: f32,
    pub crit_dmg: f32,
    pub target_rate: f32,
    pub hide_rate: f32,
    pub attack_rate: f32,
    pub defend_rate: f32,

    // Current resources. HP/SP clamped to [0, max]; AP unbounded transiently.
    pub hp: i32,
    pub sp: i32,
    pub ap: f32,
    /// AP gained per tick, derived from SPD.
    pub ap_recovery: f32,

    pub effects: Vec<Effect>,
    pub shields: HashMap<String, Shield>,
    /// Baseline slots 0..3 (attack/defend/relax), learned functions after.
    pub skills: Vec<Skill>,

    /// Trigger run after this entity lands a damaging hit.
    pub on_attack: Option<Arc<Extra>>,
    /// Trigger run after this entity takes a damaging hit.
    pub on_defend: Option<Arc<Extra>>,

    /// First-defeat latch; set once when HP reaches 0, cleared on revival.
    pub failed: bool,
}

impl Entity {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        self.hp as f32 / self.max_hp as f32
    }

    pub fn sp_ratio(&self) -> f32 {
        if self.max_sp <= 0 {
            return 0.0;
        }
        self.sp as f32 / self.max_sp as f32
    }

    /// One scheduler tick: accrue AP.
    pub fn tick(&mut self) {
        self.ap += self.ap_recovery;
    }

    pub fn ready(&self) -> bool {
        self.ap >= self.max_ap as f32
    }

    /// Adjust HP, clamped to `[0, max_hp]`.
    pub fn change_hp(&mut self, delta: i32) {
        self.hp = (self.hp + delta).clamp(0, self.max_hp);
    }

    /// Adjust SP, clamped to `[0, max_sp]`.
    pub fn change_sp(&mut self, delta: i32) {
        self.sp = (self.sp + delta).clamp(0, self.max_sp);
    }

    /// Adjust AP. Intentionally unclamped in both directions.
    pub fn change_ap(&mut self, delta: f32) {
        self.ap += delta;
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e.name() == name)
    }

    pub fn has_shield(&self, key: &str) -> bool {
        self.shields.contains_key(key)
    }

    /// True while any attached effect is a freeze.
    pub fn is_frozen(&self) -> bool {
        self.effects.iter().any(|e| e.spec.freeze)
    }

    /// Whether the given category matches either of this entity's categories.
    pub fn in_category(&self, category: Category) -> bool {
        self.primary_category == category || self.secondary_category == Some(category)
    }

    /// Drop all session-scoped scratch state. Called on defeat and at combat
    /// end.
    pub fn clear_session_values(&mut self) {
        for skill in &mut self.skills {
            skill.values.clear();
        }
        for effect in &mut self.effects {
            effect.values.clear();
        }
    }

    // ========================================================================
    // Effect attachment (low-level; replacement policy lives in the executor)
    // ========================================================================

    /// Attach an effect and recompute derived stats.
    pub fn attach_effect(&mut self, effect: Effect) {
        let needs_recompute = !effect.spec.modifiers.is_empty();
        self.effects.push(effect);
        if needs_recompute {
            self.recompute_stats();
        }
    }

    /// Detach the effect at `slot` and recompute derived stats.
    pub fn detach_effect(&mut self, slot: usize) -> Option<Effect> {
        if slot >= self.effects.len() {
            return None;
        }
        let effect = self.effects.remove(slot);
        if !effect.spec.modifiers.is_empty() {
            self.recompute_stats();
        }
        Some(effect)
    }

    /// Recompute every derived stat from base and the attached effect set.
    ///
    /// Recompute-from-base rather than incremental deltas: effects stack,
    /// expire, and are removed in arbitrary order, and folding from scratch
    /// cannot drift or double-count.
    pub fn recompute_stats(&mut self) {
        for kind in StatKind::iter() {
            let rate = 1.0 + self.fold(ModifierTarget::Stat(kind));
            match kind {
                StatKind::Atk => self.atk = scaled(self.base.atk, rate),
                StatKind::Def => self.def = scaled(self.base.def, rate),
                StatKind::Spd => self.spd = scaled(self.base.spd, rate),
                StatKind::MaxHp => self.max_hp = scaled(self.base.hp, rate),
                StatKind::MaxSp => self.max_sp = scaled(self.base.sp, rate),
                StatKind::MaxAp => self.max_ap = scaled(self.base.ap, rate),
            }
        }

        for kind in RateKind::iter() {
            let value = (self.rate_bases.get(kind) + self.fold(ModifierTarget::Rate(kind))).max(0.0);
            match kind {
                RateKind::CritRate => self.crit_rate = value,
                RateKind::CritDmg => self.crit_dmg = value,
                RateKind::TargetRate => self.target_rate = value,
                RateKind::HideRate => self.hide_rate = value,
                RateKind::AttackRate => self.attack_rate = value,
                RateKind::DefendRate => self.defend_rate = value,
            }
        }

        // A lowered max must pull the current resource down with it.
        self.hp = self.hp.clamp(0, self.max_hp);
        self.sp = self.sp.clamp(0, self.max_sp);

        self.ap_recovery = ap_recovery(self.spd);
    }

    fn fold(&self, target: ModifierTarget) -> f32 {
        self.effects.iter().map(|e| e.contribution(target)).sum()
    }

    // ========================================================================
    // Shields
    // ========================================================================

    /// Absorb `amount` through shields, shortest-lived first.
    ///
    /// Shields are consumed in ascending `turns_left` order with permanent
    /// shields last (key order breaks ties for determinism). Exhausted
    /// shields are removed; the keys of removed shields are returned together
    /// with the total amount absorbed.
    pub fn absorb(&mut self, amount: i32) -> (i32, Vec<String>) {
        let mut order: Vec<String> = self.shields.keys().cloned().collect();
        order.sort_by(|a, b| {
            let ta = self.shields[a].turns_left;
            let tb = self.shields[b].turns_left;
            match (ta, tb) {
                (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.cmp(b),
            }
        });

        let mut remaining = amount;
        let mut removed = Vec::new();
        for key in order {
            if remaining <= 0 {
                break;
            }
            let shield = self.shields.get_mut(&key).expect("key from shield map");
            let soaked = shield.value.min(remaining);
            shield.value -= soaked;
            remaining -= soaked;
            if shield.exhausted() {
                self.shields.remove(&key);
                removed.push(key);
            }
        }

        (amount - remaining, removed)
    }

    /// End-of-turn shield upkeep: decrement timed shields, drop expired ones.
    pub fn tick_shields(&mut self) -> Vec<String> {
        for shield in self.shields.values_mut() {
            if let Some(turns) = shield.turns_left.as_mut() {
                *turns -= 1;
            }
        }
        let expired: Vec<String> = self
            .shields
            .iter()
            .filter(|(_, s)| s.exhausted())
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            self.shields.remove(key);
        }
        expired
    }
}

/// `stat = max(1, base × rate)`, truncating toward zero.
fn scaled(base: i32, rate: f32) -> i32 {
    ((base as f32 * rate) as i32).max(1)
}

/// AP gained per tick for a SPD value: `(1 + 10·spd/(1000+spd)) / 3`.
pub fn ap_recovery(spd: i32) -> f32 {
    let spd = spd as f32;
    (1.0 + 10.0 * spd / (1000.0 + spd)) / 3.0
}

// ============================================================================
// Roster
// ============================================================================

/// Flat, index-addressed set of all combat participants, parties first.
///
/// Owns every entity for the lifetime of one combat. All result addressing
/// (`from`/`to`) uses roster indices.
#[derive(Clone, Debug)]
pub struct Roster {
    entities: Vec<Entity>,
    party_count: usize,
}

impl Roster {
    pub fn new(parties: Vec<Entity>, enemies: Vec<Entity>) -> Self {
        let party_count = parties.len();
        let mut entities = parties;
        entities.extend(enemies);
        for (index, entity) in entities.iter_mut().enumerate() {
            entity.index = index;
            entity.is_party = index < party_count;
        }
        Self {
            entities,
            party_count,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(index)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn parties(&self) -> &[Entity] {
        &self.entities[..self.party_count]
    }

    pub fn enemies(&self) -> &[Entity] {
        &self.entities[self.party_count..]
    }

    /// Indices of living entities on the given side.
    pub fn living_on_side(&self, is_party: bool) -> Vec<usize> {
        self.entities
            .iter()
            .filter(|e| e.is_party == is_party && e.is_alive())
            .map(|e| e.index)
            .collect()
    }

    pub fn side_defeated(&self, is_party: bool) -> bool {
        self.entities
            .iter()
            .filter(|e| e.is_party == is_party)
            .all(|e| !e.is_alive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{EffectSpec, StatModifier};
    use crate::test_support::sample_entity;

    fn atk_up(offset: f32) -> Effect {
        Effect::new(
            Arc::new(EffectSpec {
                name: "optimized".into(),
                stackable: true,
                freeze: false,
                modifiers: vec![StatModifier {
                    target: ModifierTarget::Stat(StatKind::Atk),
                    offset,
                    tier_bonus: 0.0,
                }],
                apply_on: None,
            }),
            1,
            3,
            0,
        )
    }

    #[test]
    fn hp_clamps_to_bounds() {
        let mut entity = sample_entity(0, true);
        entity.change_hp(-(entity.max_hp * 2));
        assert_eq!(entity.hp, 0);
        entity.change_hp(entity.max_hp * 3);
        assert_eq!(entity.hp, entity.max_hp);
    }

    #[test]
    fn ap_is_unclamped() {
        let mut entity = sample_entity(0, true);
        entity.change_ap(-500.0);
        assert!(entity.ap < 0.0);
        entity.change_ap(10_000.0);
        assert!(entity.ap > entity.max_ap as f32);
    }

    #[test]
    fn recompute_restores_exactly_after_detach() {
        let mut entity = sample_entity(0, true);
        let before = (entity.atk, entity.def, entity.spd, entity.max_hp);

        entity.attach_effect(atk_up(0.5));
        assert!(entity.atk > before.0);

        entity.detach_effect(0);
        assert_eq!(
            (entity.atk, entity.def, entity.spd, entity.max_hp),
            before
        );
    }

    #[test]
    fn lowered_max_pulls_current_down() {
        let mut entity = sample_entity(0, true);
        let shrink = Effect::new(
            Arc::new(EffectSpec {
                name: "leak".into(),
                stackable: false,
                freeze: false,
                modifiers: vec![StatModifier {
                    target: ModifierTarget::Stat(StatKind::MaxHp),
                    offset: -0.5,
                    tier_bonus: 0.0,
                }],
                apply_on: None,
            }),
            1,
            2,
            0,
        );
        entity.attach_effect(shrink);
        assert!(entity.hp <= entity.max_hp);
    }

    #[test]
    fn shields_absorb_shortest_lived_first() {
        let mut entity = sample_entity(0, true);
        entity.shields.insert("wall".into(), Shield::new(30, None));
        entity
            .shields
            .insert("guard".into(), Shield::new(20, Some(2)));
        entity
            .shields
            .insert("ward".into(), Shield::new(10, Some(1)));

        let (absorbed, removed) = entity.absorb(25);
        assert_eq!(absorbed, 25);
        // 10 from "ward" (1 turn), 15 from "guard" (2 turns), permanent untouched.
        assert_eq!(removed, vec!["ward".to_string()]);
        assert_eq!(entity.shields["guard"].value, 5);
        assert_eq!(entity.shields["wall"].value, 30);
    }

    #[test]
    fn overkill_continues_to_next_shield() {
        let mut entity = sample_entity(0, true);
        entity.shields.insert("a".into(), Shield::new(10, Some(1)));
        entity.shields.insert("b".into(), Shield::new(10, Some(2)));

        let (absorbed, removed) = entity.absorb(100);
        assert_eq!(absorbed, 20);
        assert_eq!(removed.len(), 2);
        assert!(entity.shields.is_empty());
    }

    #[test]
    fn ap_recovery_follows_spd_curve() {
        assert!((ap_recovery(0) - 1.0 / 3.0).abs() < 1e-6);
        let slow = ap_recovery(10);
        let fast = ap_recovery(100);
        assert!(fast > slow);
        // Curve saturates below (1 + 10) / 3.
        assert!(ap_recovery(1_000_000) < 11.0 / 3.0);
    }
}
