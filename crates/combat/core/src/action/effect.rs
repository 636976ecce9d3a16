//! Status effects: timed modifiers attached to entities.
//!
//! Like skills, effects split into shared [`EffectSpec`] definition data and
//! per-attachment [`Effect`] instances. An attached effect can bend derived
//! stats through its modifiers, freeze its carrier, and run a per-turn
//! program (`apply_on`) after the carrier acts.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::expr::Extra;
use crate::stats::{RateKind, StatKind};

/// What a single modifier entry bends.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ModifierTarget {
    /// Multiplicative stat: contribution folds into `base × (1 + Σ)`.
    Stat(StatKind),
    /// Additive rate stat: contribution folds into `base_constant + Σ`.
    Rate(RateKind),
}

/// One stat-rate offset carried by an effect, scaled by tier.
///
/// Contribution of an attached effect at tier `t` is
/// `offset + (t − 1) × tier_bonus`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    pub target: ModifierTarget,
    pub offset: f32,
    #[serde(default)]
    pub tier_bonus: f32,
}

/// Shared, immutable definition of a status effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub name: String,
    /// Stackable effects coexist freely; nonstackable duplicates fight for
    /// the single slot by rank.
    #[serde(default)]
    pub stackable: bool,
    /// Carrier skips its action while this is attached.
    #[serde(default)]
    pub freeze: bool,
    #[serde(default)]
    pub modifiers: Vec<StatModifier>,
    /// Per-turn program, run after the carrier's turn.
    #[serde(default)]
    pub apply_on: Option<Extra>,
}

/// One attachment of an effect to an entity.
#[derive(Clone, Debug)]
pub struct Effect {
    pub spec: Arc<EffectSpec>,
    pub tier: u32,
    pub turns_left: i32,
    /// Roster index of the entity that attached this effect.
    pub user: usize,
    /// Session-scoped scratch storage, same contract as skill values.
    pub values: HashMap<String, f32>,
    pub times_used: u32,
    pub times_repeated: u32,
}

impl Effect {
    pub fn new(spec: Arc<EffectSpec>, tier: u32, turns_left: i32, user: usize) -> Self {
        Self {
            spec,
            tier,
            turns_left,
            user,
            values: HashMap::new(),
            times_used: 0,
            times_repeated: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Contribution of this attachment toward one modifier target.
    pub fn contribution(&self, target: ModifierTarget) -> f32 {
        self.spec
            .modifiers
            .iter()
            .filter(|m| m.target == target)
            .map(|m| m.offset + (self.tier.saturating_sub(1)) as f32 * m.tier_bonus)
            .sum()
    }

    /// Replacement rank for nonstackable duplicates: tier first, remaining
    /// turns as tie-break. A new effect replaces an old one when
    /// `new.rank() >= old.rank()`.
    pub fn rank(&self) -> (u32, i32) {
        (self.tier, self.turns_left)
    }
}
