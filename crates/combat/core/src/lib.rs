//! Deterministic combat rules for the code-versus-bugs RPG.
//!
//! `combat-core` defines the canonical combat model — entities, skills,
//! effects, shields, the expression language they are authored in, and the
//! single-execution resolution pipeline. Everything here is synchronous and
//! deterministic given an injected random source; the arena runtime drives
//! it and supporting crates depend on the types re-exported here.

pub mod action;
pub mod archive;
pub mod config;
pub mod entity;
pub mod error;
pub mod execute;
pub mod expr;
pub mod rng;
pub mod stats;

pub use action::{
    ActionRef, ActionResult, AttackModifier, BASELINE_SKILLS, Effect, EffectSpec, FunctionTarget,
    ModifierTarget, Skill, SkillSpec, StatModifier,
};
pub use archive::{
    Archive, Category, CategoryEffectiveness, EntityData, EntityGrowth, PluginData,
};
pub use config::CombatConfig;
pub use entity::{BaseStats, CarriedState, Entity, Roster, Shield, spawn_entity};
pub use error::CombatError;
pub use execute::{EffectTurn, execute_skill, process_effect_turns, single_execute};
pub use expr::{Condition, DamageScope, ExecContext, Extra, StatQuery, Value, Who};
pub use rng::{CombatRng, PcgRng, SequenceRng};
pub use stats::{RateKind, StatKind};

#[cfg(test)]
pub(crate) mod test_support;
