//! Actions: skills and effects, plus the results their resolution produces.
//!
//! Both action kinds share the spec/instance split — immutable `Arc`-shared
//! definitions from the archive, per-entity instance state in the roster —
//! and both are addressed during execution through [`ActionRef`] handles so
//! the evaluator never holds a borrow into the roster across a mutation.

mod effect;
mod result;
mod skill;

pub use effect::{Effect, EffectSpec, ModifierTarget, StatModifier};
pub use result::ActionResult;
pub use skill::{AttackModifier, BASELINE_SKILLS, FunctionTarget, Skill, SkillSpec};

/// Handle to the action currently being resolved.
///
/// Indexes into the roster (`owner`) and the owner's skill or effect list
/// (`slot`). Slots are re-resolved on every access: an effect can legally
/// remove itself mid-program, after which scratch reads default to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionRef {
    Skill { owner: usize, slot: usize },
    Effect { owner: usize, slot: usize },
}
