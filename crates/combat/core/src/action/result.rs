//! Results produced by action resolution.

use serde::{Deserialize, Serialize};

/// Outcome of one resolved step of an action.
///
/// Every variant addresses entities by flat roster index (`from` acted on
/// `to`). The executor records these in order; the arena turns them into log
/// entries and the presentation layer renders them. Gameplay-expected failure
/// states (`Missed`, `NoEffect`) live here, not in the error type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActionResult {
    /// Damage dealt to `to`.
    Damage {
        from: usize,
        to: usize,
        /// Full damage before shields.
        damage: i32,
        /// Portion absorbed by shields.
        shielded: i32,
        /// Portion capped at the target's current HP, for display.
        coerced: i32,
        critical: bool,
    },

    /// Healing applied to `to`.
    Heal {
        from: usize,
        to: usize,
        /// Raw heal amount.
        amount: i32,
        /// Portion capped at the target's missing HP, for display.
        coerced: i32,
    },

    /// Direct SP adjustment (clamped to `[0, max_sp]`).
    SpChange { from: usize, to: usize, amount: i32 },

    /// Direct AP adjustment (intentionally unclamped).
    ApChange { from: usize, to: usize, amount: f32 },

    /// A status effect was attached to `to`.
    AttachEffect {
        from: usize,
        to: usize,
        effect: String,
    },

    /// A status effect was removed from `to`.
    RemoveEffect {
        from: usize,
        to: usize,
        effect: String,
    },

    /// A shield was attached to `to`.
    AttachShield {
        from: usize,
        to: usize,
        key: String,
        value: i32,
    },

    /// A shield was removed from `to`.
    RemoveShield { from: usize, to: usize, key: String },

    /// The attack missed.
    Missed { from: usize, to: usize },

    /// The action resolved without changing any state.
    NoEffect { from: usize, to: usize },
}

impl ActionResult {
    /// Roster index of the acting entity.
    pub fn from_index(&self) -> usize {
        match *self {
            ActionResult::Damage { from, .. }
            | ActionResult::Heal { from, .. }
            | ActionResult::SpChange { from, .. }
            | ActionResult::ApChange { from, .. }
            | ActionResult::AttachEffect { from, .. }
            | ActionResult::RemoveEffect { from, .. }
            | ActionResult::AttachShield { from, .. }
            | ActionResult::RemoveShield { from, .. }
            | ActionResult::Missed { from, .. }
            | ActionResult::NoEffect { from, .. } => from,
        }
    }

    /// Roster index of the affected entity.
    pub fn to_index(&self) -> usize {
        match *self {
            ActionResult::Damage { to, .. }
            | ActionResult::Heal { to, .. }
            | ActionResult::SpChange { to, .. }
            | ActionResult::ApChange { to, .. }
            | ActionResult::AttachEffect { to, .. }
            | ActionResult::RemoveEffect { to, .. }
            | ActionResult::AttachShield { to, .. }
            | ActionResult::RemoveShield { to, .. }
            | ActionResult::Missed { to, .. }
            | ActionResult::NoEffect { to, .. } => to,
        }
    }

    /// True if this result can change the affected entity's HP.
    pub fn touches_hp(&self) -> bool {
        matches!(
            self,
            ActionResult::Damage { .. } | ActionResult::Heal { .. }
        )
    }
}
