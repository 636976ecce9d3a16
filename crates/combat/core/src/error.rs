//! Error types for the combat core.
//!
//! Only data-authoring and precondition failures are errors. Gameplay-expected
//! failure states (miss, full shield absorb, ineffective effect replacement)
//! are ordinary [`crate::action::ActionResult`] variants, never `Err`.

use crate::archive::Category;

/// Fatal configuration or invariant errors surfaced by the combat core.
///
/// Any of these aborts the current combat session; state is in-memory and
/// re-derivable from the pre-combat save, so no recovery is attempted.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    /// No growth table registered for a category.
    #[error("no growth table registered for category {category:?}")]
    GrowthNotRegistered { category: Category },

    /// Entity name not present in the archive.
    #[error("entity {name:?} not found in archive")]
    UnknownEntity { name: String },

    /// Learned function name not present in the archive.
    #[error("skill {name:?} not found in archive")]
    UnknownSkill { name: String },

    /// Single-action resolution was invoked on a non-skill action.
    #[error("single execution requires a skill, got an effect")]
    NotASkill,

    /// An action referenced a roster index that does not exist.
    #[error("entity index {index} out of roster bounds")]
    IndexOutOfBounds { index: usize },

    /// An action referenced a skill slot the user does not have.
    #[error("skill slot {slot} out of bounds for entity {index}")]
    SkillSlotOutOfBounds { index: usize, slot: usize },
}
