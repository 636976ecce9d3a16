//! Log entries emitted during a combat for front-ends to render.

use serde::{Deserialize, Serialize};

use combat_core::ActionResult;

/// One entry of the combat log.
///
/// The arena appends entries in emission order; presentation prepends them
/// for newest-first display. Consumers pattern-match exhaustively.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ArenaLog {
    /// Combat opened against the named enemies.
    Welcome { enemies: Vec<String> },

    /// An entity invoked a skill against the listed targets.
    FunctionInvoked {
        index: usize,
        function: String,
        targets: Vec<usize>,
    },

    /// An attached effect ran its per-turn program.
    EffectApplied { index: usize, effect: String },

    /// An entity skipped its action because of a freeze effect.
    Frozen { index: usize },

    /// One resolved action result.
    Results(ActionResult),

    /// HP bar refresh for an entity whose HP changed.
    HpBar {
        index: usize,
        hp: i32,
        max_hp: i32,
    },

    /// First-time defeat of an entity.
    Defeated { index: usize },

    /// A previously defeated entity came back above zero HP.
    Revived { index: usize },

    /// All enemies defeated.
    Win,

    /// All party members defeated.
    Lose,
}
