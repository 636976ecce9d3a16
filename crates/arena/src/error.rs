//! Errors surfaced by the arena runtime.

use thiserror::Error;

use combat_core::CombatError;

/// Failures that abort a combat session.
///
/// There is no retry path: combat state is in-memory and re-derivable, so any
/// of these bubbles straight out of [`crate::Arena::run`].
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error("arena config needs at least one party member and one enemy")]
    EmptySide,

    #[error("combat has already been started")]
    AlreadyStarted,

    #[error("combat has already finished")]
    AlreadyFinished,

    #[error("action channel closed while awaiting a party action")]
    ActionChannelClosed,

    #[error("submitted action is for entity {provided}, expected {expected}")]
    WrongActor { expected: usize, provided: usize },
}
