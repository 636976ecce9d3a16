//! Per-combat orchestration on top of `combat-core`.
//!
//! The [`Arena`] owns one combat session: it spawns the participants from an
//! [`ArenaConfig`], runs the AP-based tick loop, resolves actions through the
//! core executor, and streams [`ArenaLog`] entries to a presentation
//! [`ArenaCallback`]. Party actions arrive through the capacity-1 handoff
//! channel behind [`ArenaHandle::submit_action`]; everyone else acts through
//! the random AI policy.
//!
//! The whole loop is one sequential unit of cooperative work — suspension
//! points are pacing delays and the action handoff — so entity state needs no
//! locking, and dropping the `run` future cancels a combat cleanly at any
//! await.

mod ai;
mod arena;
mod callback;
mod config;
mod error;
mod handle;
mod log;

pub use ai::random_skill_execution_for;
pub use arena::{Arena, ArenaState, Outcome};
pub use callback::{ArenaCallback, SilentCallback};
pub use config::{ArenaConfig, MemberSpec};
pub use error::ArenaError;
pub use handle::{ArenaHandle, SkillExecution};
pub use log::ArenaLog;
