//! Presentation callback: the arena's only outward signaling surface.

use async_trait::async_trait;

use crate::log::ArenaLog;

/// Hooks the presentation layer plugs into a combat.
///
/// No return values are expected synchronously; the party action requested by
/// `on_request_user_action` comes back through the separate
/// [`crate::ArenaHandle::submit_action`] entry point.
#[async_trait]
pub trait ArenaCallback: Send + Sync {
    /// A party entity is ready and the player must choose its action.
    async fn on_request_user_action(&self, index: usize);

    /// A log entry was emitted.
    async fn on_log(&self, log: ArenaLog);

    /// Combat ended. `won` is true when every enemy was defeated.
    async fn on_combat_end(&self, won: bool);
}

/// Callback that ignores everything. Useful for headless and auto-combat
/// sessions, and as a test fixture.
pub struct SilentCallback;

#[async_trait]
impl ArenaCallback for SilentCallback {
    async fn on_request_user_action(&self, _index: usize) {}

    async fn on_log(&self, _log: ArenaLog) {}

    async fn on_combat_end(&self, _won: bool) {}
}
