//! Client-facing handle for submitting party actions.

use tokio::sync::mpsc;

use crate::error::ArenaError;

/// A chosen skill invocation: which entity acts, with which skill slot,
/// against which roster indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillExecution {
    pub user: usize,
    pub slot: usize,
    pub targets: Vec<usize>,
}

/// Cloneable handle over the capacity-1 action handoff channel.
///
/// The arena requests at most one party action at a time (via
/// [`crate::ArenaCallback::on_request_user_action`]) and blocks on the
/// channel until the presentation layer answers here — one pending receive,
/// resolved exactly once per request.
#[derive(Clone)]
pub struct ArenaHandle {
    action_tx: mpsc::Sender<SkillExecution>,
}

impl ArenaHandle {
    pub(crate) fn new(action_tx: mpsc::Sender<SkillExecution>) -> Self {
        Self { action_tx }
    }

    /// Submit the action for the entity currently awaiting one.
    pub async fn submit_action(&self, execution: SkillExecution) -> Result<(), ArenaError> {
        self.action_tx
            .send(execution)
            .await
            .map_err(|_| ArenaError::ActionChannelClosed)
    }
}
