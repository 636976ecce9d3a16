//! The per-combat orchestrator.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use combat_core::{
    ActionResult, Archive, CombatConfig, CombatError, CombatRng, Entity, PcgRng, Roster,
    execute_skill, process_effect_turns, spawn_entity,
};

use crate::ai::random_skill_execution_for;
use crate::callback::ArenaCallback;
use crate::config::{ArenaConfig, MemberSpec};
use crate::error::ArenaError;
use crate::handle::{ArenaHandle, SkillExecution};
use crate::log::ArenaLog;

/// Lifecycle of one combat session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaState {
    NotStarted,
    Combating,
    Finished(Outcome),
}

/// How a finished combat ended, from the party's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
}

// Base pacing delays in milliseconds, divided by the play-speed factor.
const TICK_DELAY_MS: u64 = 250;
const FROZEN_DELAY_MS: u64 = 350;
const RESULT_DELAY_TOTAL_MS: u64 = 1200;
const RESULT_DELAY_CAP_MS: u64 = 400;

/// One combat session: owns the roster, drives the tick loop, streams logs.
///
/// Multiple arenas are fully independent — a live combat and an emulator
/// preview can run side by side without sharing any state.
pub struct Arena {
    roster: Roster,
    archive: Arc<dyn Archive>,
    callback: Arc<dyn ArenaCallback>,
    rng: Box<dyn CombatRng>,
    state: ArenaState,
    play_speed: u32,
    auto_combat: bool,
    logs: Vec<ArenaLog>,
    /// Last skill slot each entity invoked, for repeat tracking.
    last_slots: Vec<Option<usize>>,
    action_tx: mpsc::Sender<SkillExecution>,
    action_rx: mpsc::Receiver<SkillExecution>,
}

impl Arena {
    /// Build a combat session from its config.
    ///
    /// Spawns every member from the archive (parties first in the flat index
    /// space). Missing entity records or growth tables fail fast here, before
    /// any combat state exists.
    pub fn new(
        config: ArenaConfig,
        archive: Arc<dyn Archive>,
        callback: Arc<dyn ArenaCallback>,
    ) -> Result<Self, ArenaError> {
        if config.parties.is_empty() || config.enemies.is_empty() {
            return Err(ArenaError::EmptySide);
        }

        let combat_config = CombatConfig::default();
        let parties = spawn_side(&config.parties, archive.as_ref(), &combat_config)?;
        let enemies = spawn_side(&config.enemies, archive.as_ref(), &combat_config)?;
        let roster = Roster::new(parties, enemies);

        let seed = config.seed.unwrap_or_else(rand::random);
        let (action_tx, action_rx) = mpsc::channel(1);
        let last_slots = vec![None; roster.len()];

        Ok(Self {
            roster,
            archive,
            callback,
            rng: Box::new(PcgRng::new(seed)),
            state: ArenaState::NotStarted,
            play_speed: config.play_speed,
            auto_combat: config.auto_combat,
            logs: Vec::new(),
            last_slots,
            action_tx,
            action_rx,
        })
    }

    /// Replace the random source, e.g. with a scripted one for tests.
    pub fn with_rng(mut self, rng: Box<dyn CombatRng>) -> Self {
        self.rng = rng;
        self
    }

    /// Cloneable handle for submitting party actions.
    pub fn handle(&self) -> ArenaHandle {
        ArenaHandle::new(self.action_tx.clone())
    }

    pub fn state(&self) -> ArenaState {
        self.state
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Every log entry emitted so far, in emission order.
    pub fn logs(&self) -> &[ArenaLog] {
        &self.logs
    }

    /// Drive the combat to completion.
    ///
    /// Emits the welcome log, then ticks until one side is fully defeated.
    /// Cancellation is cooperative: dropping this future at any await aborts
    /// the combat cleanly, and already-emitted logs remain valid.
    pub async fn run(&mut self) -> Result<Outcome, ArenaError> {
        match self.state {
            ArenaState::NotStarted => {}
            ArenaState::Combating => return Err(ArenaError::AlreadyStarted),
            ArenaState::Finished(_) => return Err(ArenaError::AlreadyFinished),
        }
        self.state = ArenaState::Combating;

        let enemies = self
            .roster
            .enemies()
            .iter()
            .map(|e| e.name.clone())
            .collect();
        self.emit(ArenaLog::Welcome { enemies }).await;

        loop {
            if let Some(outcome) = self.tick().await? {
                return Ok(outcome);
            }
            self.pace(TICK_DELAY_MS).await;
        }
    }

    /// One discrete step of the combat. Returns the outcome once decided.
    async fn tick(&mut self) -> Result<Option<Outcome>, ArenaError> {
        // 1. Every living entity accrues AP.
        for entity in self.roster.entities_mut() {
            if entity.is_alive() {
                entity.tick();
            }
        }

        // 2. Ready entities act in descending SPD order; the stable sort
        //    keeps roster order on ties.
        let mut ready: Vec<usize> = self
            .roster
            .entities()
            .iter()
            .filter(|e| e.is_alive() && e.ready())
            .map(|e| e.index)
            .collect();
        ready.sort_by_key(|&index| std::cmp::Reverse(self.roster.entities()[index].spd));
        debug!(ready = ready.len(), "tick");

        for actor in ready {
            // Defeated earlier in this same tick.
            if !self.roster.entities()[actor].is_alive() {
                continue;
            }
            if let Some(outcome) = self.take_turn(actor).await? {
                return Ok(Some(outcome));
            }
        }

        Ok(None)
    }

    /// Steps 3–8 for one ready entity.
    async fn take_turn(&mut self, actor: usize) -> Result<Option<Outcome>, ArenaError> {
        // 3–5. Act, unless frozen; defeat and termination checks follow the
        // action.
        if self.roster.entities()[actor].is_frozen() {
            debug!(actor, "frozen, action skipped");
            self.emit(ArenaLog::Frozen { index: actor }).await;
            self.pace(FROZEN_DELAY_MS).await;
        } else {
            let execution = self.select_action(actor).await?;
            if execution.user != actor {
                return Err(ArenaError::WrongActor {
                    expected: actor,
                    provided: execution.user,
                });
            }
            let function = self.roster.entities()[actor]
                .skills
                .get(execution.slot)
                .ok_or(CombatError::SkillSlotOutOfBounds {
                    index: actor,
                    slot: execution.slot,
                })?
                .name()
                .to_owned();
            debug!(actor, %function, targets = ?execution.targets, "function invoked");

            let repeated = self.last_slots[actor] == Some(execution.slot);
            {
                let skill = &mut self.roster.entities_mut()[actor].skills[execution.slot];
                skill.times_repeated = if repeated { skill.times_repeated + 1 } else { 0 };
            }
            self.last_slots[actor] = Some(execution.slot);

            self.emit(ArenaLog::FunctionInvoked {
                index: actor,
                function,
                targets: execution.targets.clone(),
            })
            .await;

            let results = execute_skill(
                &mut self.roster,
                self.archive.as_ref(),
                self.rng.as_mut(),
                actor,
                execution.slot,
                &execution.targets,
            )?;
            self.stream_results(&results).await;

            // Side effects can hurt the actor too.
            let mut touched = execution.targets.clone();
            touched.push(actor);
            self.check_defeats(&touched).await;
            if let Some(outcome) = self.check_termination().await {
                return Ok(Some(outcome));
            }
        }

        // 6. The full AP bar is spent whether or not the action happened.
        {
            let entity = &mut self.roster.entities_mut()[actor];
            entity.ap -= entity.max_ap as f32;
        }

        // 7. Per-turn effect programs, with defeat re-checks after each.
        let turns = process_effect_turns(
            &mut self.roster,
            self.archive.as_ref(),
            self.rng.as_mut(),
            actor,
        )?;
        for turn in turns {
            self.emit(ArenaLog::EffectApplied {
                index: actor,
                effect: turn.effect,
            })
            .await;
            self.stream_results(&turn.results).await;

            let touched: Vec<usize> = turn.results.iter().map(|r| r.to_index()).collect();
            self.check_defeats(&touched).await;
            if let Some(outcome) = self.check_termination().await {
                return Ok(Some(outcome));
            }
        }

        // 8. Shield upkeep.
        self.roster.entities_mut()[actor].tick_shields();

        Ok(None)
    }

    /// Party members wait on the handoff channel; everyone else rolls the
    /// random policy.
    async fn select_action(&mut self, actor: usize) -> Result<SkillExecution, ArenaError> {
        let is_party = self.roster.entities()[actor].is_party;
        if is_party && !self.auto_combat {
            self.callback.on_request_user_action(actor).await;
            self.action_rx
                .recv()
                .await
                .ok_or(ArenaError::ActionChannelClosed)
        } else {
            Ok(random_skill_execution_for(
                &self.roster,
                self.rng.as_mut(),
                actor,
            ))
        }
    }

    /// Stream results and HP-bar refreshes, paced inversely to result count.
    async fn stream_results(&mut self, results: &[ActionResult]) {
        if results.is_empty() {
            return;
        }
        let delay = (RESULT_DELAY_TOTAL_MS / results.len() as u64).min(RESULT_DELAY_CAP_MS);

        let mut hp_changed = Vec::new();
        for result in results {
            self.emit(ArenaLog::Results(result.clone())).await;
            self.pace(delay).await;
            if result.touches_hp() && !hp_changed.contains(&result.to_index()) {
                hp_changed.push(result.to_index());
            }
        }

        for index in hp_changed {
            let entity = &self.roster.entities()[index];
            let (hp, max_hp) = (entity.hp, entity.max_hp);
            self.emit(ArenaLog::HpBar { index, hp, max_hp }).await;
            self.pace(delay).await;
        }
    }

    /// First-time defeat and revival bookkeeping for the touched entities.
    async fn check_defeats(&mut self, touched: &[usize]) {
        let mut seen = Vec::new();
        for &index in touched {
            if seen.contains(&index) {
                continue;
            }
            seen.push(index);

            let log = {
                let entity = &mut self.roster.entities_mut()[index];
                if !entity.is_alive() && !entity.failed {
                    entity.failed = true;
                    entity.ap = 0.0;
                    entity.clear_session_values();
                    Some(ArenaLog::Defeated { index })
                } else if entity.is_alive() && entity.failed {
                    entity.failed = false;
                    Some(ArenaLog::Revived { index })
                } else {
                    None
                }
            };
            if let Some(log) = log {
                self.emit(log).await;
            }
        }
    }

    /// Lose is evaluated before win: a mutual wipe counts against the party.
    async fn check_termination(&mut self) -> Option<Outcome> {
        if self.roster.side_defeated(true) {
            self.emit(ArenaLog::Lose).await;
            self.state = ArenaState::Finished(Outcome::Lose);
            self.callback.on_combat_end(false).await;
            return Some(Outcome::Lose);
        }
        if self.roster.side_defeated(false) {
            self.emit(ArenaLog::Win).await;
            self.state = ArenaState::Finished(Outcome::Win);
            self.callback.on_combat_end(true).await;
            return Some(Outcome::Win);
        }
        None
    }

    async fn emit(&mut self, log: ArenaLog) {
        self.logs.push(log.clone());
        self.callback.on_log(log).await;
    }

    /// Presentation pacing: `base / play_speed`, skipped entirely at speed 0.
    async fn pace(&self, base_ms: u64) {
        if self.play_speed == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(base_ms / self.play_speed as u64)).await;
    }
}

fn spawn_side(
    members: &[MemberSpec],
    archive: &dyn Archive,
    config: &CombatConfig,
) -> Result<Vec<Entity>, ArenaError> {
    members
        .iter()
        .map(|member| {
            let data = archive
                .entity(&member.name)
                .ok_or_else(|| CombatError::UnknownEntity {
                    name: member.name.clone(),
                })?;
            let growth = archive.growth(data.primary_category)?;
            let entity = spawn_entity(
                data,
                member.level,
                &growth,
                member.carried,
                member.plugin.as_ref(),
                archive,
                config,
            )?;
            Ok(entity)
        })
        .collect()
}
