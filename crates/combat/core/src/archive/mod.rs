//! Archive oracle: the combat core's read-only view of game data.
//!
//! The surrounding game owns entity records, growth tables, matchup tables,
//! and skill/effect definitions. Combat only ever reads them through this
//! trait, injected explicitly wherever it is needed — there is no global
//! registry or service locator inside the core.
//!
//! # Failure policy
//!
//! - Missing entity/growth/skill data is a data-authoring bug and fails fast
//!   with [`CombatError`].
//! - Missing effectiveness tables are an expected-empty outcome and resolve
//!   to a neutral default.

mod data;

use std::sync::Arc;

pub use data::{Category, CategoryEffectiveness, EntityData, EntityGrowth, PluginData};

use crate::action::{EffectSpec, SkillSpec};
use crate::error::CombatError;

/// Read-only lookup of archived combat data.
pub trait Archive: Send + Sync {
    /// Archived record for an entity, if registered.
    fn entity(&self, name: &str) -> Option<&EntityData>;

    /// Growth table for a category. Missing tables are fatal: every spawnable
    /// category must have one authored.
    fn growth(&self, category: Category) -> Result<EntityGrowth, CombatError>;

    /// Effectiveness table for an attacking category. Unregistered categories
    /// yield the neutral empty table.
    fn effectiveness(&self, category: Category) -> CategoryEffectiveness;

    /// Shared definition of a learned function.
    fn skill(&self, name: &str) -> Option<Arc<SkillSpec>>;

    /// Shared definition of a status effect.
    fn effect(&self, name: &str) -> Option<Arc<EffectSpec>>;
}
