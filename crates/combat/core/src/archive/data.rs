//! Archived data types consumed when instantiating combat entities.
//!
//! These mirror what the surrounding game persists about entities, growth
//! curves, and category matchups. The combat core only reads them; authoring
//! and storage live outside this crate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::expr::Extra;

/// Entity category in the programming-themed world.
///
/// Party members are snippets of working code; enemies are bugs. Both sides
/// share the same category space for effectiveness matchups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Category {
    Logic,
    Syntax,
    Memory,
    Network,
    Process,
}

/// Static archive record an entity is instantiated from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub name: String,
    pub primary_category: Category,
    #[serde(default)]
    pub secondary_category: Option<Category>,

    pub base_atk: i32,
    pub base_def: i32,
    pub base_spd: i32,
    pub base_hp: i32,
    pub base_sp: i32,
    pub base_ap: i32,

    /// Names of learned functions, resolved against the archive at spawn.
    #[serde(default)]
    pub functions: Vec<String>,

    /// Trigger run after this entity lands a damaging hit.
    #[serde(default)]
    pub on_attack: Option<Extra>,
    /// Trigger run after this entity takes a damaging hit.
    #[serde(default)]
    pub on_defend: Option<Extra>,
}

/// Per-level growth rates for a category.
///
/// Scaled base stat = `base × (1 + rate × level)`. AP does not grow.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityGrowth {
    pub atk: f32,
    pub def: f32,
    pub spd: f32,
    pub hp: f32,
    pub sp: f32,
}

/// Signed effectiveness of one attacking category against defending ones.
///
/// Missing entries are neutral (0). An unregistered category resolves to an
/// empty table rather than an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryEffectiveness(pub HashMap<Category, i32>);

impl CategoryEffectiveness {
    pub fn against(&self, category: Category) -> i32 {
        self.0.get(&category).copied().unwrap_or(0)
    }
}

/// Installed plugin bonuses applied at entity instantiation.
///
/// Percent bonuses scale the level-scaled base stats; the rate additions are
/// flat offsets on top of the baseline rate constants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginData {
    #[serde(default)]
    pub atk_bonus: f32,
    #[serde(default)]
    pub def_bonus: f32,
    #[serde(default)]
    pub spd_bonus: f32,
    #[serde(default)]
    pub hp_bonus: f32,
    #[serde(default)]
    pub sp_bonus: f32,

    #[serde(default)]
    pub crit_rate: f32,
    #[serde(default)]
    pub target_rate: f32,
    #[serde(default)]
    pub hide_rate: f32,
}
