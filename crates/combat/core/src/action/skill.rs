//! Skills: the functions an entity can invoke on its turn.
//!
//! A [`SkillSpec`] is shared, immutable definition data (authored in the
//! archive); a [`Skill`] is one entity's instance of it with session-scoped
//! scratch state. Every entity carries the three baselines (attack, defend,
//! relax) at fixed slots, followed by its learned functions.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::CombatConfig;
use crate::expr::{Extra, Value, Who};

/// Targeting policy of a skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionTarget {
    /// One living opponent, chosen by the invoker.
    SingleEnemy,
    /// Every living opponent.
    AllEnemies,
    /// One living entity on the invoker's side (the invoker included).
    SingleAlly,
    /// Every living entity on the invoker's side.
    AllAllies,
    /// The invoker itself.
    User,
}

/// Optional attack-roll overrides carried by a skill.
///
/// Absent fields fall back to the invoker's live stats. The ATK/DEF overrides
/// are value expressions so a skill can, say, strike with SPD instead of ATK.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackModifier {
    #[serde(default)]
    pub power: Option<i32>,
    #[serde(default)]
    pub user_atk: Option<Value>,
    #[serde(default)]
    pub target_def: Option<Value>,
    #[serde(default)]
    pub target_rate_offset: f32,
    #[serde(default)]
    pub crit_rate_offset: f32,
    #[serde(default)]
    pub crit_dmg_offset: f32,
    #[serde(default)]
    pub ignores_shield: bool,
}

/// Shared, immutable definition of a skill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillSpec {
    pub name: String,
    /// Sign decides the resolution path: `> 0` damage, `< 0` heal, `0` extra
    /// only.
    pub power: i32,
    #[serde(default)]
    pub sp_cost: i32,
    pub target: FunctionTarget,
    /// Never misses when set.
    #[serde(default)]
    pub bullseye: bool,
    #[serde(default)]
    pub modifier: Option<AttackModifier>,
    #[serde(default)]
    pub extra: Option<Extra>,
}

/// One entity's instance of a skill.
#[derive(Clone, Debug)]
pub struct Skill {
    pub spec: Arc<SkillSpec>,
    /// Session-scoped scratch storage for the skill's expressions.
    /// Cleared when the combat ends or the owner is defeated.
    pub values: HashMap<String, f32>,
    pub times_used: u32,
    pub times_repeated: u32,
}

impl Skill {
    pub fn new(spec: Arc<SkillSpec>) -> Self {
        Self {
            spec,
            values: HashMap::new(),
            times_used: 0,
            times_repeated: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Baseline slot: plain attack.
    pub fn attack(config: &CombatConfig) -> Self {
        Self::new(Arc::new(SkillSpec {
            name: "attack".into(),
            power: config.basic_attack_power,
            sp_cost: 0,
            target: FunctionTarget::SingleEnemy,
            bullseye: false,
            modifier: None,
            extra: None,
        }))
    }

    /// Baseline slot: defend. Raises a one-turn shield from the user's DEF.
    pub fn defend(config: &CombatConfig) -> Self {
        Self::new(Arc::new(SkillSpec {
            name: "defend".into(),
            power: 0,
            sp_cost: 0,
            target: FunctionTarget::User,
            bullseye: false,
            modifier: None,
            extra: Some(Extra::AttachShield {
                key: "defend".into(),
                value: Value::CoerceAtLeast(
                    Box::new(Value::Times(vec![
                        Value::StatOf {
                            who: Who::User,
                            stat: crate::expr::StatQuery::Def,
                        },
                        Value::Const(config.defend_shield_fraction),
                    ])),
                    Box::new(Value::Const(1.0)),
                ),
                turns: Some(1),
                to: Who::User,
            }),
        }))
    }

    /// Baseline slot: relax. Restores a fraction of the user's max SP.
    pub fn relax(config: &CombatConfig) -> Self {
        Self::new(Arc::new(SkillSpec {
            name: "relax".into(),
            power: 0,
            sp_cost: 0,
            target: FunctionTarget::User,
            bullseye: false,
            modifier: None,
            extra: Some(Extra::InstantSp {
                amount: Value::CoerceAtLeast(
                    Box::new(Value::Times(vec![
                        Value::StatOf {
                            who: Who::User,
                            stat: crate::expr::StatQuery::MaxSp,
                        },
                        Value::Const(config.relax_sp_fraction),
                    ])),
                    Box::new(Value::Const(1.0)),
                ),
                to: Who::User,
            }),
        }))
    }
}

/// Number of baseline skill slots preceding learned functions.
pub const BASELINE_SKILLS: usize = 3;
