//! Stat kind enums used by effect modifiers and recomputation.
//!
//! Two families:
//! - [`StatKind`]: multiplicative stats folded as `base × (1 + Σ offsets)`.
//! - [`RateKind`]: additive rate stats folded as `base_constant + Σ offsets`.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Stats recomputed multiplicatively from their base value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum StatKind {
    Atk,
    Def,
    Spd,
    MaxHp,
    MaxSp,
    MaxAp,
}

/// Rate stats recomputed additively from a baseline constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum RateKind {
    /// Probability of a critical hit.
    CritRate,
    /// Bonus damage fraction on a critical hit.
    CritDmg,
    /// Probability component of landing an attack.
    TargetRate,
    /// Evasion component subtracted from incoming target rate.
    HideRate,
    /// Outgoing damage multiplier (1.0 = neutral).
    AttackRate,
    /// Incoming damage multiplier (1.0 = neutral).
    DefendRate,
}

impl RateKind {
    /// Baseline the additive fold starts from for this rate.
    pub fn base(self) -> f32 {
        use crate::config::CombatConfig;
        match self {
            RateKind::CritRate => CombatConfig::BASE_CRIT_RATE,
            RateKind::CritDmg => CombatConfig::BASE_CRIT_DMG,
            RateKind::TargetRate => CombatConfig::BASE_TARGET_RATE,
            RateKind::HideRate => CombatConfig::BASE_HIDE_RATE,
            RateKind::AttackRate => CombatConfig::BASE_ATTACK_RATE,
            RateKind::DefendRate => CombatConfig::BASE_DEFEND_RATE,
        }
    }
}
