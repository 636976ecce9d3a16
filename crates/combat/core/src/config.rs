/// Balance constants and tunable parameters for combat resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatConfig {
    /// Power of the baseline attack skill every entity carries.
    pub basic_attack_power: i32,
    /// Fraction of max SP restored by the baseline relax skill.
    pub relax_sp_fraction: f32,
    /// Fraction of DEF converted into the baseline defend shield.
    pub defend_shield_fraction: f32,
}

impl CombatConfig {
    // ===== rate-stat baselines (fold targets for effect recomputation) =====
    pub const BASE_CRIT_RATE: f32 = 0.05;
    pub const BASE_CRIT_DMG: f32 = 0.5;
    pub const BASE_TARGET_RATE: f32 = 0.95;
    pub const BASE_HIDE_RATE: f32 = 0.0;
    pub const BASE_ATTACK_RATE: f32 = 1.0;
    pub const BASE_DEFEND_RATE: f32 = 1.0;

    // ===== damage formula constants =====
    /// Numerator scale in the diminishing-returns damage ratio.
    pub const DAMAGE_SCALE: f32 = 5.0;
    /// Flat term added to DEF in the damage denominator.
    pub const DAMAGE_SOAK: f32 = 100.0;
    /// Bounds for the attack/defend rate multipliers applied to final damage.
    pub const RATE_MULTIPLIER_MIN: f32 = 0.01;
    pub const RATE_MULTIPLIER_MAX: f32 = 100.0;
    /// Per-category step of the effectiveness multiplier.
    pub const EFFECTIVENESS_STEP: f32 = 0.1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BASIC_ATTACK_POWER: i32 = 10;
    pub const DEFAULT_RELAX_SP_FRACTION: f32 = 0.25;
    pub const DEFAULT_DEFEND_SHIELD_FRACTION: f32 = 0.5;

    pub fn new() -> Self {
        Self {
            basic_attack_power: Self::DEFAULT_BASIC_ATTACK_POWER,
            relax_sp_fraction: Self::DEFAULT_RELAX_SP_FRACTION,
            defend_shield_fraction: Self::DEFAULT_DEFEND_SHIELD_FRACTION,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
