//! Damage and heal formulas.
//!
//! Pure functions; all combat math that does not touch entity state lives
//! here so the executor and tests share one source of truth.

use crate::config::CombatConfig;

/// Base damage before multipliers.
///
/// # Formula
///
/// ```text
/// base = max(1, power × max(1, atk) × 5 / (100 + max(1, def)))
/// ```
///
/// Diminishing-returns ratio: DEF soaks into the denominator instead of
/// subtracting, and the floor of 1 holds regardless of stat extremes.
pub fn base_damage(power: i32, atk: f32, def: f32) -> f32 {
    let power = power as f32;
    (power * atk.max(1.0) * CombatConfig::DAMAGE_SCALE / (CombatConfig::DAMAGE_SOAK + def.max(1.0)))
        .max(1.0)
}

/// Base heal for a negative-power skill.
///
/// # Formula
///
/// ```text
/// heal = max(1, |power| × atk / 100)
/// ```
pub fn base_heal(power_abs: i32, atk: f32) -> i32 {
    ((power_abs as f32 * atk / 100.0) as i32).max(1)
}

/// Category-effectiveness multiplier for an attack.
///
/// `1 + 0.1 × eff(primary) + 0.1 × eff(secondary)`, with neutral terms for
/// unregistered matchups.
pub fn effectiveness_rate(primary: i32, secondary: Option<i32>) -> f32 {
    1.0 + CombatConfig::EFFECTIVENESS_STEP * primary as f32
        + CombatConfig::EFFECTIVENESS_STEP * secondary.unwrap_or(0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_floor_holds_for_extreme_stats() {
        assert!(base_damage(1, 0.0, 1_000_000.0) >= 1.0);
        assert!(base_damage(1, 1.0, 0.0) >= 1.0);
        assert!(base_damage(100, 0.0, 0.0) >= 1.0);
    }

    #[test]
    fn heal_floor_holds_for_zero_atk() {
        assert_eq!(base_heal(1, 0.0), 1);
        assert_eq!(base_heal(50, 0.0), 1);
    }

    #[test]
    fn damage_matches_reference_values() {
        // power=30, atk=60, def=20 → 30·60·5/120 = 75
        assert_eq!(base_damage(30, 60.0, 20.0) as i32, 75);
    }

    #[test]
    fn heal_matches_reference_values() {
        // power=20, atk=50 → 20·50/100 = 10
        assert_eq!(base_heal(20, 50.0), 10);
    }

    #[test]
    fn effectiveness_steps_by_tenth() {
        assert!((effectiveness_rate(1, Some(1)) - 1.2).abs() < 1e-6);
        assert!((effectiveness_rate(-1, None) - 0.9).abs() < 1e-6);
        assert!((effectiveness_rate(0, None) - 1.0).abs() < 1e-6);
    }
}
