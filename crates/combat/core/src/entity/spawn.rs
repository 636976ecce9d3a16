//! Entity instantiation from archived data.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{BaseStats, Entity, RateBases, ap_recovery};
use crate::action::Skill;
use crate::archive::{Archive, EntityData, EntityGrowth, PluginData};
use crate::config::CombatConfig;
use crate::error::CombatError;

/// Current HP/SP carried over from a previous combat via the save.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarriedState {
    pub hp: i32,
    pub sp: i32,
}

/// Build a live entity from its archive record.
///
/// Base stats are level-scaled (`base × (1 + growth × level)`), then plugin
/// percentage bonuses scale them further and plugin rate additions fold into
/// the entity's rate baselines. Learned functions are resolved against the
/// archive; a missing one is a data-authoring bug and fails fast.
///
/// The returned entity's `index`/`is_party` are placeholders until the roster
/// adopts it.
pub fn spawn_entity(
    data: &EntityData,
    level: u32,
    growth: &EntityGrowth,
    carried: Option<CarriedState>,
    plugin: Option<&PluginData>,
    archive: &dyn Archive,
    config: &CombatConfig,
) -> Result<Entity, CombatError> {
    let base = BaseStats {
        atk: grow(data.base_atk, growth.atk, level, plugin.map(|p| p.atk_bonus)),
        def: grow(data.base_def, growth.def, level, plugin.map(|p| p.def_bonus)),
        spd: grow(data.base_spd, growth.spd, level, plugin.map(|p| p.spd_bonus)),
        hp: grow(data.base_hp, growth.hp, level, plugin.map(|p| p.hp_bonus)),
        sp: grow(data.base_sp, growth.sp, level, plugin.map(|p| p.sp_bonus)),
        ap: data.base_ap.max(1),
    };

    let mut rate_bases = RateBases::default();
    if let Some(plugin) = plugin {
        rate_bases.crit_rate += plugin.crit_rate;
        rate_bases.target_rate += plugin.target_rate;
        rate_bases.hide_rate += plugin.hide_rate;
    }

    let mut skills = vec![
        Skill::attack(config),
        Skill::defend(config),
        Skill::relax(config),
    ];
    for name in &data.functions {
        let spec = archive
            .skill(name)
            .ok_or_else(|| CombatError::UnknownSkill { name: name.clone() })?;
        skills.push(Skill::new(spec));
    }

    let hp = carried.map_or(base.hp, |c| c.hp.clamp(0, base.hp));
    let sp = carried.map_or(base.sp, |c| c.sp.clamp(0, base.sp));

    Ok(Entity {
        index: 0,
        is_party: false,
        name: data.name.clone(),
        level,
        primary_category: data.primary_category,
        secondary_category: data.secondary_category,
        base,
        rate_bases,
        atk: base.atk,
        def: base.def,
        spd: base.spd,
        max_hp: base.hp,
        max_sp: base.sp,
        max_ap: base.ap,
        crit_rate: rate_bases.crit_rate,
        crit_dmg: rate_bases.crit_dmg,
        target_rate: rate_bases.target_rate,
        hide_rate: rate_bases.hide_rate,
        attack_rate: rate_bases.attack_rate,
        defend_rate: rate_bases.defend_rate,
        hp,
        sp,
        ap: 0.0,
        ap_recovery: ap_recovery(base.spd),
        effects: Vec::new(),
        shields: HashMap::new(),
        skills,
        on_attack: data.on_attack.clone().map(Arc::new),
        on_defend: data.on_defend.clone().map(Arc::new),
        failed: false,
    })
}

/// `base × (1 + growth × level)`, then an optional plugin percentage bonus,
/// floored at 1.
fn grow(base: i32, rate: f32, level: u32, plugin_bonus: Option<f32>) -> i32 {
    let mut value = base as f32 * (1.0 + rate * level as f32);
    if let Some(bonus) = plugin_bonus {
        value *= 1.0 + bonus;
    }
    (value as i32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestArchive;

    #[test]
    fn growth_scales_base_stats() {
        let archive = TestArchive::default();
        let data = archive.entity("null-pointer").unwrap().clone();
        let growth = EntityGrowth {
            atk: 0.1,
            def: 0.1,
            spd: 0.0,
            hp: 0.2,
            sp: 0.0,
        };

        let entity = spawn_entity(
            &data,
            10,
            &growth,
            None,
            None,
            &archive,
            &CombatConfig::default(),
        )
        .unwrap();

        assert_eq!(entity.base.atk, (data.base_atk as f32 * 2.0) as i32);
        assert_eq!(entity.base.hp, (data.base_hp as f32 * 3.0) as i32);
        assert_eq!(entity.base.spd, data.base_spd);
        assert_eq!(entity.hp, entity.max_hp);
    }

    #[test]
    fn plugin_applies_percent_and_flat_bonuses() {
        let archive = TestArchive::default();
        let data = archive.entity("null-pointer").unwrap().clone();
        let growth = EntityGrowth {
            atk: 0.0,
            def: 0.0,
            spd: 0.0,
            hp: 0.0,
            sp: 0.0,
        };
        let plugin = PluginData {
            atk_bonus: 0.5,
            crit_rate: 0.15,
            ..Default::default()
        };

        let entity = spawn_entity(
            &data,
            1,
            &growth,
            None,
            Some(&plugin),
            &archive,
            &CombatConfig::default(),
        )
        .unwrap();

        assert_eq!(entity.base.atk, (data.base_atk as f32 * 1.5) as i32);
        assert!(
            (entity.crit_rate - (CombatConfig::BASE_CRIT_RATE + 0.15)).abs() < 1e-6
        );
    }

    #[test]
    fn carried_state_overrides_full_resources() {
        let archive = TestArchive::default();
        let data = archive.entity("null-pointer").unwrap().clone();
        let growth = EntityGrowth {
            atk: 0.0,
            def: 0.0,
            spd: 0.0,
            hp: 0.0,
            sp: 0.0,
        };

        let entity = spawn_entity(
            &data,
            1,
            &growth,
            Some(CarriedState { hp: 3, sp: 1 }),
            None,
            &archive,
            &CombatConfig::default(),
        )
        .unwrap();

        assert_eq!(entity.hp, 3);
        assert_eq!(entity.sp, 1);
    }

    #[test]
    fn unknown_function_fails_fast() {
        let archive = TestArchive::default();
        let mut data = archive.entity("null-pointer").unwrap().clone();
        data.functions.push("undefined-symbol".into());
        let growth = EntityGrowth {
            atk: 0.0,
            def: 0.0,
            spd: 0.0,
            hp: 0.0,
            sp: 0.0,
        };

        let err = spawn_entity(
            &data,
            1,
            &growth,
            None,
            None,
            &archive,
            &CombatConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CombatError::UnknownSkill { .. }));
    }
}
