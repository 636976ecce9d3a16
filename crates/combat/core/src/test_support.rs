//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use crate::action::{
    EffectSpec, FunctionTarget, ModifierTarget, Skill, SkillSpec, StatModifier,
};
use crate::archive::{Archive, Category, CategoryEffectiveness, EntityData, EntityGrowth};
use crate::config::CombatConfig;
use crate::entity::{BaseStats, Entity, RateBases, Roster, ap_recovery};
use crate::error::CombatError;
use crate::expr::{Extra, Value, Who};
use crate::stats::StatKind;

/// Hand-built entity with the reference stats used across executor tests:
/// ATK 60, DEF 20, SPD 10, HP 200, SP 50, AP 10.
pub fn sample_entity(index: usize, is_party: bool) -> Entity {
    let config = CombatConfig::default();
    let base = BaseStats {
        atk: 60,
        def: 20,
        spd: 10,
        hp: 200,
        sp: 50,
        ap: 10,
    };
    let rate_bases = RateBases::default();
    Entity {
        index,
        is_party,
        name: if is_party { "hello-world" } else { "null-pointer" }.into(),
        level: 1,
        primary_category: if is_party {
            Category::Logic
        } else {
            Category::Memory
        },
        secondary_category: None,
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
        hp: base.hp,
        sp: base.sp,
        ap: 0.0,
        ap_recovery: ap_recovery(base.spd),
        effects: Vec::new(),
        shields: HashMap::new(),
        skills: vec![
            Skill::attack(&config),
            Skill::defend(&config),
            Skill::relax(&config),
        ],
        on_attack: None,
        on_defend: None,
        failed: false,
    }
}

/// Roster with one party member (index 0) and one enemy (index 1).
pub fn sample_roster() -> Roster {
    Roster::new(vec![sample_entity(0, true)], vec![sample_entity(0, false)])
}

/// In-memory archive with a handful of fixtures.
pub struct TestArchive {
    entities: HashMap<String, EntityData>,
    skills: HashMap<String, Arc<SkillSpec>>,
    effects: HashMap<String, Arc<EffectSpec>>,
    effectiveness: HashMap<Category, CategoryEffectiveness>,
}

impl Default for TestArchive {
    fn default() -> Self {
        let mut entities = HashMap::new();
        entities.insert(
            "null-pointer".to_owned(),
            EntityData {
                name: "null-pointer".to_owned(),
                primary_category: Category::Memory,
                secondary_category: None,
                base_atk: 20,
                base_def: 10,
                base_spd: 12,
                base_hp: 80,
                base_sp: 20,
                base_ap: 10,
                functions: Vec::new(),
                on_attack: None,
                on_defend: None,
            },
        );

        let mut skills = HashMap::new();
        skills.insert(
            "throw-exception".to_owned(),
            Arc::new(SkillSpec {
                name: "throw-exception".to_owned(),
                power: 30,
                sp_cost: 5,
                target: FunctionTarget::SingleEnemy,
                bullseye: false,
                modifier: None,
                extra: None,
            }),
        );
        skills.insert(
            "patch".to_owned(),
            Arc::new(SkillSpec {
                name: "patch".to_owned(),
                power: -20,
                sp_cost: 4,
                target: FunctionTarget::SingleAlly,
                bullseye: false,
                modifier: None,
                extra: None,
            }),
        );

        let mut effects = HashMap::new();
        effects.insert(
            "optimized".to_owned(),
            Arc::new(EffectSpec {
                name: "optimized".to_owned(),
                stackable: true,
                freeze: false,
                modifiers: vec![StatModifier {
                    target: ModifierTarget::Stat(StatKind::Atk),
                    offset: 0.2,
                    tier_bonus: 0.1,
                }],
                apply_on: None,
            }),
        );
        effects.insert(
            "deprecated".to_owned(),
            Arc::new(EffectSpec {
                name: "deprecated".to_owned(),
                stackable: false,
                freeze: false,
                modifiers: vec![StatModifier {
                    target: ModifierTarget::Stat(StatKind::Atk),
                    offset: -0.3,
                    tier_bonus: -0.1,
                }],
                apply_on: None,
            }),
        );
        effects.insert(
            "deadlock".to_owned(),
            Arc::new(EffectSpec {
                name: "deadlock".to_owned(),
                stackable: false,
                freeze: true,
                modifiers: Vec::new(),
                apply_on: None,
            }),
        );
        effects.insert(
            "corrupted".to_owned(),
            Arc::new(EffectSpec {
                name: "corrupted".to_owned(),
                stackable: false,
                freeze: false,
                modifiers: Vec::new(),
                apply_on: Some(Extra::InstantHp {
                    amount: Value::Const(-5.0),
                    ignores_shield: true,
                    to: Who::Target,
                }),
            }),
        );

        let mut effectiveness = HashMap::new();
        effectiveness.insert(
            Category::Logic,
            CategoryEffectiveness(HashMap::from([(Category::Memory, 1)])),
        );

        Self {
            entities,
            skills,
            effects,
            effectiveness,
        }
    }
}

impl Archive for TestArchive {
    fn entity(&self, name: &str) -> Option<&EntityData> {
        self.entities.get(name)
    }

    fn growth(&self, category: Category) -> Result<EntityGrowth, CombatError> {
        let _ = category;
        Ok(EntityGrowth {
            atk: 0.05,
            def: 0.05,
            spd: 0.02,
            hp: 0.1,
            sp: 0.05,
        })
    }

    fn effectiveness(&self, category: Category) -> CategoryEffectiveness {
        self.effectiveness.get(&category).cloned().unwrap_or_default()
    }

    fn skill(&self, name: &str) -> Option<Arc<SkillSpec>> {
        self.skills.get(name).cloned()
    }

    fn effect(&self, name: &str) -> Option<Arc<EffectSpec>> {
        self.effects.get(name).cloned()
    }
}

/// Archive with no effectiveness tables and no data, for neutral-path tests.
pub struct EmptyArchive;

impl Archive for EmptyArchive {
    fn entity(&self, _name: &str) -> Option<&EntityData> {
        None
    }

    fn growth(&self, category: Category) -> Result<EntityGrowth, CombatError> {
        Err(CombatError::GrowthNotRegistered { category })
    }

    fn effectiveness(&self, _category: Category) -> CategoryEffectiveness {
        CategoryEffectiveness::default()
    }

    fn skill(&self, _name: &str) -> Option<Arc<SkillSpec>> {
        None
    }

    fn effect(&self, _name: &str) -> Option<Arc<EffectSpec>> {
        None
    }
}
