//! In-memory archive loaded from embedded RON data files.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, bail};

use combat_core::{
    Archive, Category, CategoryEffectiveness, CombatError, EffectSpec, EntityData, EntityGrowth,
    SkillSpec,
};

/// Registry over all authored combat content.
///
/// Loads every embedded RON data file once and serves lookups by name or
/// category. Entity function references and spawn categories are validated
/// at load time so a combat never discovers a dangling name mid-fight.
pub struct ContentArchive {
    entities: HashMap<String, EntityData>,
    growth: HashMap<Category, EntityGrowth>,
    effectiveness: HashMap<Category, CategoryEffectiveness>,
    skills: HashMap<String, Arc<SkillSpec>>,
    effects: HashMap<String, Arc<EffectSpec>>,
}

impl ContentArchive {
    /// Loads all content from the embedded RON data files.
    pub fn load() -> anyhow::Result<Self> {
        let entities: Vec<EntityData> = ron::from_str(include_str!("../data/entities.ron"))
            .context("failed to parse entities.ron")?;
        let growth: HashMap<Category, EntityGrowth> =
            ron::from_str(include_str!("../data/growth.ron"))
                .context("failed to parse growth.ron")?;
        let effectiveness: HashMap<Category, CategoryEffectiveness> =
            ron::from_str(include_str!("../data/effectiveness.ron"))
                .context("failed to parse effectiveness.ron")?;
        let skills: Vec<SkillSpec> = ron::from_str(include_str!("../data/skills.ron"))
            .context("failed to parse skills.ron")?;
        let effects: Vec<EffectSpec> = ron::from_str(include_str!("../data/effects.ron"))
            .context("failed to parse effects.ron")?;

        let archive = Self {
            entities: entities.into_iter().map(|e| (e.name.clone(), e)).collect(),
            growth,
            effectiveness,
            skills: skills
                .into_iter()
                .map(|s| (s.name.clone(), Arc::new(s)))
                .collect(),
            effects: effects
                .into_iter()
                .map(|e| (e.name.clone(), Arc::new(e)))
                .collect(),
        };
        archive.validate()?;
        Ok(archive)
    }

    /// Cross-reference validation: every function an entity learns and every
    /// category an entity spawns with must be registered.
    fn validate(&self) -> anyhow::Result<()> {
        for entity in self.entities.values() {
            for function in &entity.functions {
                if !self.skills.contains_key(function) {
                    bail!(
                        "entity {:?} references unknown function {:?}",
                        entity.name,
                        function
                    );
                }
            }
            if !self.growth.contains_key(&entity.primary_category) {
                bail!(
                    "entity {:?} has no growth table for category {:?}",
                    entity.name,
                    entity.primary_category
                );
            }
        }
        Ok(())
    }

    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }
}

impl Archive for ContentArchive {
    fn entity(&self, name: &str) -> Option<&EntityData> {
        self.entities.get(name)
    }

    fn growth(&self, category: Category) -> Result<EntityGrowth, CombatError> {
        self.growth
            .get(&category)
            .copied()
            .ok_or(CombatError::GrowthNotRegistered { category })
    }

    fn effectiveness(&self, category: Category) -> CategoryEffectiveness {
        self.effectiveness
            .get(&category)
            .cloned()
            .unwrap_or_default()
    }

    fn skill(&self, name: &str) -> Option<Arc<SkillSpec>> {
        self.skills.get(name).cloned()
    }

    fn effect(&self, name: &str) -> Option<Arc<EffectSpec>> {
        self.effects.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn content_loads_and_validates() {
        let archive = ContentArchive::load().expect("embedded content must parse");
        assert!(archive.entity("hello-world").is_some());
        assert!(archive.entity("null-pointer").is_some());
        assert!(archive.skill("throw-exception").is_some());
        assert!(archive.effect("corrupted").is_some());
    }

    #[test]
    fn every_category_has_a_growth_table() {
        let archive = ContentArchive::load().unwrap();
        for category in Category::iter() {
            assert!(archive.growth(category).is_ok(), "{category:?}");
        }
    }

    #[test]
    fn unregistered_effectiveness_is_neutral() {
        let archive = ContentArchive::load().unwrap();
        for category in Category::iter() {
            // Self-matchups are not authored; they must read as neutral.
            let table = archive.effectiveness(category);
            assert_eq!(table.against(category), 0);
        }
    }

    #[test]
    fn learned_functions_resolve_for_every_entity() {
        let archive = ContentArchive::load().unwrap();
        for name in archive.entity_names().collect::<Vec<_>>() {
            let data = archive.entity(name).unwrap();
            for function in &data.functions {
                assert!(archive.skill(function).is_some(), "{name}: {function}");
            }
        }
    }
}
