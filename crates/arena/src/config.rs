//! Combat session configuration.

use serde::{Deserialize, Serialize};

use combat_core::{CarriedState, PluginData};

/// One participant of a combat, as the surrounding game specifies it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberSpec {
    /// Archive entity name.
    pub name: String,
    pub level: u32,
    /// Current HP/SP carried over from the save; full resources when absent.
    #[serde(default)]
    pub carried: Option<CarriedState>,
    /// Installed plugin, party members only in practice.
    #[serde(default)]
    pub plugin: Option<PluginData>,
}

impl MemberSpec {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
            carried: None,
            plugin: None,
        }
    }
}

/// External specification of a combat session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub parties: Vec<MemberSpec>,
    pub enemies: Vec<MemberSpec>,

    /// Presentation pacing factor. `0` disables every delay (headless /
    /// instant resolution); higher values shorten delays proportionally.
    #[serde(default = "default_play_speed")]
    pub play_speed: u32,

    /// When set, party members act through the random AI policy instead of
    /// waiting on submitted actions.
    #[serde(default)]
    pub auto_combat: bool,

    /// Fixed RNG seed for reproducible combats; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_play_speed() -> u32 {
    1
}

impl ArenaConfig {
    pub fn new(parties: Vec<MemberSpec>, enemies: Vec<MemberSpec>) -> Self {
        Self {
            parties,
            enemies,
            play_speed: default_play_speed(),
            auto_combat: false,
            seed: None,
        }
    }

    /// Headless variant: no pacing, AI-driven party.
    pub fn headless(parties: Vec<MemberSpec>, enemies: Vec<MemberSpec>) -> Self {
        Self {
            parties,
            enemies,
            play_speed: 0,
            auto_combat: true,
            seed: None,
        }
    }
}
