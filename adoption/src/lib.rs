//! Viewer adoption of campaign heroes: claiming a hero, the name tag
//! that marks adopted heroes, and the per-kill reward flow.

use {
    bevy::prelude::*,
    mission::KillRewardConfig,
    serde::{Deserialize, Serialize},
};

mod systems;

pub use systems::*;

#[cfg(test)]
mod tests;

/// Suffix appended to an adopted hero's name so the campaign UI shows
/// who is spoken for.
pub const ADOPT_TAG: &str = "[CC]";

pub struct AdoptionPlugin;

impl Plugin for AdoptionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AdoptionConfig>()
            .add_observer(on_adopt_hero)
            .add_observer(on_agent_built)
            .add_observer(on_agent_slain);
    }
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct AdoptionConfig {
    /// Whether a killed hero is released back into the adoption pool.
    pub death_releases: bool,
    /// Only subscribers may adopt.
    pub subscriber_only: bool,
    pub kill_rewards: KillRewardConfig,
}

impl Default for AdoptionConfig {
    fn default() -> Self {
        Self {
            death_releases: false,
            subscriber_only: false,
            kill_rewards: KillRewardConfig {
                gold_per_kill: 5_000,
                heal_per_kill: 10.0,
                xp_per_kill: 5_000.0,
                xp_per_killed: 2_000.0,
                sub_boost: 2.0,
                relative_level_scaling: 0.5,
                ..Default::default()
            },
        }
    }
}
