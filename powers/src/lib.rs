//! Hero powers: per-hit damage hooks, timed activations with expiry,
//! and the class power groups that bundle them.

use {
    bevy::{platform::collections::HashMap, prelude::*},
    mission::BlowStage,
    serde::{Deserialize, Serialize},
    states::GameState,
};

mod behaviors;
mod duration;
mod groups;
mod handler;
mod systems;

pub use {behaviors::*, duration::*, groups::*, handler::*, systems::*};


pub struct PowersPlugin;

impl Plugin for PowersPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GlobalPowerConfig>()
            .init_resource::<PowerHandler>()
            .init_resource::<PowerExpiry>()
            .init_resource::<ActiveGroupActivations>()
            .init_resource::<StatModifiers>()
            .add_systems(
                Update,
                modify_blows
                    .in_set(BlowStage::Modify)
                    .run_if(in_state(GameState::Mission)),
            )
            .add_observer(on_use_class_power)
            .add_observer(on_slow_tick_expire)
            .add_observer(on_agent_built_passives)
            .add_observer(on_hero_down)
            .add_observer(on_power_expired)
            .add_observer(on_mission_ended);
    }
}

/// Global switches that apply to every power.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct GlobalPowerConfig {
    pub disable_in_tournaments: bool,
}

impl Default for GlobalPowerConfig {
    fn default() -> Self {
        Self { disable_in_tournaments: true }
    }
}

/// When each active power runs out, in mission-elapsed seconds, keyed
/// by owning hero and power id. The expiry sweep and the death and
/// mission-end observers are the only writers besides activation.
#[derive(Resource, Default)]
pub struct PowerExpiry {
    pub deadlines: HashMap<(Entity, String), f32>,
}

/// Which member powers each hero's running group activation covers.
/// Used to announce group expiry once the last member lapses.
#[derive(Resource, Default)]
pub struct ActiveGroupActivations {
    pub members: HashMap<(Entity, String), GroupActivation>,
}

pub struct GroupActivation {
    pub group_name: String,
    pub deactivate_effect: Option<String>,
    pub powers: Vec<String>,
}

/// Named agent stat adjustments currently in force, for the host
/// simulation to read back. Keyed by hero.
#[derive(Resource, Default)]
pub struct StatModifiers {
    pub by_hero: HashMap<Entity, HashMap<String, f32>>,
}

impl StatModifiers {
    pub fn apply(&mut self, hero: Entity, stat: &str, amount: f32) {
        *self
            .by_hero
            .entry(hero)
            .or_default()
            .entry(stat.to_string())
            .or_default() += amount;
    }

    pub fn retract(&mut self, hero: Entity, stat: &str, amount: f32) {
        if let Some(stats) = self.by_hero.get_mut(&hero) {
            if let Some(v) = stats.get_mut(stat) {
                *v -= amount;
                if v.abs() < f32::EPSILON {
                    stats.remove(stat);
                }
            }
            if stats.is_empty() {
                self.by_hero.remove(&hero);
            }
        }
    }
}
