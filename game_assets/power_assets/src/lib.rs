//! Power definitions loaded from `.power.ron` asset files.
//!
//! The concrete kind of each power is the serde-tagged [`PowerBehavior`]
//! variant, registered explicitly here rather than discovered by
//! reflection: the RON tag is the stable type key.

mod groups;
mod requirements;

pub use groups::*;
pub use requirements::*;

use {
    bevy::{asset::AssetId, platform::collections::HashMap, prelude::*},
    bevy_common_assets::ron::RonAssetPlugin,
    mission_events::HitBehavior,
    serde::{Deserialize, Serialize},
};

pub struct PowerAssetsPlugin;

impl Plugin for PowerAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            RonAssetPlugin::<PowerDefinition>::new(&["power.ron"]),
            RonAssetPlugin::<ActivePowerGroupDef>::new(&["active_group.ron"]),
            RonAssetPlugin::<PassivePowerGroupDef>::new(&["passive_group.ron"]),
        ))
        .init_resource::<PowerMap>()
        .init_resource::<ActiveGroupMap>()
        .init_resource::<PassiveGroupMap>()
        .add_systems(
            Update,
            (index_power_assets, index_active_groups, index_passive_groups),
        );
    }
}

/// A configured, reusable power template.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct PowerDefinition {
    /// Unique id of this configured instance (e.g. "iron_skin_2").
    pub id: String,
    /// Display name used in chat messages.
    pub name: String,
    /// Duration when used as an active power, in mission seconds.
    #[serde(default = "default_duration")]
    pub duration_seconds: f32,
    /// Effect cues attached to the agent while the power is active.
    #[serde(default)]
    pub fx: Vec<EffectSpec>,
    pub behavior: PowerBehavior,
}

fn default_duration() -> f32 {
    30.0
}

impl PowerDefinition {
    /// Whether the power can be triggered as a timed active power.
    pub fn supports_active(&self) -> bool {
        !matches!(self.behavior, PowerBehavior::AddHealth { .. })
    }

    /// Whether activation requires the hero to be embodied right now.
    pub fn requires_agent(&self) -> bool {
        matches!(self.behavior, PowerBehavior::StatModify { .. })
    }
}

/// Concrete power kinds. Each differs only in which event hooks it
/// attaches and what per-hit computation it performs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PowerBehavior {
    /// Absorb a fraction of inflicted damage back as health.
    AbsorbHealth { fraction: f32 },
    /// Scale and offset outgoing damage, filtered by victim kind.
    AddDamage {
        #[serde(default = "one")]
        multiplier: f32,
        #[serde(default)]
        add: i32,
        #[serde(default)]
        filter: TargetFilter,
    },
    /// Scale and offset the agent's health pool on spawn. Passive only.
    AddHealth {
        #[serde(default = "hundred")]
        modifier_percent: f32,
        #[serde(default)]
        add: f32,
    },
    /// Send a fraction of incoming damage back at the attacker.
    ReflectDamage {
        fraction: f32,
        #[serde(default)]
        subtract_from_original: bool,
    },
    /// Rewrite incoming blows: scale, offset, flag changes, armor bypass.
    TakeDamage {
        #[serde(default = "hundred")]
        modifier_percent: f32,
        #[serde(default)]
        add: i32,
        #[serde(default)]
        add_behavior: HitBehavior,
        #[serde(default)]
        remove_behavior: HitBehavior,
        #[serde(default)]
        armor_ignore_percent: f32,
    },
    /// Apply a named stat modifier to the agent while active.
    StatModify { stat: String, amount: f32 },
}

fn one() -> f32 {
    1.0
}

fn hundred() -> f32 {
    100.0
}

/// Victim filter for damage-modifying powers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetFilter {
    pub vs_troops: bool,
    pub vs_heroes: bool,
    pub vs_adopted: bool,
    pub vs_player: bool,
}

impl Default for TargetFilter {
    fn default() -> Self {
        Self { vs_troops: true, vs_heroes: true, vs_adopted: true, vs_player: true }
    }
}

/// Named particle/sound effect attachment, resolved by the presentation
/// layer outside the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectSpec {
    pub name: String,
}

/// Index from power id to its loaded asset. The explicit registry every
/// lookup goes through; populated whenever the asset collection changes.
#[derive(Resource, Default)]
pub struct PowerMap {
    pub ids: HashMap<String, AssetId<PowerDefinition>>,
}

impl PowerMap {
    pub fn resolve<'a>(
        &self,
        assets: &'a Assets<PowerDefinition>,
        id: &str,
    ) -> Option<&'a PowerDefinition> {
        self.ids.get(id).and_then(|aid| assets.get(*aid))
    }
}

fn index_power_assets(
    assets: Res<Assets<PowerDefinition>>,
    mut map: ResMut<PowerMap>,
) {
    if !assets.is_changed() {
        return;
    }
    map.ids.clear();
    for (asset_id, def) in assets.iter() {
        if map.ids.insert(def.id.clone(), asset_id).is_some() {
            warn!(power_id = %def.id, "duplicate power id, keeping the last one loaded");
        }
    }
}
