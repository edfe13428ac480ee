use {
    crate::Requirement,
    bevy::{asset::AssetId, platform::collections::HashMap, prelude::*},
    serde::{Deserialize, Serialize},
};

/// One member of a power group, with optional unlock gates. A member
/// whose requirements are not met is simply skipped for that hero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerGroupItem {
    /// Id of a [`crate::PowerDefinition`].
    pub power: String,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

impl PowerGroupItem {
    pub fn unlocked_for(&self, hero: &hero_components::HeroSnapshot) -> bool {
        self.requirements.iter().all(|r| r.is_met(hero))
    }
}

/// A named bundle of active powers triggered together as one ability.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct ActivePowerGroupDef {
    pub id: String,
    pub name: String,
    pub powers: Vec<PowerGroupItem>,
    #[serde(default)]
    pub activate_effect: Option<String>,
    #[serde(default)]
    pub deactivate_effect: Option<String>,
}

/// A named bundle of passive powers applied for the whole mission.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct PassivePowerGroupDef {
    pub id: String,
    pub name: String,
    pub powers: Vec<PowerGroupItem>,
}

#[derive(Resource, Default)]
pub struct ActiveGroupMap {
    pub ids: HashMap<String, AssetId<ActivePowerGroupDef>>,
}

impl ActiveGroupMap {
    pub fn resolve<'a>(
        &self,
        assets: &'a Assets<ActivePowerGroupDef>,
        id: &str,
    ) -> Option<&'a ActivePowerGroupDef> {
        self.ids.get(id).and_then(|aid| assets.get(*aid))
    }
}

#[derive(Resource, Default)]
pub struct PassiveGroupMap {
    pub ids: HashMap<String, AssetId<PassivePowerGroupDef>>,
}

impl PassiveGroupMap {
    pub fn resolve<'a>(
        &self,
        assets: &'a Assets<PassivePowerGroupDef>,
        id: &str,
    ) -> Option<&'a PassivePowerGroupDef> {
        self.ids.get(id).and_then(|aid| assets.get(*aid))
    }
}

pub(crate) fn index_active_groups(
    assets: Res<Assets<ActivePowerGroupDef>>,
    mut map: ResMut<ActiveGroupMap>,
) {
    if !assets.is_changed() {
        return;
    }
    map.ids.clear();
    for (asset_id, def) in assets.iter() {
        map.ids.insert(def.id.clone(), asset_id);
    }
}

pub(crate) fn index_passive_groups(
    assets: Res<Assets<PassivePowerGroupDef>>,
    mut map: ResMut<PassiveGroupMap>,
) {
    if !assets.is_changed() {
        return;
    }
    map.ids.clear();
    for (asset_id, def) in assets.iter() {
        map.ids.insert(def.id.clone(), asset_id);
    }
}
