//! Hero class definitions loaded from `.class.ron` files. A class ties
//! together an equipment loadout preference and the power groups the
//! hero fights with.

use {
    bevy::{asset::AssetId, platform::collections::HashMap, prelude::*},
    bevy_common_assets::ron::RonAssetPlugin,
    hero_components::{MountFamily, WeaponClass},
    serde::{Deserialize, Serialize},
};

pub struct ClassAssetsPlugin;

impl Plugin for ClassAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<HeroClassDef>::new(&["class.ron"]))
            .init_resource::<ClassMap>()
            .add_systems(Update, index_class_assets);
    }
}

#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct HeroClassDef {
    pub id: String,
    pub name: String,
    /// Weapon classes this class wants equipped, in preference order.
    pub weapons: Vec<WeaponClass>,
    #[serde(default)]
    pub mounted: bool,
    #[serde(default)]
    pub mount_family: Option<MountFamily>,
    /// Id of a `PassivePowerGroupDef` applied for the whole mission.
    #[serde(default)]
    pub passive_power: Option<String>,
    /// Id of an `ActivePowerGroupDef` triggered on demand.
    #[serde(default)]
    pub active_power: Option<String>,
}

impl HeroClassDef {
    pub fn wants_weapon(&self, class: WeaponClass) -> bool {
        self.weapons.contains(&class)
            || class.ammo_for().is_some_and(|w| self.weapons.contains(&w))
    }
}

#[derive(Resource, Default)]
pub struct ClassMap {
    pub ids: HashMap<String, AssetId<HeroClassDef>>,
}

impl ClassMap {
    pub fn resolve<'a>(
        &self,
        assets: &'a Assets<HeroClassDef>,
        id: &str,
    ) -> Option<&'a HeroClassDef> {
        self.ids.get(id).and_then(|aid| assets.get(*aid))
    }
}

fn index_class_assets(assets: Res<Assets<HeroClassDef>>, mut map: ResMut<ClassMap>) {
    if !assets.is_changed() {
        return;
    }
    map.ids.clear();
    for (asset_id, def) in assets.iter() {
        map.ids.insert(def.id.clone(), asset_id);
    }
}
