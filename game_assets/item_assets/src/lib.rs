//! Equippable item catalogue loaded from `.item.ron` files.

use {
    bevy::{asset::AssetId, platform::collections::HashMap, prelude::*},
    bevy_common_assets::ron::RonAssetPlugin,
    hero_components::{ArmorPiece, MountFamily, WeaponClass},
    serde::{Deserialize, Serialize},
};

pub struct ItemAssetsPlugin;

impl Plugin for ItemAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<ItemDefinition>::new(&["item.ron"]))
            .init_resource::<ItemMap>()
            .add_systems(Update, index_item_assets);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon { class: WeaponClass },
    Armor { piece: ArmorPiece },
    Mount { family: MountFamily },
}

#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    /// Quality tier, 0..=5. Tiers above 5 only exist as custom items.
    pub tier: u8,
    pub kind: ItemKind,
    /// Base trade value in gold.
    pub value: i64,
}

impl ItemDefinition {
    pub fn weapon_class(&self) -> Option<WeaponClass> {
        match self.kind {
            ItemKind::Weapon { class } => Some(class),
            _ => None,
        }
    }

    pub fn mount_family(&self) -> Option<MountFamily> {
        match self.kind {
            ItemKind::Mount { family } => Some(family),
            _ => None,
        }
    }
}

/// Index from item id to its loaded asset.
#[derive(Resource, Default)]
pub struct ItemMap {
    pub ids: HashMap<String, AssetId<ItemDefinition>>,
}

impl ItemMap {
    pub fn resolve<'a>(
        &self,
        assets: &'a Assets<ItemDefinition>,
        id: &str,
    ) -> Option<&'a ItemDefinition> {
        self.ids.get(id).and_then(|aid| assets.get(*aid))
    }
}

fn index_item_assets(assets: Res<Assets<ItemDefinition>>, mut map: ResMut<ItemMap>) {
    if !assets.is_changed() {
        return;
    }
    map.ids.clear();
    for (asset_id, def) in assets.iter() {
        if map.ids.insert(def.id.clone(), asset_id).is_some() {
            warn!(item_id = %def.id, "duplicate item id, keeping the last one loaded");
        }
    }
}
