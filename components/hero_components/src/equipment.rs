use {
    crate::ArmorPiece,
    bevy::prelude::*,
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
};

/// Equipment slot identifiers. Heroes carry up to four weapons, five
/// armor pieces and a mount.
#[derive(
    Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum EquipSlot {
    Weapon(u8),
    Armor(ArmorPiece),
    Mount,
}

pub const WEAPON_SLOTS: u8 = 4;

/// A slotted item reference: the item definition id plus the id of a
/// registered custom modifier, when the item is a crafted reward.
#[derive(Reflect, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub item: String,
    pub modifier: Option<u32>,
}

impl EquippedItem {
    pub fn stock(item: impl Into<String>) -> Self {
        Self { item: item.into(), modifier: None }
    }

    pub fn is_custom(&self) -> bool {
        self.modifier.is_some()
    }
}

#[derive(Reflect, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equipment {
    pub slots: HashMap<EquipSlot, EquippedItem>,
}

impl Equipment {
    pub fn get(&self, slot: EquipSlot) -> Option<&EquippedItem> {
        self.slots.get(&slot)
    }

    pub fn set(&mut self, slot: EquipSlot, item: EquippedItem) {
        self.slots.insert(slot, item);
    }

    pub fn mount(&self) -> Option<&EquippedItem> {
        self.slots.get(&EquipSlot::Mount)
    }

    pub fn filled_weapon_slots(
        &self,
    ) -> impl Iterator<Item = (EquipSlot, &EquippedItem)> {
        (0..WEAPON_SLOTS).filter_map(|i| {
            let slot = EquipSlot::Weapon(i);
            self.slots.get(&slot).map(|e| (slot, e))
        })
    }

    pub fn filled_armor_slots(
        &self,
    ) -> impl Iterator<Item = (ArmorPiece, &EquippedItem)> {
        crate::ARMOR_PIECES.iter().filter_map(|&piece| {
            self.slots.get(&EquipSlot::Armor(piece)).map(|e| (piece, e))
        })
    }
}

/// Loadout used in missions.
#[derive(Component, Reflect, Default, Clone)]
#[reflect(Component)]
pub struct BattleEquipment(pub Equipment);

/// Loadout outside missions. The mission layer never touches it.
#[derive(Component, Reflect, Default, Clone)]
#[reflect(Component)]
pub struct CivilianEquipment(pub Equipment);

/// Crafted reward items the hero owns, whether equipped or stored.
/// Everything in here carries a registered modifier.
#[derive(Component, Reflect, Default, Clone)]
#[reflect(Component)]
pub struct CustomItems(pub Vec<EquippedItem>);

/// Hero-facing view of equipment for the reward engine: what is worn,
/// what custom items exist, which classes of weapon are already held.
#[derive(Debug, Clone, Default)]
pub struct EquipView {
    pub battle: Equipment,
    pub customs: Vec<EquippedItem>,
}

impl EquipView {
    pub fn new(battle: &BattleEquipment, customs: Option<&CustomItems>) -> Self {
        Self {
            battle: battle.0.clone(),
            customs: customs.map(|c| c.0.clone()).unwrap_or_default(),
        }
    }
}
