use {
    bevy::{platform::collections::HashMap, prelude::*},
    hero_components::WeaponClass,
    item_assets::ItemKind,
    rand::Rng,
    serde::{Deserialize, Serialize},
};

/// The stat package a crafted custom item carries on top of its base
/// item. Which variant applies follows the base item's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemModifier {
    Weapon { damage_multiplier: f32, speed_multiplier: f32 },
    Ammo { extra_ammo: u32 },
    Armor { armor_multiplier: f32 },
    Mount { speed_multiplier: f32, hitpoints_multiplier: f32 },
}

/// Registry of every modifier ever crafted, keyed by the id stored on
/// the owning [`hero_components::EquippedItem`]. Ids are never reused.
#[derive(Resource, Default)]
pub struct CustomItemRegistry {
    next_id: u32,
    pub modifiers: HashMap<u32, ItemModifier>,
}

impl CustomItemRegistry {
    pub fn register(&mut self, modifier: ItemModifier) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.modifiers.insert(id, modifier);
        id
    }

    pub fn get(&self, id: u32) -> Option<&ItemModifier> {
        self.modifiers.get(&id)
    }
}

/// Roll a modifier for a custom reward. `power` in 0..=1 scales how far
/// above stock the rolled stats may land.
pub fn roll_modifier<R: Rng + ?Sized>(rng: &mut R, kind: ItemKind, power: f32) -> ItemModifier {
    let power = power.clamp(0.0, 1.0);
    let roll = |rng: &mut R, max_bonus: f32| 1.0 + rng.random_range(0.0..=max_bonus * power);
    match kind {
        ItemKind::Weapon { class } if matches!(class, WeaponClass::Arrows | WeaponClass::Bolts) => {
            ItemModifier::Ammo {
                extra_ammo: rng.random_range(1..=(1 + (10.0 * power) as u32)),
            }
        }
        ItemKind::Weapon { .. } => ItemModifier::Weapon {
            damage_multiplier: roll(rng, 0.5),
            speed_multiplier: roll(rng, 0.25),
        },
        ItemKind::Armor { .. } => ItemModifier::Armor { armor_multiplier: roll(rng, 0.5) },
        ItemKind::Mount { .. } => ItemModifier::Mount {
            speed_multiplier: roll(rng, 0.25),
            hitpoints_multiplier: roll(rng, 0.5),
        },
    }
}
