use {
    crate::{ItemModifier, roll_modifier, weighted_order},
    bevy::{platform::collections::HashMap, prelude::*},
    class_assets::HeroClassDef,
    hero_components::{EquipSlot, EquipView},
    item_assets::{ItemDefinition, ItemKind},
    rand::Rng,
    serde::{Deserialize, Serialize},
};

/// Index into [`RewardConfig::tier_weights`] for crafted custom items.
pub const CUSTOM_TIER: usize = 6;
/// Highest tier stock items come in; custom weapons and armor build on
/// this tier.
pub const MAX_STOCK_TIER: u8 = 5;
/// Custom mounts are rarer stock, so any decent base animal will do.
pub const MIN_CUSTOM_MOUNT_TIER: u8 = 2;

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Relative weight per quality tier, cheapest first; the seventh
    /// entry is the crafted custom tier.
    pub tier_weights: [f32; 7],
    pub weapon_weight: f32,
    pub armor_weight: f32,
    pub mount_weight: f32,
    /// Strength of rolled custom modifiers, 0..=1.
    pub custom_item_power: f32,
    /// How many custom weapons of one weapon class a hero may own.
    pub max_custom_weapons_per_class: u32,
    /// Multiplier on base value when a reward is sold off instead of
    /// equipped.
    pub sell_multiplier: i64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            tier_weights: [32.0, 16.0, 8.0, 4.0, 2.0, 1.0, 0.5],
            weapon_weight: 1.0,
            armor_weight: 1.0,
            mount_weight: 0.5,
            custom_item_power: 1.0,
            max_custom_weapons_per_class: 1,
            sell_multiplier: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReward {
    pub item: String,
    pub tier: u8,
    pub is_custom: bool,
    pub modifier: Option<ItemModifier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindChoice {
    Weapon,
    Armor,
    Mount,
}

/// Pick a reward item for a hero. Tiers and item kinds are each put in
/// weighted-random preference order, and the first combination with any
/// candidate wins. The whole search runs once refusing duplicates of
/// what the hero already carries, and once more allowing them if the
/// strict pass found nothing.
pub fn generate_reward<R: Rng + ?Sized>(
    rng: &mut R,
    cfg: &RewardConfig,
    class: Option<&HeroClassDef>,
    equip: &EquipView,
    catalogue: &[&ItemDefinition],
) -> Option<GeneratedReward> {
    generate_pass(rng, cfg, class, equip, catalogue, false)
        .or_else(|| generate_pass(rng, cfg, class, equip, catalogue, true))
}

fn generate_pass<R: Rng + ?Sized>(
    rng: &mut R,
    cfg: &RewardConfig,
    class: Option<&HeroClassDef>,
    equip: &EquipView,
    catalogue: &[&ItemDefinition],
    allow_duplicates: bool,
) -> Option<GeneratedReward> {
    let by_id: HashMap<&str, &ItemDefinition> =
        catalogue.iter().map(|item| (item.id.as_str(), *item)).collect();

    let tiers = weighted_order(
        rng,
        cfg.tier_weights.iter().copied().zip(0usize..).collect(),
    );
    let kinds = weighted_order(rng, vec![
        (cfg.weapon_weight, KindChoice::Weapon),
        (cfg.armor_weight, KindChoice::Armor),
        (cfg.mount_weight, KindChoice::Mount),
    ]);

    for tier in &tiers {
        for kind in &kinds {
            let is_custom = *tier == CUSTOM_TIER;
            let candidates: Vec<&ItemDefinition> = catalogue
                .iter()
                .copied()
                .filter(|item| {
                    tier_matches(item, *tier, is_custom)
                        && kind_matches(item, *kind)
                        && class_allows(class, item)
                        && mount_family_matches(item, equip, &by_id)
                        && if is_custom {
                            custom_allowed(item, equip, &by_id, cfg)
                        } else {
                            allow_duplicates || !is_duplicate(item, equip, &by_id)
                        }
                })
                .collect();
            if candidates.is_empty() {
                continue;
            }
            let item = candidates[rng.random_range(0..candidates.len())];
            let modifier =
                is_custom.then(|| roll_modifier(rng, item.kind, cfg.custom_item_power));
            return Some(GeneratedReward {
                item: item.id.clone(),
                tier: item.tier,
                is_custom,
                modifier,
            });
        }
    }
    None
}

fn tier_matches(item: &ItemDefinition, tier: usize, is_custom: bool) -> bool {
    if is_custom {
        match item.kind {
            ItemKind::Mount { .. } => item.tier >= MIN_CUSTOM_MOUNT_TIER,
            _ => item.tier == MAX_STOCK_TIER,
        }
    } else {
        item.tier == tier as u8
    }
}

fn kind_matches(item: &ItemDefinition, kind: KindChoice) -> bool {
    matches!(
        (item.kind, kind),
        (ItemKind::Weapon { .. }, KindChoice::Weapon)
            | (ItemKind::Armor { .. }, KindChoice::Armor)
            | (ItemKind::Mount { .. }, KindChoice::Mount)
    )
}

fn class_allows(class: Option<&HeroClassDef>, item: &ItemDefinition) -> bool {
    let Some(class) = class else {
        return true;
    };
    match item.kind {
        ItemKind::Weapon { class: weapon } => class.wants_weapon(weapon),
        ItemKind::Armor { .. } => true,
        ItemKind::Mount { family } => {
            class.mounted && class.mount_family.is_none_or(|f| f == family)
        }
    }
}

/// A hero who rides already sticks to one animal family; a horse
/// archer never upgrades into a camel.
fn mount_family_matches(
    item: &ItemDefinition,
    equip: &EquipView,
    by_id: &HashMap<&str, &ItemDefinition>,
) -> bool {
    let ItemKind::Mount { family } = item.kind else {
        return true;
    };
    equip
        .battle
        .mount()
        .and_then(|owned| by_id.get(owned.item.as_str()))
        .and_then(|owned| owned.mount_family())
        .is_none_or(|owned| owned == family)
}

/// Custom crafting has its own duplicate rules: weapons are capped per
/// class, a second custom mount is never crafted, armor always rolls.
fn custom_allowed(
    item: &ItemDefinition,
    equip: &EquipView,
    by_id: &HashMap<&str, &ItemDefinition>,
    cfg: &RewardConfig,
) -> bool {
    match item.kind {
        ItemKind::Weapon { class } => {
            let owned = equip
                .customs
                .iter()
                .filter(|c| {
                    by_id.get(c.item.as_str()).and_then(|i| i.weapon_class())
                        == Some(class)
                })
                .count() as u32;
            owned < cfg.max_custom_weapons_per_class
        }
        ItemKind::Mount { .. } => !equip.customs.iter().any(|c| {
            by_id
                .get(c.item.as_str())
                .is_some_and(|i| matches!(i.kind, ItemKind::Mount { .. }))
        }),
        ItemKind::Armor { .. } => true,
    }
}

/// Would the hero gain nothing from this item: an equal-or-better
/// weapon of the same class in hand, an equal-or-better armor piece
/// worn, or a mount already owned.
fn is_duplicate(
    item: &ItemDefinition,
    equip: &EquipView,
    by_id: &HashMap<&str, &ItemDefinition>,
) -> bool {
    match item.kind {
        ItemKind::Weapon { class } => {
            equip.battle.filled_weapon_slots().any(|(_, held)| {
                by_id.get(held.item.as_str()).is_some_and(|h| {
                    h.weapon_class() == Some(class) && h.tier >= item.tier
                })
            })
        }
        ItemKind::Armor { piece } => equip
            .battle
            .get(EquipSlot::Armor(piece))
            .and_then(|worn| by_id.get(worn.item.as_str()))
            .is_some_and(|worn| worn.tier >= item.tier),
        ItemKind::Mount { .. } => equip.battle.mount().is_some(),
    }
}
