use {
    crate::{CustomItemRegistry, GeneratedReward, RewardConfig, generate_reward},
    bevy::prelude::*,
    class_assets::{ClassMap, HeroClassDef},
    command_events::RewardRequest,
    hero_components::{
        BattleEquipment, CustomItems, EquipSlot, EquipView, EquippedItem, HeroClass,
        HeroGold, WEAPON_SLOTS,
    },
    item_assets::{ItemDefinition, ItemKind},
    mission_events::ChatReply,
};

pub(crate) fn on_reward_request(
    event: On<RewardRequest>,
    config: Res<RewardConfig>,
    mut registry: ResMut<CustomItemRegistry>,
    items: Res<Assets<ItemDefinition>>,
    class_map: Res<ClassMap>,
    classes: Res<Assets<HeroClassDef>>,
    mut heroes: Query<(
        &HeroClass,
        &mut BattleEquipment,
        &mut CustomItems,
        &mut HeroGold,
    )>,
    mut commands: Commands,
) {
    let hero = event.hero;
    let Ok((class, mut battle, mut customs, mut gold)) = heroes.get_mut(hero) else {
        warn!(hero = ?hero, "reward requested for unknown hero");
        return;
    };
    let class_def = class
        .0
        .as_deref()
        .and_then(|id| class_map.resolve(&classes, id));
    let catalogue: Vec<&ItemDefinition> = items.iter().map(|(_, item)| item).collect();
    let equip = EquipView::new(&battle, Some(&customs));

    let mut rng = rand::rng();
    let Some(reward) =
        generate_reward(&mut rng, &config, class_def, &equip, &catalogue)
    else {
        commands.trigger(ChatReply {
            hero: Some(hero),
            message: "No reward could be generated!".to_string(),
        });
        return;
    };
    let Some(item) = catalogue.iter().find(|i| i.id == reward.item).copied() else {
        return;
    };

    let message = if reward.is_custom {
        craft_custom(&reward, item, &mut registry, &mut battle, &mut customs)
    } else {
        let worn_tier = |id: &str| catalogue.iter().find(|i| i.id == id).map(|i| i.tier);
        match equip_stock(item, &mut battle, worn_tier) {
            Some(_) => format!("received {}", item.name),
            None => {
                let price = item.value * config.sell_multiplier;
                gold.0 += price;
                format!("sold {} for {} gold", item.name, price)
            }
        }
    };
    info!(hero = ?hero, item = %item.id, custom = reward.is_custom, "reward assigned");
    commands.trigger(ChatReply { hero: Some(hero), message });
}

/// Register the rolled modifier, store the crafted item, and equip it
/// over whatever occupies its slot.
fn craft_custom(
    reward: &GeneratedReward,
    item: &ItemDefinition,
    registry: &mut CustomItemRegistry,
    battle: &mut BattleEquipment,
    customs: &mut CustomItems,
) -> String {
    let modifier_id = reward
        .modifier
        .clone()
        .map(|modifier| registry.register(modifier));
    let equipped = EquippedItem { item: item.id.clone(), modifier: modifier_id };
    customs.0.push(equipped.clone());

    let slot = match item.kind {
        ItemKind::Weapon { .. } => free_weapon_slot(battle).unwrap_or(EquipSlot::Weapon(0)),
        ItemKind::Armor { piece } => EquipSlot::Armor(piece),
        ItemKind::Mount { .. } => EquipSlot::Mount,
    };
    battle.0.set(slot, equipped);
    format!("received {} (custom)", item.name)
}

/// Equip a stock reward if a sensible slot is open, upgrading worn
/// armor in place. `None` means the item has nowhere to go.
fn equip_stock(
    item: &ItemDefinition,
    battle: &mut BattleEquipment,
    worn_tier: impl Fn(&str) -> Option<u8>,
) -> Option<EquipSlot> {
    let slot = match item.kind {
        ItemKind::Weapon { .. } => free_weapon_slot(battle)?,
        ItemKind::Armor { piece } => {
            let slot = EquipSlot::Armor(piece);
            if battle.0.get(slot).is_some_and(|worn| {
                worn.is_custom() || worn_tier(&worn.item).is_some_and(|t| t >= item.tier)
            }) {
                return None;
            }
            slot
        }
        ItemKind::Mount { .. } => {
            if battle.0.mount().is_some() {
                return None;
            }
            EquipSlot::Mount
        }
    };
    battle.0.set(slot, EquippedItem::stock(item.id.clone()));
    Some(slot)
}

fn free_weapon_slot(battle: &BattleEquipment) -> Option<EquipSlot> {
    (0..WEAPON_SLOTS)
        .map(EquipSlot::Weapon)
        .find(|slot| battle.0.get(*slot).is_none())
}
