use {
    bevy::prelude::*,
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
};

mod equipment;
mod skills;

pub use equipment::*;
pub use skills::*;


/// Marker for a persistent campaign character that viewers can adopt.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct Hero;

/// Display name as the campaign layer knows it.
#[derive(Component, Reflect, Default, Clone)]
#[reflect(Component)]
pub struct HeroName(pub String);

#[derive(Component, Reflect, Default, Clone, Copy)]
#[reflect(Component)]
pub struct Level(pub i32);

#[derive(Component, Reflect, Default, Clone, Copy)]
#[reflect(Component)]
pub struct HeroGold(pub i64);

/// References the hero's class definition by id, if any.
#[derive(Component, Reflect, Default, Clone)]
#[reflect(Component)]
pub struct HeroClass(pub Option<String>);

/// Set on a hero when a viewer has claimed it.
#[derive(Component, Reflect, Default, Clone)]
#[reflect(Component)]
pub struct Adopted {
    pub viewer: String,
    pub subscriber: bool,
}

/// Per-hero counters backing dynamic unlock requirements
/// (kills, deaths, summons, tournament wins, ...).
#[derive(Component, Reflect, Default, Clone)]
#[reflect(Component)]
pub struct HeroStats {
    pub counters: HashMap<String, u32>,
}

impl HeroStats {
    pub fn bump(&mut self, key: &str, amount: u32) {
        *self.counters.entry(key.to_string()).or_default() += amount;
    }

    pub fn get(&self, key: &str) -> u32 {
        self.counters.get(key).copied().unwrap_or(0)
    }
}

/// Plain read-only view of a hero, assembled by systems so that pure
/// logic (requirement checks, reward generation) never touches the ECS.
#[derive(Debug, Clone, Default)]
pub struct HeroSnapshot {
    pub level: i32,
    pub gold: i64,
    pub counters: HashMap<String, u32>,
}

impl HeroSnapshot {
    pub fn counter(&self, key: &str) -> u32 {
        self.counters.get(key).copied().unwrap_or(0)
    }
}

/// Well-known counter keys used by the built-in listeners.
pub mod stat_keys {
    pub const KILLS: &str = "kills";
    pub const DEATHS: &str = "deaths";
    pub const SUMMONS: &str = "summons";
    pub const TOURNAMENT_WINS: &str = "tournament_wins";
}

pub struct HeroComponentsPlugin;

impl Plugin for HeroComponentsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Hero>()
            .register_type::<HeroName>()
            .register_type::<Level>()
            .register_type::<HeroGold>()
            .register_type::<HeroClass>()
            .register_type::<Adopted>()
            .register_type::<HeroStats>()
            .register_type::<BattleEquipment>()
            .register_type::<CivilianEquipment>()
            .register_type::<CustomItems>()
            .register_type::<SkillSet>();
    }
}

/// Broad weapon classification used by class definitions and the reward
/// engine's duplicate/ammo heuristics.
#[derive(
    Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum WeaponClass {
    OneHanded,
    TwoHanded,
    Polearm,
    Bow,
    Crossbow,
    Arrows,
    Bolts,
    Throwing,
    Shield,
}

impl WeaponClass {
    /// The weapon class that consumes this ammo class, if it is one.
    pub fn ammo_for(self) -> Option<WeaponClass> {
        match self {
            WeaponClass::Arrows => Some(WeaponClass::Bow),
            WeaponClass::Bolts => Some(WeaponClass::Crossbow),
            _ => None,
        }
    }
}

#[derive(
    Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum ArmorPiece {
    Head,
    Body,
    Leg,
    Gloves,
    Cape,
}

/// All five armor slot/piece pairs, in the order the reward engine
/// iterates them.
pub const ARMOR_PIECES: [ArmorPiece; 5] = [
    ArmorPiece::Head,
    ArmorPiece::Body,
    ArmorPiece::Leg,
    ArmorPiece::Gloves,
    ArmorPiece::Cape,
];

#[derive(
    Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum MountFamily {
    Horse,
    Camel,
}
