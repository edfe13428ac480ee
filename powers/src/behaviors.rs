use {
    crate::{PowerHandler, StatModifiers},
    bevy::prelude::*,
    mission::AgentRecord,
    power_assets::{PowerBehavior, PowerDefinition},
};

/// Wire a power's behavior up for a hero. Hook-based behaviors land in
/// the handler; stat modifiers land in the read-back table.
pub fn attach_behavior(
    hero: Entity,
    def: &PowerDefinition,
    handler: &mut PowerHandler,
    stats: &mut StatModifiers,
) {
    if handler.has_handlers(hero, &def.id) {
        return;
    }
    handler.configure(hero, &def.id, &def.behavior);
    if let PowerBehavior::StatModify { stat, amount } = &def.behavior {
        stats.apply(hero, stat, *amount);
    }
}

pub fn detach_behavior(
    hero: Entity,
    def: &PowerDefinition,
    handler: &mut PowerHandler,
    stats: &mut StatModifiers,
) {
    if !handler.has_handlers(hero, &def.id) {
        return;
    }
    handler.clear(hero, &def.id);
    if let PowerBehavior::StatModify { stat, amount } = &def.behavior {
        stats.retract(hero, stat, *amount);
    }
}

/// Apply a spawn-time health adjustment to a fresh agent record. Only
/// meaningful for passive powers; actives never carry this behavior.
pub fn apply_spawn_health(def: &PowerDefinition, record: &mut AgentRecord) {
    if let PowerBehavior::AddHealth { modifier_percent, add } = def.behavior {
        record.health_limit =
            (record.health_limit * modifier_percent / 100.0 + add).max(1.0);
        record.health = record.health_limit;
    }
}
