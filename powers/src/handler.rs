use {
    bevy::{platform::collections::HashMap, prelude::*},
    power_assets::PowerBehavior,
};

/// Per-hit hook registry. Each attached power contributes its behavior
/// to exactly one of the two hook lists; blow processing walks the
/// lists in attachment order.
#[derive(Default)]
pub struct HookSet {
    /// Runs against blows the owning hero's agent receives.
    pub take_damage: Vec<PowerBehavior>,
    /// Runs against blows the owning hero's agent inflicts.
    pub do_damage: Vec<PowerBehavior>,
}

impl HookSet {
    pub fn is_empty(&self) -> bool {
        self.take_damage.is_empty() && self.do_damage.is_empty()
    }
}

/// All currently attached power hooks, keyed by hero and power id.
/// Attachment is idempotent per key: configuring an already-attached
/// power is a no-op, so repeated activations cannot stack hooks.
#[derive(Resource, Default)]
pub struct PowerHandler {
    hooks: HashMap<(Entity, String), HookSet>,
}

impl PowerHandler {
    pub fn has_handlers(&self, hero: Entity, power: &str) -> bool {
        self.hooks.contains_key(&(hero, power.to_string()))
    }

    /// Attach a behavior's hooks for `(hero, power)`. Behaviors without
    /// per-hit hooks still claim the key so idempotence holds for them
    /// too.
    pub fn configure(&mut self, hero: Entity, power: &str, behavior: &PowerBehavior) {
        let key = (hero, power.to_string());
        if self.hooks.contains_key(&key) {
            return;
        }
        let mut set = HookSet::default();
        match behavior {
            PowerBehavior::AbsorbHealth { .. } | PowerBehavior::AddDamage { .. } => {
                set.do_damage.push(behavior.clone());
            }
            PowerBehavior::ReflectDamage { .. } | PowerBehavior::TakeDamage { .. } => {
                set.take_damage.push(behavior.clone());
            }
            PowerBehavior::AddHealth { .. } | PowerBehavior::StatModify { .. } => {}
        }
        self.hooks.insert(key, set);
    }

    pub fn clear(&mut self, hero: Entity, power: &str) {
        self.hooks.remove(&(hero, power.to_string()));
    }

    pub fn clear_hero(&mut self, hero: Entity) {
        self.hooks.retain(|(owner, _), _| *owner != hero);
    }

    pub fn clear_all(&mut self) {
        self.hooks.clear();
    }

    pub fn take_damage_hooks(&self, hero: Entity) -> impl Iterator<Item = &PowerBehavior> {
        self.hooks
            .iter()
            .filter(move |((owner, _), _)| *owner == hero)
            .flat_map(|(_, set)| set.take_damage.iter())
    }

    pub fn do_damage_hooks(&self, hero: Entity) -> impl Iterator<Item = &PowerBehavior> {
        self.hooks
            .iter()
            .filter(move |((owner, _), _)| *owner == hero)
            .flat_map(|(_, set)| set.do_damage.iter())
    }
}
