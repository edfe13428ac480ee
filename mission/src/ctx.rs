use {
    crate::{AgentRoster, MissionInfo},
    bevy::prelude::*,
    mission_events::{AgentId, BlowParams},
};

/// What a mission listener gets to see and touch while handling an
/// event. Anything that could re-enter the hub (replies, gold, new
/// blows, listener removal) is queued on [`Deferred`] instead of
/// applied in place.
pub struct MissionCtx<'a> {
    pub info: &'a MissionInfo,
    pub roster: &'a mut AgentRoster,
    pub deferred: &'a mut Deferred,
}

/// Side effects queued during listener dispatch and drained once the
/// dispatch is over. Keeps listeners free of ECS access and makes
/// removal-during-dispatch safe.
#[derive(Resource, Default)]
pub struct Deferred {
    actions: Vec<Action>,
}

pub enum Action {
    Reply { hero: Option<Entity>, message: String },
    GiveGold { hero: Entity, amount: i64 },
    GiveXp { hero: Entity, amount: f32 },
    BumpStat { hero: Entity, key: String, amount: u32 },
    HealAgent { agent: AgentId, amount: f32 },
    Blow(BlowParams),
    RemoveListeners(Entity),
}

impl Deferred {
    pub fn reply(&mut self, hero: Option<Entity>, message: impl Into<String>) {
        self.actions.push(Action::Reply { hero, message: message.into() });
    }

    pub fn give_gold(&mut self, hero: Entity, amount: i64) {
        self.actions.push(Action::GiveGold { hero, amount });
    }

    pub fn give_xp(&mut self, hero: Entity, amount: f32) {
        self.actions.push(Action::GiveXp { hero, amount });
    }

    pub fn bump_stat(&mut self, hero: Entity, key: &str, amount: u32) {
        self.actions.push(Action::BumpStat { hero, key: key.to_string(), amount });
    }

    pub fn heal_agent(&mut self, agent: AgentId, amount: f32) {
        self.actions.push(Action::HealAgent { agent, amount });
    }

    /// Queue a power-generated blow. The blow is marked synthetic so it
    /// skips the damage hook chains and cannot cascade.
    pub fn blow(&mut self, mut params: BlowParams) {
        params.synthetic = true;
        self.actions.push(Action::Blow(params));
    }

    pub fn remove_listeners(&mut self, owner: Entity) {
        self.actions.push(Action::RemoveListeners(owner));
    }

    pub fn drain(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
