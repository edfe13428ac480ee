use {
    bevy::{platform::collections::HashMap, prelude::*},
    mission_events::{AgentId, AgentState},
};

/// A live combatant as the core tracks it. Mirrors what the host
/// simulation reports at spawn plus running health.
#[derive(Debug, Clone)]
pub struct AgentRecord {
    pub name: String,
    pub level: i32,
    /// Campaign hero this agent embodies, if any.
    pub hero: Option<Entity>,
    pub team: Option<u8>,
    pub is_player: bool,
    pub health: f32,
    pub health_limit: f32,
    /// Averaged armor value used when applying blows.
    pub armor: f32,
    /// Set once the agent has left the mission.
    pub state: Option<AgentState>,
}

impl AgentRecord {
    pub fn is_active(&self) -> bool {
        self.state.is_none()
    }

    /// Heal without exceeding the health limit.
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.health_limit);
    }
}

/// All agents of the current mission. Ids are handed out sequentially
/// and never reused until the roster is reset for the next mission.
#[derive(Resource, Default)]
pub struct AgentRoster {
    agents: HashMap<AgentId, AgentRecord>,
    next_id: u32,
}

impl AgentRoster {
    pub fn insert(&mut self, record: AgentRecord) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        self.agents.insert(id, record);
        id
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentRecord> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut AgentRecord> {
        self.agents.get_mut(&id)
    }

    /// Agent currently embodying the given hero, if it is still active.
    pub fn agent_of(&self, hero: Entity) -> Option<AgentId> {
        self.agents
            .iter()
            .find(|(_, rec)| rec.hero == Some(hero) && rec.is_active())
            .map(|(id, _)| *id)
    }

    pub fn hero_of(&self, id: AgentId) -> Option<Entity> {
        self.agents.get(&id).and_then(|rec| rec.hero)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &AgentRecord)> {
        self.agents.iter().map(|(id, rec)| (*id, rec))
    }

    pub fn clear(&mut self) {
        self.agents.clear();
        self.next_id = 0;
    }
}
