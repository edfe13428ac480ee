use {
    bevy::prelude::*,
    serde::{Deserialize, Serialize},
};

pub struct MissionEventsPlugin;

impl Plugin for MissionEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<RegisterBlow>();
    }
}

/// Identifies a live combatant within a single mission. Ids are never
/// reused within one mission; a new mission starts a fresh roster.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect,
)]
pub struct AgentId(pub u32);

/// Terminal state an agent was removed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum AgentState {
    Killed,
    Unconscious,
    Routed,
    Deleted,
}

impl AgentState {
    pub fn verb(self) -> &'static str {
        match self {
            AgentState::Routed => "routed",
            AgentState::Unconscious => "knocked out",
            AgentState::Killed => "killed",
            AgentState::Deleted => "deleted",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect,
)]
pub enum MissionMode {
    #[default]
    Deployment,
    Battle,
    Tournament,
    Conversation,
}

/// Coarse mission lifecycle, as reported by the host simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissionRunState {
    #[default]
    Initializing,
    Continuing,
    Over,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect,
)]
pub enum DamageType {
    #[default]
    Cut,
    Pierce,
    Blunt,
}

/// Hit behavior flag set. Powers can add or remove whole sets of these
/// on incoming blows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect,
)]
pub struct HitBehavior {
    pub shrug_off: bool,
    pub knock_back: bool,
    pub knock_down: bool,
    pub crush_through: bool,
}

impl HitBehavior {
    pub fn add(&mut self, other: HitBehavior) {
        self.shrug_off |= other.shrug_off;
        self.knock_back |= other.knock_back;
        self.knock_down |= other.knock_down;
        self.crush_through |= other.crush_through;
    }

    pub fn remove(&mut self, other: HitBehavior) {
        self.shrug_off &= !other.shrug_off;
        self.knock_back &= !other.knock_back;
        self.knock_down &= !other.knock_down;
        self.crush_through &= !other.crush_through;
    }
}

/// Mutable payload of a blow as it passes through the do-damage and
/// take-damage hook chains.
#[derive(Debug, Clone, PartialEq)]
pub struct BlowParams {
    pub attacker: Option<AgentId>,
    pub victim: AgentId,
    pub damage: i32,
    pub damage_type: DamageType,
    pub behavior: HitBehavior,
    /// Fraction (0..=1) of the victim's armor ignored when applying.
    pub armor_ignore_fraction: f32,
    /// Set on blows spawned by powers (e.g. reflected damage); synthetic
    /// blows skip the hook chains so they cannot cascade.
    pub synthetic: bool,
}

impl BlowParams {
    pub fn new(attacker: Option<AgentId>, victim: AgentId, damage: i32) -> Self {
        Self {
            attacker,
            victim,
            damage,
            damage_type: DamageType::default(),
            behavior: HitBehavior::default(),
            armor_ignore_fraction: 0.0,
            synthetic: false,
        }
    }
}

/// Buffered damage registration, the host-facing entry into the blow
/// pipeline.
#[derive(Message, Debug, Clone)]
pub struct RegisterBlow(pub BlowParams);

// --- Observer events -------------------------------------------------------

#[derive(Event, Debug, Clone)]
pub struct MissionStarted {
    pub mode: MissionMode,
    pub is_tournament: bool,
}

#[derive(Event, Debug, Clone)]
pub struct MissionEnded;

#[derive(Event, Debug, Clone)]
pub struct MissionModeChanged {
    pub old_mode: MissionMode,
    pub new_mode: MissionMode,
    pub at_start: bool,
}

/// The host restarted the current mission in place (tournament round
/// reset, retry) without tearing it down.
#[derive(Event, Debug, Clone)]
pub struct MissionReset;

/// Fired every frame while the mission is running.
#[derive(Event, Debug, Clone)]
pub struct MissionTick {
    pub dt: f32,
}

/// Fired once per elapsed slow-tick period (~2s of mission time).
#[derive(Event, Debug, Clone)]
pub struct MissionSlowTick {
    pub dt: f32,
}

/// An agent entered the mission. `hero` is set when the agent embodies a
/// campaign hero.
#[derive(Event, Debug, Clone)]
pub struct AgentBuilt {
    pub agent: AgentId,
    pub hero: Option<Entity>,
}

/// An agent left the mission (killed, knocked out, routed or deleted).
#[derive(Event, Debug, Clone)]
pub struct AgentSlain {
    pub victim: AgentId,
    pub victim_hero: Option<Entity>,
    pub killer: Option<AgentId>,
    pub killer_hero: Option<Entity>,
    pub state: AgentState,
}

/// Human-readable feedback destined for chat / the overlay.
#[derive(Event, Debug, Clone)]
pub struct ChatReply {
    pub hero: Option<Entity>,
    pub message: String,
}

#[derive(Event, Debug, Clone)]
pub struct PowerActivated {
    pub hero: Entity,
    pub power: String,
}

#[derive(Event, Debug, Clone)]
pub struct PowerExpired {
    pub hero: Entity,
    pub power: String,
}

/// Particle/sound cue for an external presentation layer.
#[derive(Event, Debug, Clone)]
pub struct EffectCue {
    pub hero: Entity,
    pub effect: String,
    pub phase: EffectPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectPhase {
    Start,
    Stop,
}
