//! Mission-side core: the live agent roster, the listener hub that fans
//! mission events out to interested subsystems, the blow pipeline, and
//! the kill reward calculator.

use {bevy::prelude::*, mission_events::*, states::GameState};

mod ctx;
mod kill_effects;
mod listeners;
mod roster;
mod systems;

// `Deferred` must be named explicitly: a glob re-export would lose to
// `bevy::prelude::Deferred` (the ECS system param) at every use site.
pub use {
    ctx::{Action, Deferred, MissionCtx},
    kill_effects::*,
    listeners::*,
    roster::*,
    systems::*,
};

#[cfg(test)]
mod tests;

/// Stages of blow processing within one `Update`. Damage modifiers run
/// strictly between collection and application.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlowStage {
    Collect,
    Modify,
    Apply,
}

pub struct MissionPlugin;

impl Plugin for MissionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MissionInfo>()
            .init_resource::<MissionClock>()
            .init_resource::<AgentRoster>()
            .init_resource::<MissionListeners>()
            .init_resource::<Deferred>()
            .init_resource::<BlowQueue>()
            .configure_sets(
                Update,
                (BlowStage::Collect, BlowStage::Modify, BlowStage::Apply).chain(),
            )
            .add_systems(
                Update,
                (
                    tick_mission_clock,
                    collect_blows.in_set(BlowStage::Collect),
                    apply_blows.in_set(BlowStage::Apply),
                )
                    .run_if(in_state(GameState::Mission)),
            )
            // Deferred actions flush even after the mission state ends,
            // so mission-over listeners still get their say.
            .add_systems(Update, drain_deferred.after(BlowStage::Apply))
            .add_observer(on_mission_started)
            .add_observer(on_run_state_changed)
            .add_observer(on_mission_ended)
            .add_observer(on_mode_changed)
            .add_observer(on_mission_tick)
            .add_observer(on_mission_reset)
            .add_observer(on_slow_tick)
            .add_observer(on_spawn_agent)
            .add_observer(on_remove_agent);
    }
}

/// Coarse facts about the current mission, mirrored from the host
/// simulation.
#[derive(Resource, Default)]
pub struct MissionInfo {
    pub active: bool,
    pub run_state: MissionRunState,
    pub mode: MissionMode,
    pub is_tournament: bool,
}

/// Mission time and the slow-tick accumulator. The accumulator only
/// ever subtracts whole periods so long frames still emit every tick.
#[derive(Resource, Default)]
pub struct MissionClock {
    pub elapsed: f32,
    pub slow_tick_accum: f32,
}

/// Seconds between slow ticks.
pub const SLOW_TICK_PERIOD: f32 = 2.0;
