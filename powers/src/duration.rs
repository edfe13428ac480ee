use {
    crate::{PowerExpiry, PowerHandler, StatModifiers},
    bevy::prelude::*,
    mission::{AgentRoster, MissionClock, MissionInfo},
    mission_events::{
        EffectCue, EffectPhase, MissionMode, MissionRunState, PowerActivated, PowerExpired,
    },
    power_assets::PowerDefinition,
};

/// Why a timed power cannot start right now. The message is sent to
/// chat verbatim. A live agent is only demanded by behaviors that act
/// through one; the rest can be fired from the bench.
pub fn can_activate(
    hero: Entity,
    def: &PowerDefinition,
    info: &MissionInfo,
    roster: &AgentRoster,
    expiry: &PowerExpiry,
) -> Result<(), &'static str> {
    if !info.active {
        return Err("No mission is active!");
    }
    if info.run_state != MissionRunState::Continuing
        || (info.is_tournament && info.mode != MissionMode::Battle)
    {
        return Err("Mission has not started yet!");
    }
    if def.requires_agent() && roster.agent_of(hero).is_none() {
        return Err("Your hero is not alive!");
    }
    if expiry.deadlines.contains_key(&(hero, def.id.clone())) {
        return Err("Already active!");
    }
    Ok(())
}

/// Start a timed power: record the deadline, attach its hooks, and
/// announce start cues. Callers check [`can_activate`] first.
pub fn activate(
    hero: Entity,
    def: &PowerDefinition,
    clock: &MissionClock,
    expiry: &mut PowerExpiry,
    handler: &mut PowerHandler,
    stats: &mut StatModifiers,
    commands: &mut Commands,
) {
    expiry
        .deadlines
        .insert((hero, def.id.clone()), clock.elapsed + def.duration_seconds);
    crate::attach_behavior(hero, def, handler, stats);
    commands.trigger(PowerActivated { hero, power: def.id.clone() });
    for fx in &def.fx {
        commands.trigger(EffectCue {
            hero,
            effect: fx.name.clone(),
            phase: EffectPhase::Start,
        });
    }
    debug!(power = %def.id, "power activated");
}

/// Tear a timed power down: drop the deadline, detach hooks, announce
/// stop cues. Safe to call for powers that already lapsed.
pub fn expire(
    hero: Entity,
    def: &PowerDefinition,
    expiry: &mut PowerExpiry,
    handler: &mut PowerHandler,
    stats: &mut StatModifiers,
    commands: &mut Commands,
) {
    if expiry.deadlines.remove(&(hero, def.id.clone())).is_none() {
        return;
    }
    crate::detach_behavior(hero, def, handler, stats);
    commands.trigger(PowerExpired { hero, power: def.id.clone() });
    for fx in &def.fx {
        commands.trigger(EffectCue {
            hero,
            effect: fx.name.clone(),
            phase: EffectPhase::Stop,
        });
    }
    debug!(power = %def.id, "power expired");
}

/// Seconds left on a running power, `None` when it is not active.
pub fn duration_remaining(
    hero: Entity,
    power_id: &str,
    clock: &MissionClock,
    expiry: &PowerExpiry,
) -> Option<f32> {
    expiry
        .deadlines
        .get(&(hero, power_id.to_string()))
        .map(|deadline| (deadline - clock.elapsed).max(0.0))
}
