use {
    crate::{
        Action, AgentRecord, AgentRoster, Deferred, MissionClock, MissionCtx,
        MissionInfo, MissionListeners, SLOW_TICK_PERIOD, dispatch,
    },
    bevy::prelude::*,
    hero_components::{HeroGold, HeroStats, SkillSet},
    mission_events::*,
    states::GameState,
};

/// Host-facing: a combatant entered the mission.
#[derive(Event, Debug, Clone)]
pub struct SpawnAgent(pub AgentRecord);

/// Host-facing: a combatant left the mission. Blow-driven deaths funnel
/// through here as well, so every removal takes the same path.
#[derive(Event, Debug, Clone)]
pub struct RemoveAgent {
    pub agent: AgentId,
    pub killer: Option<AgentId>,
    pub state: AgentState,
}

/// Host-facing: deployment finished or the mission is wrapping up.
#[derive(Event, Debug, Clone)]
pub struct MissionRunStateChanged(pub MissionRunState);

/// Blows waiting to be applied this frame. Damage-modifying powers
/// rewrite entries in place during [`crate::BlowStage::Modify`].
#[derive(Resource, Default)]
pub struct BlowQueue {
    pub blows: Vec<BlowParams>,
}

pub(crate) fn tick_mission_clock(
    time: Res<Time>,
    info: Res<MissionInfo>,
    mut clock: ResMut<MissionClock>,
    mut commands: Commands,
) {
    if !info.active || info.run_state != MissionRunState::Continuing {
        return;
    }
    let dt = time.delta_secs();
    let ticks = advance_clock(&mut clock, dt);
    commands.trigger(MissionTick { dt });
    for _ in 0..ticks {
        commands.trigger(MissionSlowTick { dt: SLOW_TICK_PERIOD });
    }
}

/// Advance mission time and count how many whole slow-tick periods
/// elapsed. The accumulator only subtracts periods, so a long frame
/// still yields every tick it covers.
pub(crate) fn advance_clock(clock: &mut MissionClock, dt: f32) -> u32 {
    clock.elapsed += dt;
    clock.slow_tick_accum += dt;
    let mut ticks = 0;
    while clock.slow_tick_accum >= SLOW_TICK_PERIOD {
        clock.slow_tick_accum -= SLOW_TICK_PERIOD;
        ticks += 1;
    }
    ticks
}

pub(crate) fn collect_blows(
    mut reader: MessageReader<RegisterBlow>,
    mut queue: ResMut<BlowQueue>,
) {
    for blow in reader.read() {
        queue.blows.push(blow.0.clone());
    }
}

pub(crate) fn apply_blows(
    mut queue: ResMut<BlowQueue>,
    mut roster: ResMut<AgentRoster>,
    mut commands: Commands,
) {
    for blow in queue.blows.drain(..) {
        let Some(victim) = roster.get_mut(blow.victim) else {
            warn!(victim = ?blow.victim, "blow against unknown agent");
            continue;
        };
        if !victim.is_active() {
            continue;
        }
        let armor = victim.armor * (1.0 - blow.armor_ignore_fraction.clamp(0.0, 1.0));
        let inflicted = (blow.damage as f32 - armor).max(0.0);
        victim.health -= inflicted;
        if victim.health <= 0.0 {
            victim.health = 0.0;
            commands.trigger(RemoveAgent {
                agent: blow.victim,
                killer: blow.attacker,
                state: AgentState::Killed,
            });
        }
    }
}

pub(crate) fn on_mission_started(
    event: On<MissionStarted>,
    mut info: ResMut<MissionInfo>,
    mut clock: ResMut<MissionClock>,
    mut roster: ResMut<AgentRoster>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    next_state.set(GameState::Mission);
    *clock = MissionClock::default();
    roster.clear();
    info.active = true;
    info.run_state = MissionRunState::Initializing;
    info.mode = event.mode;
    info.is_tournament = event.is_tournament;
    info!(mode = ?event.mode, tournament = event.is_tournament, "mission started");
}

pub(crate) fn on_run_state_changed(
    event: On<MissionRunStateChanged>,
    mut info: ResMut<MissionInfo>,
) {
    info.run_state = event.0;
}

pub(crate) fn on_mission_ended(
    _: On<MissionEnded>,
    mut info: ResMut<MissionInfo>,
    mut clock: ResMut<MissionClock>,
    mut roster: ResMut<AgentRoster>,
    mut listeners: ResMut<MissionListeners>,
    mut deferred: ResMut<Deferred>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    next_state.set(GameState::Campaign);
    dispatch(&mut listeners, |_, bundle| {
        if let Some(f) = bundle.mission_over.as_mut() {
            let mut ctx =
                MissionCtx { info: &*info, roster: &mut *roster, deferred: &mut *deferred };
            f(&mut ctx, ());
        }
    });
    listeners.clear();
    roster.clear();
    *clock = MissionClock::default();
    *info = MissionInfo::default();
    info!("mission ended, hub cleared");
}

pub(crate) fn on_mode_changed(
    event: On<MissionModeChanged>,
    mut info: ResMut<MissionInfo>,
    mut roster: ResMut<AgentRoster>,
    mut listeners: ResMut<MissionListeners>,
    mut deferred: ResMut<Deferred>,
) {
    info.mode = event.new_mode;
    if event.new_mode == MissionMode::Tournament {
        info.is_tournament = true;
    }
    dispatch(&mut listeners, |_, bundle| {
        if let Some(f) = bundle.mode_changed.as_mut() {
            let mut ctx =
                MissionCtx { info: &*info, roster: &mut *roster, deferred: &mut *deferred };
            f(&mut ctx, (event.old_mode, event.new_mode, event.at_start));
        }
    });
}

pub(crate) fn on_mission_tick(
    event: On<MissionTick>,
    info: Res<MissionInfo>,
    mut roster: ResMut<AgentRoster>,
    mut listeners: ResMut<MissionListeners>,
    mut deferred: ResMut<Deferred>,
) {
    dispatch(&mut listeners, |_, bundle| {
        if let Some(f) = bundle.tick.as_mut() {
            let mut ctx =
                MissionCtx { info: &*info, roster: &mut *roster, deferred: &mut *deferred };
            f(&mut ctx, event.dt);
        }
    });
}

pub(crate) fn on_mission_reset(
    _: On<MissionReset>,
    info: Res<MissionInfo>,
    mut roster: ResMut<AgentRoster>,
    mut listeners: ResMut<MissionListeners>,
    mut deferred: ResMut<Deferred>,
) {
    dispatch(&mut listeners, |_, bundle| {
        if let Some(f) = bundle.mission_reset.as_mut() {
            let mut ctx =
                MissionCtx { info: &*info, roster: &mut *roster, deferred: &mut *deferred };
            f(&mut ctx, ());
        }
    });
    info!("mission reset");
}

pub(crate) fn on_slow_tick(
    event: On<MissionSlowTick>,
    info: Res<MissionInfo>,
    mut roster: ResMut<AgentRoster>,
    mut listeners: ResMut<MissionListeners>,
    mut deferred: ResMut<Deferred>,
) {
    dispatch(&mut listeners, |_, bundle| {
        if let Some(f) = bundle.slow_tick.as_mut() {
            let mut ctx =
                MissionCtx { info: &*info, roster: &mut *roster, deferred: &mut *deferred };
            f(&mut ctx, event.dt);
        }
    });
}

pub(crate) fn on_spawn_agent(
    event: On<SpawnAgent>,
    info: Res<MissionInfo>,
    mut roster: ResMut<AgentRoster>,
    mut listeners: ResMut<MissionListeners>,
    mut deferred: ResMut<Deferred>,
    mut commands: Commands,
) {
    let hero = event.0.hero;
    let agent = roster.insert(event.0.clone());
    dispatch(&mut listeners, |_, bundle| {
        if let Some(f) = bundle.agent_built.as_mut() {
            let mut ctx =
                MissionCtx { info: &*info, roster: &mut *roster, deferred: &mut *deferred };
            f(&mut ctx, agent);
        }
    });
    commands.trigger(AgentBuilt { agent, hero });
}

pub(crate) fn on_remove_agent(
    event: On<RemoveAgent>,
    info: Res<MissionInfo>,
    mut roster: ResMut<AgentRoster>,
    mut listeners: ResMut<MissionListeners>,
    mut deferred: ResMut<Deferred>,
    mut commands: Commands,
) {
    let Some(record) = roster.get_mut(event.agent) else {
        warn!(agent = ?event.agent, "removal of unknown agent");
        return;
    };
    if record.state.is_some() {
        return;
    }
    record.state = Some(event.state);
    let victim_hero = record.hero;
    let killer_hero = event.killer.and_then(|k| roster.hero_of(k));

    dispatch(&mut listeners, |owner, bundle| {
        let mut ctx =
            MissionCtx { info: &*info, roster: &mut *roster, deferred: &mut *deferred };
        if let Some(f) = bundle.agent_removed.as_mut() {
            f(&mut ctx, (event.agent, event.killer, event.state));
        }
        if killer_hero == Some(owner)
            && let (Some(f), Some(killer)) = (bundle.got_kill.as_mut(), event.killer)
        {
            f(&mut ctx, (killer, event.agent, event.state));
        }
        if victim_hero == Some(owner)
            && let Some(f) = bundle.got_killed.as_mut()
        {
            f(&mut ctx, (event.agent, event.killer, event.state));
        }
    });

    commands.trigger(AgentSlain {
        victim: event.agent,
        victim_hero,
        killer: event.killer,
        killer_hero,
        state: event.state,
    });
}

pub(crate) fn drain_deferred(
    mut deferred: ResMut<Deferred>,
    mut roster: ResMut<AgentRoster>,
    mut queue: ResMut<BlowQueue>,
    mut listeners: ResMut<MissionListeners>,
    mut heroes: Query<(
        Option<&mut HeroGold>,
        Option<&mut SkillSet>,
        Option<&mut HeroStats>,
    )>,
    mut commands: Commands,
) {
    if deferred.is_empty() {
        return;
    }
    for action in deferred.drain() {
        match action {
            Action::Reply { hero, message } => {
                commands.trigger(ChatReply { hero, message });
            }
            Action::GiveGold { hero, amount } => {
                if let Ok((Some(mut gold), _, _)) = heroes.get_mut(hero) {
                    gold.0 += amount;
                }
            }
            Action::GiveXp { hero, amount } => {
                if let Ok((_, Some(mut skills), _)) = heroes.get_mut(hero) {
                    skills.improve(amount, None);
                }
            }
            Action::BumpStat { hero, key, amount } => {
                if let Ok((_, _, Some(mut stats))) = heroes.get_mut(hero) {
                    stats.bump(&key, amount);
                }
            }
            Action::HealAgent { agent, amount } => {
                if let Some(record) = roster.get_mut(agent) {
                    record.heal(amount);
                }
            }
            Action::Blow(params) => queue.blows.push(params),
            Action::RemoveListeners(owner) => listeners.remove(owner),
        }
    }
}
