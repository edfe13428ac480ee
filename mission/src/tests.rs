use {
    super::*,
    bevy::state::app::StatesPlugin,
    hero_components::SkillSet,
    mission_events::*,
    states::GameState,
    std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

#[derive(Resource, Default)]
struct Replies(Vec<String>);

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .init_state::<GameState>()
        .add_plugins((MissionEventsPlugin, MissionPlugin))
        .init_resource::<Replies>()
        .add_observer(|reply: On<ChatReply>, mut replies: ResMut<Replies>| {
            replies.0.push(reply.message.clone());
        });
    app.insert_state(GameState::Mission);
    app.world_mut().trigger(MissionStarted {
        mode: MissionMode::Battle,
        is_tournament: false,
    });
    app.world_mut()
        .trigger(MissionRunStateChanged(MissionRunState::Continuing));
    app
}

fn troop(name: &str, level: i32, hero: Option<Entity>) -> AgentRecord {
    AgentRecord {
        name: name.to_string(),
        level,
        hero,
        team: None,
        is_player: false,
        health: 100.0,
        health_limit: 100.0,
        armor: 10.0,
        state: None,
    }
}

#[test]
fn accumulator_emits_every_covered_tick() {
    let mut clock = MissionClock::default();
    assert_eq!(advance_clock(&mut clock, 1.5), 0);
    assert_eq!(advance_clock(&mut clock, 1.0), 1);
    assert!((clock.slow_tick_accum - 0.5).abs() < 1e-6);

    // A long hitch still yields every tick it spans.
    assert_eq!(advance_clock(&mut clock, 5.0), 2);
    assert!((clock.slow_tick_accum - 1.5).abs() < 1e-6);
}

#[test]
fn listener_add_replaces_previous() {
    let mut app = test_app();
    let owner = app.world_mut().spawn_empty().id();

    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    for counter in [&first, &second] {
        let counter = Arc::clone(counter);
        let mut bundle = ListenerBundle::default();
        bundle.agent_built = Some(Box::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        app.world_mut()
            .resource_mut::<MissionListeners>()
            .add(owner, bundle);
    }

    app.world_mut().trigger(SpawnAgent(troop("Recruit", 3, None)));
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn tick_fires_every_frame_and_reset_fans_out() {
    let mut app = test_app();
    let owner = app.world_mut().spawn_empty().id();

    let ticks = Arc::new(AtomicUsize::new(0));
    let resets = Arc::new(AtomicUsize::new(0));
    let mut bundle = ListenerBundle::default();
    let counter = Arc::clone(&ticks);
    bundle.tick = Some(Box::new(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    let counter = Arc::clone(&resets);
    bundle.mission_reset = Some(Box::new(move |_, ()| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    app.world_mut()
        .resource_mut::<MissionListeners>()
        .add(owner, bundle);

    app.update();
    app.update();
    assert_eq!(ticks.load(Ordering::SeqCst), 2);

    app.world_mut().trigger(MissionReset);
    assert_eq!(resets.load(Ordering::SeqCst), 1);
}

#[test]
fn agent_built_listener_reply_is_deferred() {
    let mut app = test_app();
    let owner = app.world_mut().spawn_empty().id();

    let mut bundle = ListenerBundle::default();
    bundle.agent_built = Some(Box::new(|ctx, agent| {
        let name = ctx.roster.get(agent).map(|r| r.name.clone()).unwrap_or_default();
        ctx.deferred.reply(None, format!("{name} joined"));
    }));
    app.world_mut()
        .resource_mut::<MissionListeners>()
        .add(owner, bundle);

    app.world_mut().trigger(SpawnAgent(troop("Looter", 4, None)));
    assert!(app.world().resource::<Replies>().0.is_empty());

    app.update();
    assert_eq!(app.world().resource::<Replies>().0, vec!["Looter joined"]);
}

#[test]
fn lethal_blow_routes_got_kill_to_owning_hero() {
    let mut app = test_app();
    let hero = app.world_mut().spawn_empty().id();

    let (killer, victim) = {
        let mut roster = app.world_mut().resource_mut::<AgentRoster>();
        let killer = roster.insert(troop("Champion", 10, Some(hero)));
        let victim = roster.insert(troop("Sea Raider", 8, None));
        (killer, victim)
    };

    let kills = Arc::new(AtomicUsize::new(0));
    let mut bundle = ListenerBundle::default();
    let counter = Arc::clone(&kills);
    bundle.got_kill = Some(Box::new(move |ctx, (_, victim, state)| {
        counter.fetch_add(1, Ordering::SeqCst);
        let name = ctx.roster.get(victim).map(|r| r.name.clone()).unwrap_or_default();
        ctx.deferred.reply(None, format!("{} {name}", state.verb()));
    }));
    app.world_mut()
        .resource_mut::<MissionListeners>()
        .add(hero, bundle);

    app.world_mut()
        .write_message(RegisterBlow(BlowParams::new(Some(killer), victim, 200)));
    app.update();

    let roster = app.world().resource::<AgentRoster>();
    assert_eq!(roster.get(victim).unwrap().state, Some(AgentState::Killed));
    assert_eq!(kills.load(Ordering::SeqCst), 1);
    assert_eq!(
        app.world().resource::<Replies>().0,
        vec!["killed Sea Raider"]
    );
}

#[test]
fn armor_reduces_damage_unless_ignored() {
    let mut app = test_app();
    let victim = app
        .world_mut()
        .resource_mut::<AgentRoster>()
        .insert(troop("Footman", 5, None));

    app.world_mut()
        .write_message(RegisterBlow(BlowParams::new(None, victim, 30)));
    app.update();
    let health = app
        .world()
        .resource::<AgentRoster>()
        .get(victim)
        .unwrap()
        .health;
    assert!((health - 80.0).abs() < 1e-3);

    let mut pierce = BlowParams::new(None, victim, 30);
    pierce.armor_ignore_fraction = 1.0;
    app.world_mut().write_message(RegisterBlow(pierce));
    app.update();
    let health = app
        .world()
        .resource::<AgentRoster>()
        .get(victim)
        .unwrap()
        .health;
    assert!((health - 50.0).abs() < 1e-3);
}

#[test]
fn mission_end_clears_hub_and_roster() {
    let mut app = test_app();
    let owner = app.world_mut().spawn_empty().id();
    app.world_mut()
        .resource_mut::<AgentRoster>()
        .insert(troop("Guard", 6, None));

    let mut bundle = ListenerBundle::default();
    bundle.mission_over = Some(Box::new(|ctx, ()| {
        ctx.deferred.reply(None, "mission over");
    }));
    app.world_mut()
        .resource_mut::<MissionListeners>()
        .add(owner, bundle);

    app.world_mut().trigger(MissionEnded);
    app.update();

    assert!(!app.world().resource::<MissionListeners>().has(owner));
    assert_eq!(app.world().resource::<AgentRoster>().iter().count(), 0);
    assert!(!app.world().resource::<MissionInfo>().active);
    assert_eq!(app.world().resource::<Replies>().0, vec!["mission over"]);
}

#[test]
fn level_scaling_rewards_punching_up() {
    // No gap, or fighting down, never scales.
    assert_eq!(relative_level_scaling(10, 10, 1.0, 5.0), 1.0);
    assert_eq!(relative_level_scaling(20, 10, 1.0, 5.0), 1.0);
    // Zero strength disables scaling entirely.
    assert_eq!(relative_level_scaling(10, 40, 0.0, 5.0), 1.0);
    // A big gap at full strength hits the cap.
    assert_eq!(relative_level_scaling(10, 20, 1.0, 5.0), 5.0);
    // A small gap scales but stays under the cap.
    let s = relative_level_scaling(10, 12, 1.0, 5.0);
    assert!(s > 1.0 && s < 5.0, "got {s}");
}

#[test]
fn kill_effect_lines_are_ordered() {
    let cfg = KillRewardConfig {
        gold_per_kill: 100,
        heal_per_kill: 10.0,
        xp_per_kill: 50.0,
        sub_boost: 2.0,
        ..Default::default()
    };
    let mut gold = 0;
    let mut skills = SkillSet::with(&[("One Handed", 30.0)]);
    let mut agent = troop("Champion", 10, None);
    agent.health = 50.0;
    let victim = troop("Sea Raider", 8, None);

    let lines = apply_kill_effects(
        10,
        &mut gold,
        &mut skills,
        Some(&mut agent),
        Some(&victim),
        AgentState::Killed,
        &cfg,
        true,
    );

    assert_eq!(
        lines,
        vec![
            "killed Sea Raider",
            "+200 gold",
            "+20hp",
            "+100xp One Handed",
            "x2.0 (sub)",
        ]
    );
    assert_eq!(gold, 200);
    assert!((agent.health - 70.0).abs() < 1e-3);
}

#[test]
fn multipliers_are_silent_when_nothing_was_gained() {
    let cfg = KillRewardConfig { sub_boost: 1.5, ..Default::default() };
    let mut gold = 0;
    let mut skills = SkillSet::default();

    let lines = apply_kill_effects(
        10,
        &mut gold,
        &mut skills,
        None,
        None,
        AgentState::Killed,
        &cfg,
        true,
    );
    assert_eq!(lines, vec!["killed"]);
}

#[test]
fn punching_up_as_a_subscriber_orders_every_annotation() {
    let cfg = KillRewardConfig {
        gold_per_kill: 100,
        xp_per_kill: 50.0,
        sub_boost: 2.0,
        relative_level_scaling: 0.5,
        ..Default::default()
    };
    let mut gold = 0;
    let mut skills = SkillSet::with(&[("One Handed", 30.0)]);
    let victim = troop("Veteran", 20, None);

    // diff 10 at half strength overshoots the default cap of 5.
    let lines = apply_kill_effects(
        10,
        &mut gold,
        &mut skills,
        None,
        Some(&victim),
        AgentState::Killed,
        &cfg,
        true,
    );
    assert_eq!(
        lines,
        vec![
            "killed Veteran",
            "+1000 gold",
            "+500xp One Handed",
            "x2.0 (sub)",
            "x5.0 (lvl diff 10)",
        ]
    );
    assert_eq!(gold, 1000);
}

#[test]
fn heal_is_clamped_to_health_limit() {
    let cfg = KillRewardConfig { heal_per_kill: 50.0, ..Default::default() };
    let mut gold = 0;
    let mut skills = SkillSet::default();
    let mut agent = troop("Champion", 10, None);
    agent.health = 90.0;

    let lines = apply_kill_effects(
        10,
        &mut gold,
        &mut skills,
        Some(&mut agent),
        None,
        AgentState::Unconscious,
        &cfg,
        false,
    );

    assert_eq!(lines, vec!["knocked out", "+10hp"]);
    assert!((agent.health - 100.0).abs() < 1e-3);
}

#[test]
fn killed_consolation_skips_level_scaling() {
    let cfg = KillRewardConfig {
        xp_per_killed: 25.0,
        relative_level_scaling: 1.0,
        ..Default::default()
    };
    let mut skills = SkillSet::with(&[("Athletics", 5.0)]);
    let lines = apply_killed_effects(&mut skills, &cfg, false);
    assert_eq!(lines, vec!["+25xp Athletics"]);
}
