use {
    super::*,
    bevy::state::app::StatesPlugin,
    command_events::AdoptHero,
    hero_components::{
        Adopted, Hero, HeroGold, HeroName, HeroStats, Level, SkillSet, stat_keys,
    },
    mission::{AgentRecord, AgentRoster, MissionPlugin, MissionRunStateChanged, RemoveAgent},
    mission_events::*,
    states::GameState,
};

#[derive(Resource, Default)]
struct Replies(Vec<String>);

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .init_state::<GameState>()
        .add_plugins((MissionEventsPlugin, MissionPlugin, AdoptionPlugin))
        .init_resource::<Replies>()
        .add_observer(|reply: On<ChatReply>, mut replies: ResMut<Replies>| {
            replies.0.push(reply.message.clone());
        });
    app.insert_state(GameState::Mission);
    app
}

fn spawn_free_hero(app: &mut App, name: &str) -> Entity {
    app.world_mut()
        .spawn((Hero, HeroName(name.to_string()), Level(10)))
        .id()
}

fn start_mission(app: &mut App) {
    app.world_mut().trigger(MissionStarted {
        mode: MissionMode::Battle,
        is_tournament: false,
    });
    app.world_mut()
        .trigger(MissionRunStateChanged(MissionRunState::Continuing));
}

fn embody(app: &mut App, hero: Option<Entity>, name: &str, level: i32) -> AgentId {
    let record = AgentRecord {
        name: name.to_string(),
        level,
        hero,
        team: None,
        is_player: false,
        health: 100.0,
        health_limit: 100.0,
        armor: 0.0,
        state: None,
    };
    app.world_mut().resource_mut::<AgentRoster>().insert(record)
}

#[test]
fn adoption_claims_a_free_hero_and_tags_the_name() {
    let mut app = test_app();
    let hero = spawn_free_hero(&mut app, "Aldric");

    app.world_mut().trigger(AdoptHero {
        viewer: "viewer_one".to_string(),
        subscriber: false,
    });
    app.update();

    let entity = app.world().entity(hero);
    let adopted = entity.get::<Adopted>().unwrap();
    assert_eq!(adopted.viewer, "viewer_one");
    assert_eq!(entity.get::<HeroName>().unwrap().0, format!("viewer_one {ADOPT_TAG}"));
    assert!(entity.get::<HeroGold>().is_some());
    assert!(entity.get::<SkillSet>().is_some());
    assert_eq!(
        app.world().resource::<Replies>().0,
        vec![format!("You are now viewer_one {ADOPT_TAG}!")]
    );
}

#[test]
fn one_hero_per_viewer_and_one_viewer_per_hero() {
    let mut app = test_app();
    spawn_free_hero(&mut app, "Aldric");

    app.world_mut().trigger(AdoptHero {
        viewer: "viewer_one".to_string(),
        subscriber: false,
    });
    app.update();
    app.world_mut().trigger(AdoptHero {
        viewer: "viewer_one".to_string(),
        subscriber: false,
    });
    app.update();
    app.world_mut().trigger(AdoptHero {
        viewer: "viewer_two".to_string(),
        subscriber: false,
    });
    app.update();

    let replies = &app.world().resource::<Replies>().0;
    assert_eq!(replies[1], "You have already adopted a hero!");
    assert_eq!(replies[2], "No hero is available for adoption!");
}

#[test]
fn subscriber_gate_honors_config() {
    let mut app = test_app();
    app.world_mut().resource_mut::<AdoptionConfig>().subscriber_only = true;
    spawn_free_hero(&mut app, "Aldric");

    app.world_mut().trigger(AdoptHero {
        viewer: "viewer_one".to_string(),
        subscriber: false,
    });
    assert_eq!(
        app.world().resource::<Replies>().0,
        vec!["Adoption is for subscribers only!"]
    );
}

#[test]
fn kills_bump_the_hub_counters() {
    let mut app = test_app();
    let hero = spawn_free_hero(&mut app, "Aldric");
    app.world_mut().trigger(AdoptHero {
        viewer: "viewer_one".to_string(),
        subscriber: false,
    });
    app.update();
    start_mission(&mut app);

    app.world_mut().trigger(mission::SpawnAgent(AgentRecord {
        name: "Champion".to_string(),
        level: 10,
        hero: Some(hero),
        team: None,
        is_player: false,
        health: 100.0,
        health_limit: 100.0,
        armor: 0.0,
        state: None,
    }));
    let champion = AgentId(0);
    let raider = embody(&mut app, None, "Sea Raider", 8);

    app.world_mut().trigger(RemoveAgent {
        agent: raider,
        killer: Some(champion),
        state: AgentState::Killed,
    });
    app.update();

    let stats = app.world().entity(hero).get::<HeroStats>().unwrap();
    assert_eq!(stats.get(stat_keys::KILLS), 1);
    assert_eq!(stats.get(stat_keys::SUMMONS), 1);
}

#[test]
fn every_spawn_counts_as_a_summon() {
    let mut app = test_app();
    let hero = spawn_free_hero(&mut app, "Aldric");
    app.world_mut().trigger(AdoptHero {
        viewer: "viewer_one".to_string(),
        subscriber: false,
    });
    app.update();
    start_mission(&mut app);

    let record = AgentRecord {
        name: "Champion".to_string(),
        level: 10,
        hero: Some(hero),
        team: None,
        is_player: false,
        health: 100.0,
        health_limit: 100.0,
        armor: 0.0,
        state: None,
    };
    // Killed and respawned within the same mission.
    app.world_mut().trigger(mission::SpawnAgent(record.clone()));
    app.world_mut().trigger(RemoveAgent {
        agent: AgentId(0),
        killer: None,
        state: AgentState::Killed,
    });
    app.world_mut().trigger(mission::SpawnAgent(record));

    let stats = app.world().entity(hero).get::<HeroStats>().unwrap();
    assert_eq!(stats.get(stat_keys::SUMMONS), 2);
}

#[test]
fn freshly_adopted_heroes_earn_kill_xp() {
    let mut app = test_app();
    {
        let mut config = app.world_mut().resource_mut::<AdoptionConfig>();
        config.kill_rewards = mission::KillRewardConfig {
            xp_per_kill: 50.0,
            ..Default::default()
        };
    }
    let hero = spawn_free_hero(&mut app, "Aldric");
    app.world_mut().trigger(AdoptHero {
        viewer: "viewer_one".to_string(),
        subscriber: false,
    });
    app.update();
    start_mission(&mut app);

    let champion = embody(&mut app, Some(hero), "Champion", 10);
    let raider = embody(&mut app, None, "Sea Raider", 8);
    app.world_mut().trigger(RemoveAgent {
        agent: raider,
        killer: Some(champion),
        state: AgentState::Killed,
    });

    // The seeded skill receives the XP even though the hero never
    // trained anything before adoption.
    let skills = app.world().entity(hero).get::<SkillSet>().unwrap();
    assert_eq!(skills.xp.get("Athletics"), Some(&50.0));
    let replies = &app.world().resource::<Replies>().0;
    assert!(
        replies.iter().any(|r| r == "killed Sea Raider, +50xp Athletics"),
        "got {replies:?}"
    );
}

#[test]
fn kill_rewards_are_paid_and_described() {
    let mut app = test_app();
    {
        let mut config = app.world_mut().resource_mut::<AdoptionConfig>();
        config.kill_rewards = mission::KillRewardConfig {
            gold_per_kill: 100,
            xp_per_kill: 50.0,
            ..Default::default()
        };
    }
    let hero = spawn_free_hero(&mut app, "Aldric");
    app.world_mut().trigger(AdoptHero {
        viewer: "viewer_one".to_string(),
        subscriber: false,
    });
    app.update();
    app.world_mut()
        .entity_mut(hero)
        .insert(SkillSet::with(&[("One Handed", 10.0)]));
    start_mission(&mut app);

    let champion = embody(&mut app, Some(hero), "Champion", 10);
    let raider = embody(&mut app, None, "Sea Raider", 8);
    app.world_mut().trigger(RemoveAgent {
        agent: raider,
        killer: Some(champion),
        state: AgentState::Killed,
    });

    assert_eq!(app.world().entity(hero).get::<HeroGold>().unwrap().0, 100);
    let replies = &app.world().resource::<Replies>().0;
    assert!(
        replies
            .iter()
            .any(|r| r == "killed Sea Raider, +100 gold, +50xp One Handed"),
        "got {replies:?}"
    );
}

#[test]
fn death_releases_the_hero_when_configured() {
    let mut app = test_app();
    app.world_mut().resource_mut::<AdoptionConfig>().death_releases = true;
    let hero = spawn_free_hero(&mut app, "Aldric");
    app.world_mut().trigger(AdoptHero {
        viewer: "viewer_one".to_string(),
        subscriber: false,
    });
    app.update();
    start_mission(&mut app);

    let champion = embody(&mut app, Some(hero), "Champion", 10);
    app.world_mut().trigger(RemoveAgent {
        agent: champion,
        killer: None,
        state: AgentState::Killed,
    });

    assert!(app.world().entity(hero).get::<Adopted>().is_none());
}
