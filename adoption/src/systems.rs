use {
    crate::{ADOPT_TAG, AdoptionConfig},
    bevy::prelude::*,
    command_events::AdoptHero,
    hero_components::{
        Adopted, BattleEquipment, CustomItems, Hero, HeroGold, HeroName, HeroStats,
        Level, SkillSet, stat_keys,
    },
    mission::{
        AgentRoster, ListenerBundle, MissionListeners, apply_kill_effects,
        apply_killed_effects,
    },
    mission_events::{AgentBuilt, AgentSlain, AgentState, ChatReply},
};

fn reply(commands: &mut Commands, hero: Option<Entity>, message: impl Into<String>) {
    commands.trigger(ChatReply { hero, message: message.into() });
}

pub(crate) fn on_adopt_hero(
    event: On<AdoptHero>,
    config: Res<AdoptionConfig>,
    taken: Query<&Adopted>,
    mut free: Query<(Entity, &mut HeroName), (With<Hero>, Without<Adopted>)>,
    mut commands: Commands,
) {
    if config.subscriber_only && !event.subscriber {
        reply(&mut commands, None, "Adoption is for subscribers only!");
        return;
    }
    if taken.iter().any(|a| a.viewer == event.viewer) {
        reply(&mut commands, None, "You have already adopted a hero!");
        return;
    }
    let Some((hero, mut name)) = free.iter_mut().next() else {
        reply(&mut commands, None, "No hero is available for adoption!");
        return;
    };

    name.0 = format!("{} {ADOPT_TAG}", event.viewer);
    commands.entity(hero).insert(Adopted {
        viewer: event.viewer.clone(),
        subscriber: event.subscriber,
    });
    // Progression components the reward flows rely on; heroes imported
    // from the campaign may not carry them yet. Kill XP lands on the
    // best existing skill, so a fresh hero needs at least one.
    commands.entity(hero).insert_if_new((
        HeroGold::default(),
        HeroStats::default(),
        SkillSet::with(&[("Athletics", 0.0)]),
        BattleEquipment::default(),
        CustomItems::default(),
    ));
    info!(viewer = %event.viewer, hero = ?hero, "hero adopted");
    reply(&mut commands, Some(hero), format!("You are now {}!", name.0));
}

/// Count the summon and register the adopted hero's achievement
/// counters with the mission hub when their agent enters the fight.
pub(crate) fn on_agent_built(
    event: On<AgentBuilt>,
    mut adopted: Query<&mut HeroStats, With<Adopted>>,
    mut listeners: ResMut<MissionListeners>,
) {
    let Some(hero) = event.hero else {
        return;
    };
    let Ok(mut stats) = adopted.get_mut(hero) else {
        return;
    };
    stats.bump(stat_keys::SUMMONS, 1);
    if listeners.has(hero) {
        return;
    }
    let mut bundle = ListenerBundle::default();
    bundle.got_kill = Some(Box::new(move |ctx, _| {
        ctx.deferred.bump_stat(hero, stat_keys::KILLS, 1);
    }));
    bundle.got_killed = Some(Box::new(move |ctx, _| {
        ctx.deferred.bump_stat(hero, stat_keys::DEATHS, 1);
    }));
    listeners.add(hero, bundle);
}

/// Pay out kill rewards to adopted killers and consolation to adopted
/// victims; optionally release a killed hero back to the pool.
pub(crate) fn on_agent_slain(
    event: On<AgentSlain>,
    config: Res<AdoptionConfig>,
    mut roster: ResMut<AgentRoster>,
    mut heroes: Query<
        (&Level, &mut HeroGold, &mut SkillSet, &Adopted, &HeroName),
        With<Adopted>,
    >,
    mut commands: Commands,
) {
    if let Some(killer_hero) = event.killer_hero
        && let Ok((level, mut gold, mut skills, adopted, _)) = heroes.get_mut(killer_hero)
    {
        let subscriber = adopted.subscriber;
        let victim = roster.get(event.victim).cloned();
        let agent = event.killer.and_then(|k| roster.get_mut(k));
        let lines = apply_kill_effects(
            level.0,
            &mut gold.0,
            &mut skills,
            agent,
            victim.as_ref(),
            event.state,
            &config.kill_rewards,
            subscriber,
        );
        reply(&mut commands, Some(killer_hero), lines.join(", "));
    }

    if let Some(victim_hero) = event.victim_hero
        && let Ok((_, _, mut skills, adopted, name)) = heroes.get_mut(victim_hero)
    {
        let lines =
            apply_killed_effects(&mut skills, &config.kill_rewards, adopted.subscriber);
        if !lines.is_empty() {
            reply(&mut commands, Some(victim_hero), lines.join(", "));
        }
        if config.death_releases && event.state == AgentState::Killed {
            let farewell = format!("{} has fallen and is up for adoption again", name.0);
            commands.entity(victim_hero).remove::<Adopted>();
            reply(&mut commands, Some(victim_hero), farewell);
        }
    }
}
