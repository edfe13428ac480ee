use {
    crate::{
        ActiveGroupActivations, GlobalPowerConfig, GroupActivation, PowerExpiry,
        PowerHandler, StatModifiers, activate, apply_spawn_health, attach_behavior,
        can_activate, expire, unlocked_members,
    },
    bevy::prelude::*,
    class_assets::{ClassMap, HeroClassDef},
    command_events::UseClassPower,
    hero_components::{Adopted, HeroClass, HeroGold, HeroSnapshot, HeroStats, Level},
    mission::{AgentRoster, BlowQueue, Deferred, MissionClock, MissionInfo},
    mission_events::*,
    power_assets::{
        ActiveGroupMap, ActivePowerGroupDef, PassiveGroupMap, PassivePowerGroupDef,
        PowerBehavior, PowerDefinition, PowerMap,
    },
};

fn snapshot_of(
    level: &Level,
    gold: &HeroGold,
    stats: Option<&HeroStats>,
) -> HeroSnapshot {
    HeroSnapshot {
        level: level.0,
        gold: gold.0,
        counters: stats.map(|s| s.counters.clone()).unwrap_or_default(),
    }
}

fn reply(commands: &mut Commands, hero: Entity, message: impl Into<String>) {
    commands.trigger(ChatReply { hero: Some(hero), message: message.into() });
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn on_use_class_power(
    event: On<UseClassPower>,
    config: Res<GlobalPowerConfig>,
    info: Res<MissionInfo>,
    clock: Res<MissionClock>,
    roster: Res<AgentRoster>,
    mut expiry: ResMut<PowerExpiry>,
    mut handler: ResMut<PowerHandler>,
    mut stats: ResMut<StatModifiers>,
    mut activations: ResMut<ActiveGroupActivations>,
    class_map: Res<ClassMap>,
    classes: Res<Assets<HeroClassDef>>,
    group_map: Res<ActiveGroupMap>,
    groups: Res<Assets<ActivePowerGroupDef>>,
    power_map: Res<PowerMap>,
    powers: Res<Assets<PowerDefinition>>,
    heroes: Query<(&HeroClass, &Level, &HeroGold, Option<&HeroStats>)>,
    mut commands: Commands,
) {
    let hero = event.hero;
    if config.disable_in_tournaments && info.is_tournament {
        reply(&mut commands, hero, "Powers are disabled in tournaments!");
        return;
    }
    let Ok((class, level, gold, hero_stats)) = heroes.get(hero) else {
        warn!(hero = ?hero, "class power used by unknown hero");
        return;
    };
    let Some(class_id) = class.0.as_deref() else {
        reply(&mut commands, hero, "You have no class!");
        return;
    };
    let Some(class_def) = class_map.resolve(&classes, class_id) else {
        warn!(class = %class_id, "hero references unknown class");
        return;
    };
    let Some(group_id) = class_def.active_power.as_deref() else {
        reply(&mut commands, hero, "Your class has no active power!");
        return;
    };
    let Some(group) = group_map.resolve(&groups, group_id) else {
        warn!(group = %group_id, "class references unknown power group");
        return;
    };

    let snapshot = snapshot_of(level, gold, hero_stats);
    let members = unlocked_members(&group.powers, &snapshot);
    if members.is_empty() {
        reply(
            &mut commands,
            hero,
            format!("You have not unlocked any powers in {}!", group.name),
        );
        return;
    }

    let mut defs = Vec::with_capacity(members.len());
    for member in members {
        let Some(def) = power_map.resolve(&powers, &member.power) else {
            warn!(power = %member.power, "power group references unknown power");
            return;
        };
        if !def.supports_active() {
            warn!(power = %def.id, "passive-only power in an active group, skipping");
            continue;
        }
        defs.push(def);
    }
    if defs.is_empty() {
        reply(&mut commands, hero, format!("{} has nothing to activate!", group.name));
        return;
    }

    // Either every member activates or none do.
    for def in &defs {
        if let Err(message) = can_activate(hero, def, &info, &roster, &expiry) {
            reply(&mut commands, hero, message);
            return;
        }
    }

    for &def in &defs {
        activate(hero, def, &clock, &mut expiry, &mut handler, &mut stats, &mut commands);
    }
    activations.members.insert(
        (hero, group.id.clone()),
        GroupActivation {
            group_name: group.name.clone(),
            deactivate_effect: group.deactivate_effect.clone(),
            powers: defs.iter().map(|d| d.id.clone()).collect(),
        },
    );
    if let Some(effect) = &group.activate_effect {
        commands.trigger(EffectCue {
            hero,
            effect: effect.clone(),
            phase: EffectPhase::Start,
        });
    }
    info!(hero = ?hero, group = %group.id, "class power activated");
    reply(&mut commands, hero, format!("{} activated!", group.name));
}

/// Expire every power whose deadline has passed. Runs on the slow tick
/// rather than every frame; a power can outlive its deadline by at most
/// one tick period.
pub(crate) fn on_slow_tick_expire(
    _: On<MissionSlowTick>,
    clock: Res<MissionClock>,
    mut expiry: ResMut<PowerExpiry>,
    mut handler: ResMut<PowerHandler>,
    mut stats: ResMut<StatModifiers>,
    power_map: Res<PowerMap>,
    powers: Res<Assets<PowerDefinition>>,
    mut commands: Commands,
) {
    let due: Vec<(Entity, String)> = expiry
        .deadlines
        .iter()
        .filter(|(_, deadline)| clock.elapsed >= **deadline)
        .map(|(key, _)| key.clone())
        .collect();
    for (hero, power_id) in due {
        match power_map.resolve(&powers, &power_id) {
            Some(def) => {
                expire(hero, def, &mut expiry, &mut handler, &mut stats, &mut commands);
            }
            None => {
                warn!(power = %power_id, "expiring power with no definition");
                expiry.deadlines.remove(&(hero, power_id.clone()));
                handler.clear(hero, &power_id);
                commands.trigger(PowerExpired { hero, power: power_id });
            }
        }
    }
}

/// A downed hero loses every running power immediately.
pub(crate) fn on_hero_down(
    event: On<AgentSlain>,
    mut expiry: ResMut<PowerExpiry>,
    mut handler: ResMut<PowerHandler>,
    mut stats: ResMut<StatModifiers>,
    power_map: Res<PowerMap>,
    powers: Res<Assets<PowerDefinition>>,
    mut commands: Commands,
) {
    let Some(hero) = event.victim_hero else {
        return;
    };
    let running: Vec<String> = expiry
        .deadlines
        .keys()
        .filter(|(owner, _)| *owner == hero)
        .map(|(_, power)| power.clone())
        .collect();
    for power_id in running {
        match power_map.resolve(&powers, &power_id) {
            Some(def) => {
                expire(hero, def, &mut expiry, &mut handler, &mut stats, &mut commands);
            }
            None => {
                expiry.deadlines.remove(&(hero, power_id.clone()));
                handler.clear(hero, &power_id);
                commands.trigger(PowerExpired { hero, power: power_id });
            }
        }
    }
}

/// Announce group expiry once the last member power of an activation
/// has lapsed.
pub(crate) fn on_power_expired(
    event: On<PowerExpired>,
    expiry: Res<PowerExpiry>,
    mut activations: ResMut<ActiveGroupActivations>,
    mut commands: Commands,
) {
    let hero = event.hero;
    let finished: Vec<String> = activations
        .members
        .iter()
        .filter(|((owner, _), activation)| {
            *owner == hero
                && activation.powers.contains(&event.power)
                && activation.powers.iter().all(|p| {
                    !expiry.deadlines.contains_key(&(hero, p.clone()))
                })
        })
        .map(|((_, group), _)| group.clone())
        .collect();
    for group in finished {
        if let Some(activation) = activations.members.remove(&(hero, group)) {
            if let Some(effect) = activation.deactivate_effect {
                commands.trigger(EffectCue {
                    hero,
                    effect,
                    phase: EffectPhase::Stop,
                });
            }
            reply(&mut commands, hero, format!("{} expired!", activation.group_name));
        }
    }
}

/// Attach a hero's passive power group when their agent spawns.
/// Tournaments with powers disabled skip the whole group, spawn
/// health scaling included.
pub(crate) fn on_agent_built_passives(
    event: On<AgentBuilt>,
    config: Res<GlobalPowerConfig>,
    info: Res<MissionInfo>,
    mut roster: ResMut<AgentRoster>,
    mut handler: ResMut<PowerHandler>,
    mut stats: ResMut<StatModifiers>,
    class_map: Res<ClassMap>,
    classes: Res<Assets<HeroClassDef>>,
    group_map: Res<PassiveGroupMap>,
    groups: Res<Assets<PassivePowerGroupDef>>,
    power_map: Res<PowerMap>,
    powers: Res<Assets<PowerDefinition>>,
    heroes: Query<(&HeroClass, &Level, &HeroGold, Option<&HeroStats>)>,
) {
    if config.disable_in_tournaments && info.is_tournament {
        return;
    }
    let Some(hero) = event.hero else {
        return;
    };
    let Ok((class, level, gold, hero_stats)) = heroes.get(hero) else {
        return;
    };
    let Some(class_id) = class.0.as_deref() else {
        return;
    };
    let Some(class_def) = class_map.resolve(&classes, class_id) else {
        warn!(class = %class_id, "hero references unknown class");
        return;
    };
    let Some(group_id) = class_def.passive_power.as_deref() else {
        return;
    };
    let Some(group) = group_map.resolve(&groups, group_id) else {
        warn!(group = %group_id, "class references unknown passive group");
        return;
    };

    let snapshot = snapshot_of(level, gold, hero_stats);
    for member in unlocked_members(&group.powers, &snapshot) {
        let Some(def) = power_map.resolve(&powers, &member.power) else {
            warn!(power = %member.power, "passive group references unknown power");
            continue;
        };
        attach_behavior(hero, def, &mut handler, &mut stats);
        if let Some(record) = roster.get_mut(event.agent) {
            apply_spawn_health(def, record);
        }
    }
}

pub(crate) fn on_mission_ended(
    _: On<MissionEnded>,
    mut expiry: ResMut<PowerExpiry>,
    mut handler: ResMut<PowerHandler>,
    mut stats: ResMut<StatModifiers>,
    mut activations: ResMut<ActiveGroupActivations>,
) {
    expiry.deadlines.clear();
    handler.clear_all();
    stats.by_hero.clear();
    activations.members.clear();
}

/// Run the attached damage hooks over this frame's queued blows.
/// Synthetic blows pass through untouched so reflected damage cannot
/// cascade.
pub(crate) fn modify_blows(
    mut queue: ResMut<BlowQueue>,
    roster: Res<AgentRoster>,
    handler: Res<PowerHandler>,
    config: Res<GlobalPowerConfig>,
    info: Res<MissionInfo>,
    mut deferred: ResMut<Deferred>,
    adopted: Query<(), With<Adopted>>,
) {
    if config.disable_in_tournaments && info.is_tournament {
        return;
    }
    for blow in queue.blows.iter_mut() {
        if blow.synthetic {
            continue;
        }
        let attacker_hero = blow.attacker.and_then(|a| roster.hero_of(a));
        let victim_hero = roster.hero_of(blow.victim);

        if let Some(attacker) = attacker_hero {
            for hook in handler.do_damage_hooks(attacker) {
                if let PowerBehavior::AddDamage { multiplier, add, filter } = hook
                    && filter_matches(filter, &roster, blow.victim, &adopted)
                {
                    blow.damage = (blow.damage as f32 * multiplier) as i32 + add;
                }
            }
        }

        if let Some(victim) = victim_hero {
            for hook in handler.take_damage_hooks(victim) {
                match hook {
                    PowerBehavior::TakeDamage {
                        modifier_percent,
                        add,
                        add_behavior,
                        remove_behavior,
                        armor_ignore_percent,
                    } => {
                        blow.damage =
                            (blow.damage as f32 * modifier_percent / 100.0) as i32 + add;
                        blow.behavior.add(*add_behavior);
                        blow.behavior.remove(*remove_behavior);
                        blow.armor_ignore_fraction = blow
                            .armor_ignore_fraction
                            .max(armor_ignore_percent / 100.0);
                    }
                    PowerBehavior::ReflectDamage { fraction, subtract_from_original } => {
                        let reflected = (blow.damage as f32 * fraction) as i32;
                        if reflected > 0
                            && let Some(attacker) = blow.attacker
                        {
                            deferred.blow(BlowParams::new(
                                Some(blow.victim),
                                attacker,
                                reflected,
                            ));
                            if *subtract_from_original {
                                blow.damage -= reflected;
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        // Absorb reads the damage the blow will actually carry.
        if let Some(attacker_agent) = blow.attacker
            && let Some(attacker) = attacker_hero
        {
            for hook in handler.do_damage_hooks(attacker) {
                if let PowerBehavior::AbsorbHealth { fraction } = hook {
                    let heal = blow.damage as f32 * fraction;
                    if heal > 0.0 {
                        deferred.heal_agent(attacker_agent, heal);
                    }
                }
            }
        }
    }
}

fn filter_matches(
    filter: &power_assets::TargetFilter,
    roster: &AgentRoster,
    victim: AgentId,
    adopted: &Query<(), With<Adopted>>,
) -> bool {
    let Some(record) = roster.get(victim) else {
        return false;
    };
    if record.is_player {
        return filter.vs_player;
    }
    match record.hero {
        Some(hero) if adopted.contains(hero) => filter.vs_adopted,
        Some(_) => filter.vs_heroes,
        None => filter.vs_troops,
    }
}
