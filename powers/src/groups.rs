use {
    crate::{PowerExpiry, duration_remaining},
    bevy::prelude::*,
    hero_components::HeroSnapshot,
    mission::MissionClock,
    power_assets::{PowerDefinition, PowerGroupItem},
};

/// Members of a group the hero currently qualifies for. Locked members
/// are skipped, not errors.
pub fn unlocked_members<'a>(
    members: &'a [PowerGroupItem],
    hero: &HeroSnapshot,
) -> Vec<&'a PowerGroupItem> {
    members.iter().filter(|m| m.unlocked_for(hero)).collect()
}

/// Duration and remaining time of a running group. The two maxima are
/// taken independently over the members, so the reported duration can
/// come from a different power than the reported remaining. Members
/// that are not running contribute `(0, 0)`; a group with no members
/// at all reads `(1, 0)` so progress displays show finished rather
/// than dividing by zero.
pub fn group_duration_remaining<'a>(
    hero: Entity,
    members: impl IntoIterator<Item = &'a PowerDefinition>,
    clock: &MissionClock,
    expiry: &PowerExpiry,
) -> (f32, f32) {
    let mut empty = true;
    let mut duration = 0.0f32;
    let mut remaining = 0.0f32;
    for def in members {
        empty = false;
        if let Some(r) = duration_remaining(hero, &def.id, clock, expiry) {
            duration = duration.max(def.duration_seconds);
            remaining = remaining.max(r);
        }
    }
    if empty { (1.0, 0.0) } else { (duration, remaining) }
}
