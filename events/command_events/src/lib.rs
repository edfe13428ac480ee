//! One-shot commands posted into the core by the streaming-service layer
//! (chat commands, channel point redemptions). The core reacts via
//! observers and answers with `ChatReply`.

use bevy::prelude::*;

/// A viewer asks to claim a hero.
#[derive(Event, Debug, Clone)]
pub struct AdoptHero {
    pub viewer: String,
    pub subscriber: bool,
}

/// A viewer triggers their hero's class ability (the active power group).
#[derive(Event, Debug, Clone)]
pub struct UseClassPower {
    pub hero: Entity,
}

/// A redemption asks for a generated item reward for a hero.
#[derive(Event, Debug, Clone)]
pub struct RewardRequest {
    pub hero: Entity,
}
