//! Item reward generation: weighted tier and kind selection, duplicate
//! avoidance against the hero's loadout, and crafted custom items with
//! registered modifiers.

use bevy::prelude::*;

mod generate;
mod modifier;
mod systems;
mod weighted;

pub use {generate::*, modifier::*, systems::*, weighted::*};


pub struct RewardsPlugin;

impl Plugin for RewardsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RewardConfig>()
            .init_resource::<CustomItemRegistry>()
            .add_observer(on_reward_request);
    }
}
