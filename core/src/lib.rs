use {
    adoption::AdoptionPlugin,
    bevy::prelude::*,
    class_assets::ClassAssetsPlugin,
    hero_components::HeroComponentsPlugin,
    item_assets::ItemAssetsPlugin,
    mission::MissionPlugin,
    mission_events::MissionEventsPlugin,
    power_assets::PowerAssetsPlugin,
    powers::PowersPlugin,
    rewards::RewardsPlugin,
    states::GameState,
};

mod loading;

pub use loading::*;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_plugins((
                HeroComponentsPlugin,
                MissionEventsPlugin,
                ClassAssetsPlugin,
                ItemAssetsPlugin,
                PowerAssetsPlugin,
                MissionPlugin,
                PowersPlugin,
                RewardsPlugin,
                AdoptionPlugin,
            ))
            .add_systems(Startup, loading::start_loading)
            .add_systems(
                Update,
                loading::check_assets_loaded.run_if(in_state(GameState::Loading)),
            );
    }
}
