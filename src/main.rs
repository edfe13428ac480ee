use {
    bevy::{log::LogPlugin, prelude::*},
    core::CorePlugin,
};

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins.set(LogPlugin {
                filter: "error,\
                    adoption=debug,\
                    mission=debug,\
                    powers=debug,\
                    rewards=debug,\
                    power_assets=info,\
                    item_assets=info,\
                    class_assets=info"
                    .into(),
                level: bevy::log::Level::TRACE,
                ..Default::default()
            }),
        )
        .add_plugins(CorePlugin)
        .run();
}
