use {
    bevy::{asset::LoadedFolder, prelude::*},
    states::GameState,
};

#[derive(Resource)]
pub struct PowersFolderHandle(pub Handle<LoadedFolder>);

#[derive(Resource)]
pub struct ClassesFolderHandle(pub Handle<LoadedFolder>);

#[derive(Resource)]
pub struct ItemsFolderHandle(pub Handle<LoadedFolder>);

pub(crate) fn start_loading(mut cmd: Commands, asset_server: Res<AssetServer>) {
    info!("started loading assets");
    cmd.insert_resource(PowersFolderHandle(asset_server.load_folder("powers")));
    cmd.insert_resource(ClassesFolderHandle(asset_server.load_folder("classes")));
    cmd.insert_resource(ItemsFolderHandle(asset_server.load_folder("items")));
}

pub(crate) fn check_assets_loaded(
    mut next: ResMut<NextState<GameState>>,
    asset_server: Res<AssetServer>,
    powers: Res<PowersFolderHandle>,
    classes: Res<ClassesFolderHandle>,
    items: Res<ItemsFolderHandle>,
) {
    let loaded = [powers.0.id(), classes.0.id(), items.0.id()]
        .into_iter()
        .all(|id| asset_server.is_loaded_with_dependencies(id));
    if loaded {
        info!("asset folders loaded");
        next.set(GameState::Campaign);
    }
}
