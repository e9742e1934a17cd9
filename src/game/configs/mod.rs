pub mod assets;

use bevy::prelude::*;

use crate::asset_tracking::LoadResource;

pub use assets::{GrappleAssets, GrappleConfig, GrappleConfigLoader};

pub(super) fn plugin(app: &mut App) {
    // Register the asset loader for RON config files
    app.init_asset::<GrappleConfig>();
    app.init_asset_loader::<GrappleConfigLoader>();

    // Defaults until the RON file is in
    app.init_resource::<GrappleConfig>();
    app.load_resource::<GrappleAssets>();

    app.add_systems(
        Update,
        (
            assets::extract_grapple_config.run_if(resource_added::<GrappleAssets>),
            assets::reload_grapple_config,
        ),
    );
}
