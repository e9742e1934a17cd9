//! Gameplay: the test level, the player and the grappling hook.

mod animations;
mod camera_controller;
pub mod configs;
pub mod grapple;
mod player;
mod scene;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        configs::plugin,
        grapple::plugin,
        scene::plugin,
        player::plugin,
        camera_controller::plugin,
        animations::plugin,
    ));
}
