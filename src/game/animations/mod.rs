mod animation_assets;
mod animation_controller;
pub mod models;

use bevy::prelude::*;

use crate::{game::configs::GrappleConfig, screens::Screen};

use self::{
    animation_assets::{PlayerAnimations, sync_throw_cue},
    animation_controller::{
        attach_animation_controller, play_requested_montages, return_to_idle,
        setup_animation_graph,
    },
};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PlayerAnimations>();
    app.add_systems(Startup, setup_animation_graph);

    app.add_systems(
        Update,
        (
            sync_throw_cue.run_if(resource_changed::<GrappleConfig>),
            (
                attach_animation_controller,
                play_requested_montages,
                return_to_idle,
            )
                .chain()
                .run_if(in_state(Screen::Gameplay)),
        ),
    );
}
