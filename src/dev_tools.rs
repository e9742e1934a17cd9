//! Development tools for the game. This plugin is only enabled in dev builds.

use avian3d::prelude::{PhysicsDebugPlugin, PhysicsGizmos};
use bevy::{
    dev_tools::states::log_transitions, input::common_conditions::input_just_pressed,
    prelude::*,
};

use crate::{game::configs::GrappleConfig, screens::Screen};

const TOGGLE_KEY: KeyCode = KeyCode::Backquote;

pub(super) fn plugin(app: &mut App) {
    // Log `Screen` state transitions.
    app.add_systems(Update, log_transitions::<Screen>);
    app.add_plugins(PhysicsDebugPlugin::default());
    app.add_systems(Startup, hide_physics_debug);

    // Toggle the debug overlay for UI.
    app.add_systems(
        Update,
        (
            toggle_debug_ui.run_if(input_just_pressed(TOGGLE_KEY)),
            toggle_physics_debug.run_if(input_just_pressed(KeyCode::F3)),
            toggle_grapple_debug.run_if(input_just_pressed(KeyCode::F4)),
        ),
    );
}

fn toggle_debug_ui(mut options: ResMut<UiDebugOptions>) {
    options.toggle();
}

fn hide_physics_debug(mut store: ResMut<GizmoConfigStore>) {
    let (config, _) = store.config_mut::<PhysicsGizmos>();
    config.enabled = false;
}

fn toggle_physics_debug(mut store: ResMut<GizmoConfigStore>) {
    let (config, _) = store.config_mut::<PhysicsGizmos>();
    config.enabled = !config.enabled;
    info!("Physics debug rendering: {}", if config.enabled { "ON" } else { "OFF" });
}

/// Obstacle probes and grapple point markers
fn toggle_grapple_debug(mut config: ResMut<GrappleConfig>) {
    config.debug_draw = !config.debug_draw;
    info!("Grapple debug drawing: {}", if config.debug_draw { "ON" } else { "OFF" });
}
