//! Grappling hook traversal: crosshair targeting, the start gate, alignment,
//! the scripted leap and the cosmetic rope.

mod anchor;
mod arc;
mod bindings;
mod controller;
mod cue;
mod debug;
mod error;
mod ports;
mod rope;
mod rope_guide;
mod state;
mod systems;
#[cfg(test)]
mod testing;

use bevy::input::common_conditions::input_just_pressed;
use bevy::prelude::*;

use crate::screens::Screen;

pub use anchor::{AnchorHook, AnchorPoint};
pub use arc::VerticalArcCurve;
pub use bindings::{GameLayer, GrappleRig, PlayMontage};
pub use controller::GrappleController;
pub use cue::GrappleLeapStart;
pub use ports::{CapsuleShape, Montage};
pub use state::GrapplePhase;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<AnchorPoint>()
        .register_type::<AnchorHook>()
        .register_type::<GrappleRig>()
        .register_type::<rope::Rope>()
        .register_type::<rope_guide::RopeGuide>();

    app.add_message::<PlayMontage>();
    app.init_resource::<bindings::RopeGuideAssets>();
    app.init_resource::<debug::ObstacleProbeLog>();

    app.add_observer(cue::on_grapple_leap_start);

    app.add_systems(
        Update,
        (
            anchor::clear_anchor_focus,
            systems::acquire_grapple_target,
            systems::start_grappling.run_if(
                input_just_pressed(KeyCode::KeyE).or(input_just_pressed(MouseButton::Right)),
            ),
            systems::rotate_towards_grapple_point,
            systems::advance_grapple_flight,
            systems::suspend_locomotion_while_flying,
            rope_guide::advance_rope_guides,
            rope::track_rope_ends,
        )
            .chain()
            .run_if(in_state(Screen::Gameplay)),
    );

    app.add_systems(
        Update,
        (
            anchor::draw_anchor_markers,
            rope::draw_ropes,
            debug::draw_obstacle_probes,
        )
            .after(rope::track_rope_ends)
            .run_if(in_state(Screen::Gameplay)),
    );
}
