use bevy::{animation::AnimationEvent, prelude::*};

use super::controller::GrappleController;

/// Keyframe in the throw clip where the character leaves the ground.
#[derive(AnimationEvent, Clone, Reflect)]
pub struct GrappleLeapStart;

/// Forwards the throw cue to whoever is waiting on it.
pub fn on_grapple_leap_start(
    _trigger: On<GrappleLeapStart>,
    mut grapplers: Query<(&mut GrappleController, &Transform)>,
) {
    for (mut controller, transform) in grapplers.iter_mut() {
        if !controller.is_aligning() {
            continue;
        }

        if controller.begin_leap(transform.translation) {
            info!(
                "Grapple leap started from {}, {:.2}s flight",
                transform.translation,
                controller.flight().total_duration
            );
        }
    }
}
