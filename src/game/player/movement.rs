use bevy::prelude::*;
use bevy_tnua::prelude::*;

use crate::game::grapple::{GrappleController, GrapplePhase};

use super::{MovementController, Player};

/// Camera-relative WASD input fed to the Tnua walk basis. While a grapple is
/// in progress the basis still runs, with zero velocity.
pub fn apply_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut player_query: Query<
        (&mut TnuaController, &MovementController, &GrappleController),
        With<Player>,
    >,
    camera_query: Query<&Transform, (With<Camera3d>, Without<Player>)>,
) {
    let Ok((mut controller, movement, grapple)) = player_query.single_mut() else {
        return;
    };

    let (cam_forward, cam_right) = if let Ok(camera_transform) = camera_query.single() {
        let forward = camera_transform.forward();
        let right = camera_transform.right();
        // Flatten to horizontal plane (ignore Y)
        (
            Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero(),
            Vec3::new(right.x, 0.0, right.z).normalize_or_zero(),
        )
    } else {
        (Vec3::NEG_Z, Vec3::X)
    };

    let mut direction = Vec3::ZERO;
    if grapple.phase() == GrapplePhase::Idle {
        if keyboard.pressed(KeyCode::ArrowUp) || keyboard.pressed(KeyCode::KeyW) {
            direction += cam_forward;
        }
        if keyboard.pressed(KeyCode::ArrowDown) || keyboard.pressed(KeyCode::KeyS) {
            direction -= cam_forward;
        }
        if keyboard.pressed(KeyCode::ArrowLeft) || keyboard.pressed(KeyCode::KeyA) {
            direction -= cam_right;
        }
        if keyboard.pressed(KeyCode::ArrowRight) || keyboard.pressed(KeyCode::KeyD) {
            direction += cam_right;
        }
    }
    let direction = direction.normalize_or_zero();

    let speed = if keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight) {
        movement.run_speed
    } else {
        movement.walk_speed
    };

    // Feed the basis every frame, even when standing still. Without a basis the
    // character collider just falls.
    controller.basis(TnuaBuiltinWalk {
        desired_velocity: direction * speed,
        // Must be a little more than the distance from the character's centre
        // to the bottom of its collider.
        float_height: movement.float_height,
        turning_angvel: 12.0,
        desired_forward: Dir3::new(direction).ok(),
        ..Default::default()
    });
}
