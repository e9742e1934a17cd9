use bevy::{
    input::mouse::AccumulatedMouseMotion,
    prelude::*,
    window::{CursorGrabMode, CursorOptions, PrimaryWindow},
};

use crate::{game::player::Player, screens::Screen};

const PITCH_LIMIT: f32 = 1.2;
const CROSSHAIR_SIZE: f32 = 6.0;

/// Over-the-shoulder orbit camera following the player.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ThirdPersonCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    /// Offset from the player origin the camera orbits around
    pub focus_offset: Vec3,
    /// Sideways shift so the crosshair isn't covered by the player
    pub shoulder_offset: f32,
    pub sensitivity: Vec2,
    pub cursor_lock_key: KeyCode,
    pub cursor_locked: bool,
}

impl Default for ThirdPersonCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: -0.25,
            distance: 5.0,
            focus_offset: Vec3::new(0.0, 1.2, 0.0),
            shoulder_offset: 0.6,
            sensitivity: Vec2::new(0.003, 0.0025),
            cursor_lock_key: KeyCode::KeyL,
            cursor_locked: true,
        }
    }
}

impl ThirdPersonCamera {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Camera transform for a player standing at `target`.
    pub fn transform_for(&self, target: Vec3) -> Transform {
        let rotation = self.rotation();
        let focus = target + self.focus_offset + rotation * Vec3::X * self.shoulder_offset;
        Transform::from_translation(focus + rotation * Vec3::Z * self.distance)
            .with_rotation(rotation)
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<ThirdPersonCamera>();
    app.add_systems(Startup, spawn_camera);

    app.add_systems(OnEnter(Screen::Gameplay), (enable_cursor_lock, spawn_crosshair));
    app.add_systems(OnExit(Screen::Gameplay), disable_cursor_lock);

    app.add_systems(
        Update,
        (toggle_cursor_lock, orbit_camera)
            .chain()
            .run_if(in_state(Screen::Gameplay)),
    );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: 60.0_f32.to_radians(),
            ..default()
        }),
        ThirdPersonCamera::default(),
    ));
}

fn orbit_camera(
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut camera_query: Query<(&mut ThirdPersonCamera, &mut Transform), Without<Player>>,
    player_query: Query<&Transform, With<Player>>,
) {
    let Ok((mut camera, mut transform)) = camera_query.single_mut() else {
        return;
    };
    let Ok(player_transform) = player_query.single() else {
        return;
    };

    if camera.cursor_locked {
        let delta = mouse_motion.delta * camera.sensitivity;
        camera.yaw -= delta.x;
        camera.pitch = (camera.pitch - delta.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    *transform = camera.transform_for(player_transform.translation);
}

fn set_cursor_lock(cursor: &mut CursorOptions, locked: bool) {
    if locked {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    } else {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    }
}

fn toggle_cursor_lock(
    keys: Res<ButtonInput<KeyCode>>,
    mut camera_query: Query<&mut ThirdPersonCamera>,
    mut cursor_options: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let Ok(mut camera) = camera_query.single_mut() else {
        return;
    };
    if !keys.just_pressed(camera.cursor_lock_key) {
        return;
    }

    camera.cursor_locked = !camera.cursor_locked;
    if let Ok(mut cursor) = cursor_options.single_mut() {
        set_cursor_lock(&mut cursor, camera.cursor_locked);
    }
}

/// Enable cursor lock when entering gameplay
fn enable_cursor_lock(
    mut camera_query: Query<&mut ThirdPersonCamera>,
    mut cursor_options: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    for mut camera in camera_query.iter_mut() {
        camera.cursor_locked = true;
    }
    if let Ok(mut cursor) = cursor_options.single_mut() {
        set_cursor_lock(&mut cursor, true);
        info!("Cursor lock enabled for gameplay");
    }
}

/// Disable cursor lock when exiting gameplay
fn disable_cursor_lock(
    mut camera_query: Query<&mut ThirdPersonCamera>,
    mut cursor_options: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    for mut camera in camera_query.iter_mut() {
        camera.cursor_locked = false;
    }
    if let Ok(mut cursor) = cursor_options.single_mut() {
        set_cursor_lock(&mut cursor, false);
        info!("Cursor lock disabled outside gameplay");
    }
}

/// Dot at the centre of the screen. Grapple targeting aims through it.
fn spawn_crosshair(mut commands: Commands) {
    commands.spawn((
        Name::new("Crosshair"),
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            ..default()
        },
        Pickable::IGNORE,
        DespawnOnExit(Screen::Gameplay),
        children![(
            Node {
                width: Val::Px(CROSSHAIR_SIZE),
                height: Val::Px(CROSSHAIR_SIZE),
                ..default()
            },
            BorderRadius::MAX,
            BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
        )],
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_sits_behind_player() {
        let camera = ThirdPersonCamera {
            pitch: 0.0,
            shoulder_offset: 0.0,
            ..default()
        };
        let transform = camera.transform_for(Vec3::ZERO);

        assert!((transform.translation - Vec3::new(0.0, 1.2, 5.0)).length() < 1e-5);
        assert!((transform.forward().as_vec3() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_camera_keeps_distance_to_focus() {
        let camera = ThirdPersonCamera {
            yaw: 1.1,
            pitch: -0.6,
            shoulder_offset: 0.0,
            ..default()
        };
        let target = Vec3::new(3.0, 0.0, -2.0);
        let transform = camera.transform_for(target);
        let focus = target + camera.focus_offset;

        assert!((transform.translation.distance(focus) - camera.distance).abs() < 1e-4);
    }
}
