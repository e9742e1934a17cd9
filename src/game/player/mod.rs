mod assets;
mod movement;

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_tnua::{TnuaToggle, prelude::*};
use bevy_tnua_avian3d::*;

use crate::{
    game::grapple::{CapsuleShape, GameLayer, GrappleController, GrappleRig},
    screens::Screen,
};

pub use assets::PlayerAssets;

// Player marker component
#[derive(Component)]
pub struct Player;

/// Visual model of the player; the animation player lives here.
#[derive(Component)]
pub struct PlayerRig;

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct MovementController {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub float_height: f32,
}

impl Default for MovementController {
    fn default() -> Self {
        Self {
            walk_speed: 4.0,
            run_speed: 8.0,
            float_height: PLAYER_HEIGHT / 2.0 + 0.05,
        }
    }
}

// Constants
pub const PLAYER_HEIGHT: f32 = 1.8;
pub const PLAYER_RADIUS: f32 = 0.4;
pub const HAND_RADIUS: f32 = 0.08;
/// Right hand, relative to the player origin
const HAND_SOCKET_OFFSET: Vec3 = Vec3::new(0.45, 0.35, -0.15);

pub fn player_capsule() -> CapsuleShape {
    CapsuleShape {
        radius: PLAYER_RADIUS,
        half_height: PLAYER_HEIGHT / 2.0,
    }
}

// Player spawn command
pub struct SpawnPlayer {
    pub position: Vec3,
}

impl Command for SpawnPlayer {
    fn apply(self, world: &mut World) {
        let _ = world.run_system_cached_with(spawn_player, self);
    }
}

fn spawn_player(
    In(spawn_config): In<SpawnPlayer>,
    mut commands: Commands,
    player_assets: Res<PlayerAssets>,
) {
    let capsule = player_capsule();
    let player = commands
        .spawn((
            Name::new("Player"),
            Player,
            MovementController::default(),
            GrappleController::default(),
            DespawnOnExit(Screen::Gameplay), // Cleanup when leaving Gameplay screen
            Transform::from_translation(spawn_config.position),
            Visibility::Visible,
            // Avian3D physics components
            RigidBody::Dynamic,
            Collider::capsule(capsule.radius, capsule.segment_length()),
            CollisionLayers::new(GameLayer::Player, [GameLayer::Default]),
            GravityScale(1.0),
            LockedAxes::ROTATION_LOCKED.unlock_rotation_y(), // Prevent player from tipping over
        ))
        .insert((
            TnuaController::default(),
            TnuaToggle::Enabled,
            TnuaAvian3dSensorShape(Collider::cylinder(PLAYER_RADIUS - 0.01, 0.0)),
        ))
        .id();

    let hand_socket = commands
        .spawn((
            Name::new("Right Hand Socket"),
            Mesh3d(player_assets.hand.clone()),
            MeshMaterial3d(player_assets.hand_material.clone()),
            Transform::from_translation(HAND_SOCKET_OFFSET),
            ChildOf(player),
        ))
        .id();

    commands.spawn((
        Name::new("Player Rig"),
        PlayerRig,
        Mesh3d(player_assets.body.clone()),
        MeshMaterial3d(player_assets.body_material.clone()),
        Transform::default(),
        ChildOf(player),
    ));

    commands
        .entity(player)
        .insert(GrappleRig { hand_socket, capsule });
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<MovementController>();
    app.init_resource::<PlayerAssets>();

    // Tnua controller plugins
    app.add_plugins((
        TnuaControllerPlugin::new(FixedUpdate),
        TnuaAvian3dPlugin::new(FixedUpdate),
    ));

    app.add_systems(
        Update,
        movement::apply_controls.run_if(in_state(Screen::Gameplay)),
    );
}
