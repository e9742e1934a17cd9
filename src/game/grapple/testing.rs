//! Headless physics world shared by the grapple ECS tests.

use std::time::Duration;

use avian3d::prelude::*;
use bevy::{mesh::MeshPlugin, prelude::*, scene::ScenePlugin, time::TimeUpdateStrategy};

use crate::game::configs::GrappleConfig;

use super::{
    anchor::{AnchorHook, AnchorPoint},
    bindings::{GameLayer, GrappleRig},
    controller::GrappleController,
    ports::CapsuleShape,
};

pub const HOOK_RADIUS: f32 = 0.3;

pub fn capsule() -> CapsuleShape {
    CapsuleShape {
        radius: 0.4,
        half_height: 0.9,
    }
}

/// Grapple tuning in metres.
pub fn metre_config() -> GrappleConfig {
    GrappleConfig {
        flight_speed: 15.0,
        end_vertical_offset: 1.0,
        arc_multiplier: 3.0,
        ..default()
    }
}

/// Physics runs in `PostUpdate` with a fixed 1/60s frame.
pub fn physics_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        TransformPlugin,
        AssetPlugin::default(),
        MeshPlugin,
        ScenePlugin,
        PhysicsPlugins::new(PostUpdate),
    ))
    .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
        1.0 / 60.0,
    )))
    .insert_resource(metre_config());
    app.finish();
    app
}

/// 40m square floor with its top at y = 0.
pub fn spawn_floor(world: &mut World) -> Entity {
    world
        .spawn((
            RigidBody::Static,
            Collider::cuboid(40.0, 0.2, 40.0),
            Transform::from_xyz(0.0, -0.1, 0.0),
        ))
        .id()
}

pub fn spawn_block(world: &mut World, center: Vec3, size: Vec3) -> Entity {
    world
        .spawn((
            RigidBody::Static,
            Collider::cuboid(size.x, size.y, size.z),
            Transform::from_translation(center),
        ))
        .id()
}

/// Grapple point and its hook collider.
pub fn spawn_anchor(world: &mut World, position: Vec3) -> (Entity, Entity) {
    let anchor = world
        .spawn((
            AnchorPoint::default(),
            RigidBody::Static,
            Transform::from_translation(position),
        ))
        .id();
    let hook = world
        .spawn((
            AnchorHook,
            Collider::sphere(HOOK_RADIUS),
            CollisionLayers::new(GameLayer::Anchor, LayerMask::NONE),
            Transform::default(),
            ChildOf(anchor),
        ))
        .id();
    (anchor, hook)
}

/// Kinematic grappler standing on the floor at `position`.
pub fn spawn_grappler(world: &mut World, position: Vec3) -> Entity {
    let capsule = capsule();
    let hand_socket = world.spawn(Transform::default()).id();
    world
        .spawn((
            GrappleController::default(),
            GrappleRig {
                hand_socket,
                capsule,
            },
            RigidBody::Kinematic,
            Collider::capsule(capsule.radius, capsule.segment_length()),
            CollisionLayers::new(GameLayer::Player, [GameLayer::Default]),
            LinearVelocity::ZERO,
            Transform::from_translation(position),
        ))
        .id()
}
