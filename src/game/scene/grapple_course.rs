use avian3d::prelude::*;
use bevy::prelude::*;

use crate::{
    game::grapple::{AnchorHook, AnchorPoint, GameLayer},
    screens::Screen,
};

const ANCHOR_HOOK_RADIUS: f32 = 0.35;

/// Shared handles for the level pieces
struct CourseMaterials {
    floor: Handle<StandardMaterial>,
    wall: Handle<StandardMaterial>,
    platform: Handle<StandardMaterial>,
    anchor: Handle<StandardMaterial>,
}

/// Spawn the grapple test course: open ground, a wall to grapple over, raised
/// platforms with grapple points and one grapple point hidden behind a wall.
pub fn spawn_grapple_course(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("Spawning grapple course...");

    let course = CourseMaterials {
        floor: materials.add(StandardMaterial {
            base_color: Color::srgb(0.3, 0.5, 0.3),
            perceptual_roughness: 0.9,
            ..default()
        }),
        wall: materials.add(StandardMaterial {
            base_color: Color::srgb(0.7, 0.3, 0.3),
            ..default()
        }),
        platform: materials.add(StandardMaterial {
            base_color: Color::srgb(0.3, 0.3, 0.7),
            ..default()
        }),
        anchor: materials.add(StandardMaterial {
            base_color: Color::srgb(0.95, 0.75, 0.1),
            emissive: LinearRgba::rgb(0.6, 0.4, 0.0),
            ..default()
        }),
    };

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        DespawnOnExit(Screen::Gameplay),
    ));

    // Ground floor - 80m x 80m
    spawn_block(
        &mut commands,
        &mut meshes,
        course.floor.clone(),
        Vec3::new(0.0, -0.25, 0.0),
        Vec3::new(80.0, 0.5, 80.0),
        "Ground Floor",
    );

    // Low wall right in front of the spawn; the leap arc clears it
    spawn_block(
        &mut commands,
        &mut meshes,
        course.wall.clone(),
        Vec3::new(0.0, 1.0, -8.0),
        Vec3::new(6.0, 2.0, 0.5),
        "Low Wall (2m)",
    );

    // Tower platforms, each topped by a grapple point
    let towers = [
        (Vec3::new(0.0, 3.0, -18.0), 6.0),
        (Vec3::new(12.0, 5.0, -24.0), 10.0),
        (Vec3::new(-14.0, 2.0, -12.0), 4.0),
    ];
    for (index, (base, height)) in towers.into_iter().enumerate() {
        spawn_block(
            &mut commands,
            &mut meshes,
            course.platform.clone(),
            Vec3::new(base.x, height / 2.0, base.z),
            Vec3::new(3.0, height, 3.0),
            &format!("Tower {index} ({height}m)"),
        );
        spawn_anchor(
            &mut commands,
            &mut meshes,
            course.anchor.clone(),
            Vec3::new(base.x, height + 1.5, base.z),
            &format!("Grapple Point {index}"),
        );
    }

    // Grapple point behind a tall wall: visible over the top, but the leap is blocked
    spawn_block(
        &mut commands,
        &mut meshes,
        course.wall.clone(),
        Vec3::new(16.0, 4.0, -6.0),
        Vec3::new(0.5, 8.0, 8.0),
        "Tall Wall (8m)",
    );
    spawn_anchor(
        &mut commands,
        &mut meshes,
        course.anchor.clone(),
        Vec3::new(22.0, 9.0, -6.0),
        "Blocked Grapple Point",
    );
}

/// Static box. Avian's `Collider::cuboid` takes full lengths.
fn spawn_block(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    material: Handle<StandardMaterial>,
    position: Vec3,
    size: Vec3,
    label: &str,
) {
    commands.spawn((
        Name::new(label.to_string()),
        DespawnOnExit(Screen::Gameplay),
        Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
        MeshMaterial3d(material),
        Transform::from_translation(position),
        RigidBody::Static,
        Collider::cuboid(size.x, size.y, size.z),
    ));
    debug!("Spawned block: {} at {}", label, position);
}

/// Grapple point with its hook collider as a child. The hook sits on the
/// anchor layer and collides with nothing.
fn spawn_anchor(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    material: Handle<StandardMaterial>,
    position: Vec3,
    label: &str,
) {
    commands.spawn((
        Name::new(label.to_string()),
        AnchorPoint::default(),
        DespawnOnExit(Screen::Gameplay),
        Transform::from_translation(position),
        Visibility::default(),
        RigidBody::Static,
        children![(
            Name::new("Hook"),
            AnchorHook,
            Mesh3d(meshes.add(Sphere::new(ANCHOR_HOOK_RADIUS))),
            MeshMaterial3d(material),
            Transform::default(),
            Collider::sphere(ANCHOR_HOOK_RADIUS),
            CollisionLayers::new(GameLayer::Anchor, LayerMask::NONE),
        )],
    ));
    debug!("Spawned grapple point: {} at {}", label, position);
}
