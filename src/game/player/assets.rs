use bevy::prelude::*;

use super::{HAND_RADIUS, PLAYER_HEIGHT, PLAYER_RADIUS};

/// Meshes and materials for the player stand-in model
#[derive(Resource, Clone)]
pub struct PlayerAssets {
    pub body: Handle<Mesh>,
    pub hand: Handle<Mesh>,
    pub body_material: Handle<StandardMaterial>,
    pub hand_material: Handle<StandardMaterial>,
}

impl FromWorld for PlayerAssets {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        let body = meshes.add(Capsule3d::new(
            PLAYER_RADIUS,
            PLAYER_HEIGHT - 2.0 * PLAYER_RADIUS,
        ));
        let hand = meshes.add(Sphere::new(HAND_RADIUS));

        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        let body_material = materials.add(Color::srgb(0.2, 0.45, 0.8));
        let hand_material = materials.add(Color::srgb(0.9, 0.75, 0.6));

        Self {
            body,
            hand,
            body_material,
            hand_material,
        }
    }
}
