//! Bevy and Avian implementations of the grapple ports.

use avian3d::prelude::*;
use bevy::{ecs::system::SystemParam, prelude::*};

use crate::{game::configs::GrappleConfig, screens::Screen};

use super::{
    anchor::AnchorPoint,
    ports::{
        AnimationPort, CapsuleShape, CharacterBody, CollisionChannel, CollisionQueryPort,
        Interactable, LineHit, Montage, PropRegistry, WorldQueryPort,
    },
    rope::Rope,
    rope_guide::RopeGuide,
};

#[derive(PhysicsLayer, Default, Clone, Copy, Debug)]
pub enum GameLayer {
    /// Level geometry
    #[default]
    Default,
    Player,
    /// Grapple point hooks. They collide with nothing and only show up in queries.
    Anchor,
}

impl GameLayer {
    /// Layers a query on `channel` can hit. Level geometry occludes grapple
    /// points for the crosshair sweep.
    pub fn query_mask(channel: CollisionChannel) -> LayerMask {
        match channel {
            CollisionChannel::Interactable => [GameLayer::Default, GameLayer::Anchor].into(),
            CollisionChannel::Obstacle => GameLayer::Default.into(),
        }
    }
}

/// Spatial queries plus what's needed to resolve a hit collider to the
/// grapple point owning it.
#[derive(SystemParam)]
pub struct GrappleCollision<'w, 's> {
    spatial: SpatialQuery<'w, 's>,
    colliders: Query<'w, 's, (&'static ColliderOf, &'static GlobalTransform)>,
    anchors: Query<'w, 's, &'static GlobalTransform, With<AnchorPoint>>,
}

impl<'w, 's> GrappleCollision<'w, 's> {
    /// Port view that never hits `character`.
    pub fn excluding(&self, character: Entity, config: &GrappleConfig) -> CharacterCollision<'_, 'w, 's> {
        CharacterCollision {
            collision: self,
            character,
            box_half_extent: config.acquisition_box_half_extent,
        }
    }

    fn resolve(&self, collider: Entity) -> (Entity, Vec3, Option<Interactable>) {
        let Ok((collider_of, transform)) = self.colliders.get(collider) else {
            return (collider, Vec3::ZERO, None);
        };

        let owner = collider_of.body;
        let interactable = self
            .anchors
            .get(owner)
            .ok()
            .map(|anchor| Interactable::Anchor {
                position: anchor.translation(),
            });
        (owner, transform.translation(), interactable)
    }
}

pub struct CharacterCollision<'a, 'w, 's> {
    collision: &'a GrappleCollision<'w, 's>,
    character: Entity,
    box_half_extent: f32,
}

impl CharacterCollision<'_, '_, '_> {
    fn filter(&self, channel: CollisionChannel) -> SpatialQueryFilter {
        SpatialQueryFilter::from_mask(GameLayer::query_mask(channel))
            .with_excluded_entities([self.character])
    }
}

impl CollisionQueryPort for CharacterCollision<'_, '_, '_> {
    fn sweep_capsule(
        &self,
        position: Vec3,
        capsule: CapsuleShape,
        channel: CollisionChannel,
    ) -> bool {
        let shape = Collider::capsule(capsule.radius, capsule.segment_length());
        !self
            .collision
            .spatial
            .shape_intersections(&shape, position, Quat::IDENTITY, &self.filter(channel))
            .is_empty()
    }

    fn sweep_line(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        channel: CollisionChannel,
    ) -> Option<LineHit> {
        let size = self.box_half_extent * 2.0;
        let hit = self.collision.spatial.cast_shape(
            &Collider::cuboid(size, size, size),
            origin,
            Quat::IDENTITY,
            direction,
            &ShapeCastConfig::from_max_distance(max_distance),
            &self.filter(channel),
        )?;

        let (entity, component_position, interactable) = self.collision.resolve(hit.entity);
        Some(LineHit {
            entity,
            component: hit.entity,
            component_position,
            point: hit.point1,
            interactable,
        })
    }
}

/// The gameplay camera.
pub struct CameraView<'a> {
    pub camera: &'a Camera,
    pub transform: &'a GlobalTransform,
}

impl WorldQueryPort for CameraView<'_> {
    fn deproject_screen_center(&self) -> Option<Ray3d> {
        let center = self.camera.logical_viewport_size()? / 2.0;
        self.camera.viewport_to_world(self.transform, center).ok()
    }
}

/// Collision capsule and hand socket of a grappling character.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct GrappleRig {
    pub hand_socket: Entity,
    pub capsule: CapsuleShape,
}

/// Character body backed by its `Transform`. Moves are teleports; physics
/// velocity is dropped so the solver doesn't carry the character off the arc.
pub struct PlayerBody<'a> {
    pub transform: Mut<'a, Transform>,
    pub velocity: Mut<'a, LinearVelocity>,
    pub capsule: CapsuleShape,
}

impl CharacterBody for PlayerBody<'_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    fn capsule(&self) -> CapsuleShape {
        self.capsule
    }

    fn move_collision_volume_to(&mut self, position: Vec3, rotation: Quat) {
        self.transform.translation = position;
        self.transform.rotation = rotation;
        self.velocity.0 = Vec3::ZERO;
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }
}

/// Request to play a montage on a character, handled by the animation plugin.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct PlayMontage {
    pub character: Entity,
    pub montage: Montage,
    pub section: String,
}

pub struct MontageWriter<'a, 'w> {
    pub character: Entity,
    pub writer: &'a mut MessageWriter<'w, PlayMontage>,
}

impl AnimationPort for MontageWriter<'_, '_> {
    fn play_montage(&mut self, montage: Montage, section: &str) {
        self.writer.write(PlayMontage {
            character: self.character,
            montage,
            section: section.to_string(),
        });
    }
}

/// Mesh and material of the rope guide.
#[derive(Resource, Clone)]
pub struct RopeGuideAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

impl FromWorld for RopeGuideAssets {
    fn from_world(world: &mut World) -> Self {
        let mesh = world
            .resource_mut::<Assets<Mesh>>()
            .add(Sphere::new(0.08).mesh().uv(12, 8));
        let material = world
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial {
                base_color: Color::srgb(0.3, 0.3, 0.32),
                metallic: 0.8,
                perceptual_roughness: 0.4,
                ..default()
            });
        Self { mesh, material }
    }
}

/// Spawns rope props into the gameplay screen.
pub struct CommandsPropRegistry<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
    pub assets: &'a RopeGuideAssets,
    pub hand_socket: Entity,
    pub guide_duration: f32,
}

impl PropRegistry for CommandsPropRegistry<'_, '_, '_> {
    fn spawn_rope_guide(&mut self, start: Vec3, end: Vec3) -> Entity {
        self.commands
            .spawn((
                Name::new("Rope Guide"),
                RopeGuide::launched(start, end, self.guide_duration),
                Mesh3d(self.assets.mesh.clone()),
                MeshMaterial3d(self.assets.material.clone()),
                Transform::from_translation(start),
                DespawnOnExit(Screen::Gameplay),
            ))
            .id()
    }

    fn spawn_rope(&mut self, guide: Entity, length: f32) -> Entity {
        self.commands
            .spawn((
                Name::new("Rope"),
                Rope::new(self.hand_socket, guide, length),
                DespawnOnExit(Screen::Gameplay),
            ))
            .id()
    }

    fn release_rope(&mut self, rope: Entity) {
        self.commands.entity(rope).despawn();
    }
}
