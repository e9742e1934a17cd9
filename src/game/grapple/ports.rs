//! Interfaces the grapple controller uses to reach the world around it.
//!
//! The controller only talks to physics, the camera, animation, the character
//! body and the prop spawner through these traits. The Bevy/Avian bindings live
//! in [`super::bindings`]; tests drive the controller with in-memory fakes.

use bevy::prelude::*;

/// Named collision category a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionChannel {
    /// Grapple point hit volumes.
    Interactable,
    /// Level geometry that can block a leap.
    Obstacle,
}

/// Capsule sized like the character's collision volume.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CapsuleShape {
    pub radius: f32,
    /// Half of the total height, hemispheres included.
    pub half_height: f32,
}

impl CapsuleShape {
    /// Length of the straight segment between the two hemispheres.
    pub fn segment_length(&self) -> f32 {
        2.0 * (self.half_height - self.radius).max(0.0)
    }
}

/// What kind of interactable a hit entity is, resolved by the collision layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interactable {
    Anchor { position: Vec3 },
}

/// Blocking hit from a line sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHit {
    /// The entity owning the hit collider.
    pub entity: Entity,
    /// The collider entity itself (the rope's attach point).
    pub component: Entity,
    pub component_position: Vec3,
    pub point: Vec3,
    pub interactable: Option<Interactable>,
}

pub trait CollisionQueryPort {
    /// True when a capsule placed at `position` overlaps anything on `channel`.
    fn sweep_capsule(
        &self,
        position: Vec3,
        capsule: CapsuleShape,
        channel: CollisionChannel,
    ) -> bool;

    fn sweep_line(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        channel: CollisionChannel,
    ) -> Option<LineHit>;
}

pub trait WorldQueryPort {
    /// Ray through the centre of the viewport, `None` if it cannot be built.
    fn deproject_screen_center(&self) -> Option<Ray3d>;
}

/// Animation montages the grapple asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Montage {
    GrappleThrow,
}

pub trait AnimationPort {
    fn play_montage(&mut self, montage: Montage, section: &str);
}

/// Pose source and movement sink for the grappling character.
pub trait CharacterBody {
    fn position(&self) -> Vec3;

    fn rotation(&self) -> Quat;

    fn up(&self) -> Vec3 {
        self.rotation() * Vec3::Y
    }

    fn capsule(&self) -> CapsuleShape;

    /// Fire-and-forget move of the collision volume.
    fn move_collision_volume_to(&mut self, position: Vec3, rotation: Quat);

    fn set_rotation(&mut self, rotation: Quat);
}

/// Creates and releases the cosmetic rope entities the controller owns.
pub trait PropRegistry {
    /// Spawns the travelling rope end. It despawns itself once it arrives.
    fn spawn_rope_guide(&mut self, start: Vec3, end: Vec3) -> Entity;

    /// Spawns the rope from the character's hand to `guide`.
    fn spawn_rope(&mut self, guide: Entity, length: f32) -> Entity;

    fn release_rope(&mut self, rope: Entity);
}
