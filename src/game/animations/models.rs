use bevy::prelude::*;

/// Links a character to the entity playing its animations
#[derive(Component, Debug, Clone)]
pub struct CharacterAnimationController {
    pub animation_player: Entity,
}
