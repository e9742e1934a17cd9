mod grapple_course;

use bevy::prelude::*;

use crate::{
    game::{player::SpawnPlayer, scene::grapple_course::spawn_grapple_course},
    screens::Screen,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        OnEnter(Screen::Gameplay),
        (spawn_grapple_course, spawn_level).chain(),
    );
}

pub fn spawn_level(world: &mut World) {
    SpawnPlayer {
        position: Vec3::new(0.0, 1.5, 0.0),
    }
    .apply(world);
}
