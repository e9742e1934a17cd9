use bevy::prelude::*;

/// Travelling end of the thrown rope.
///
/// Moves in a straight line from `start` to `end` over a fixed duration and
/// despawns itself on arrival. Nothing else ever despawns it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct RopeGuide {
    start: Vec3,
    end: Vec3,
    duration: f32,
    elapsed: f32,
    flying: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RopeGuideStep {
    pub position: Vec3,
    pub arrived: bool,
}

impl RopeGuide {
    pub fn new(start: Vec3, duration: f32) -> Self {
        Self {
            start,
            end: start,
            duration,
            elapsed: 0.0,
            flying: false,
        }
    }

    /// Sends the guide towards `end`, restarting its clock.
    pub fn set_target(&mut self, end: Vec3) {
        self.end = end;
        self.elapsed = 0.0;
        self.flying = true;
    }

    /// Launched guide heading for `end`.
    pub fn launched(start: Vec3, end: Vec3, duration: f32) -> Self {
        let mut guide = Self::new(start, duration);
        guide.set_target(end);
        guide
    }

    pub fn is_flying(&self) -> bool {
        self.flying
    }

    pub fn position(&self) -> Vec3 {
        let t = if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.start.lerp(self.end, t)
    }

    pub fn advance(&mut self, delta_secs: f32) -> RopeGuideStep {
        if self.flying {
            self.elapsed += delta_secs.max(0.0);
            if self.elapsed >= self.duration {
                self.flying = false;
            }
        }

        RopeGuideStep {
            position: self.position(),
            arrived: !self.flying,
        }
    }
}

/// Moves every launched guide and despawns the ones that arrived.
pub fn advance_rope_guides(
    mut commands: Commands,
    time: Res<Time>,
    mut guides: Query<(Entity, &mut RopeGuide, &mut Transform)>,
) {
    for (entity, mut guide, mut transform) in guides.iter_mut() {
        if !guide.is_flying() {
            continue;
        }

        let step = guide.advance(time.delta_secs());
        transform.translation = step.position;
        if step.arrived {
            commands.entity(entity).despawn();
        }
    }
}
