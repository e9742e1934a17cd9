//! Grapple targeting and flight state machine.
//!
//! [`GrappleController`] is engine-agnostic: every tick the Bevy systems in
//! [`super::systems`] hand it the ports it needs and apply whatever it returns.

use bevy::prelude::*;

use crate::game::configs::GrappleConfig;

use super::{
    error::GrappleRejection,
    ports::{
        AnimationPort, CapsuleShape, CharacterBody, CollisionChannel, CollisionQueryPort,
        Interactable, LineHit, Montage, PropRegistry, WorldQueryPort,
    },
    state::{GrappleEvent, GrapplePhase},
};

/// Montage section the throw animation starts from.
pub const THROW_SECTION: &str = "Default";

/// Per-character grapple state.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct GrappleController {
    phase: GrapplePhase,
    target_focused: bool,
    attach_point: Option<AttachPoint>,
    flight: FlightPlan,
    rope: Option<Entity>,
}

/// Where the rope end is thrown to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachPoint {
    pub entity: Entity,
    pub position: Vec3,
}

/// Straight-line leap from `start` to `end`, timed by distance over speed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlightPlan {
    pub start: Vec3,
    pub end: Vec3,
    pub total_distance: f32,
    pub total_duration: f32,
    pub elapsed: f32,
}

impl FlightPlan {
    /// A non-positive speed or a zero distance gives a zero duration, which
    /// completes on the first flight tick.
    pub fn new(start: Vec3, end: Vec3, speed: f32) -> Self {
        let total_distance = start.distance(end);
        let total_duration = if speed > 0.0 && total_distance > 0.0 {
            total_distance / speed
        } else {
            0.0
        };

        Self {
            start,
            end,
            total_distance,
            total_duration,
            elapsed: 0.0,
        }
    }

    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.total_duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.total_duration).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.total_duration
    }

    /// Position on the leap arc at normalized time `t`.
    pub fn arc_position(&self, t: f32, up: Vec3, config: &GrappleConfig) -> Vec3 {
        self.start.lerp(self.end, t) + up * config.vertical_arc.sample(t) * config.arc_multiplier
    }
}

/// Outcome of one acquisition pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Acquisition {
    /// The crosshair rests on this grapple point, hitting it at `point`.
    Focused { anchor: Entity, point: Vec3 },
    /// Nothing grappleable under the crosshair.
    Lost,
    /// Acquisition is off while aligning or flying.
    Suspended,
}

/// One capsule probe along a prospective leap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleProbe {
    pub position: Vec3,
    pub blocked: bool,
}

/// Capsule probes taken along a prospective leap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathSweep {
    pub capsule: Option<CapsuleShape>,
    pub probes: Vec<ObstacleProbe>,
}

impl PathSweep {
    pub fn blocked_count(&self) -> usize {
        self.probes.iter().filter(|probe| probe.blocked).count()
    }

    pub fn is_clear(&self) -> bool {
        self.blocked_count() == 0
    }
}

/// What a successful start gate committed to.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightLaunch {
    pub plan: FlightPlan,
    pub rope: Entity,
    pub rope_guide: Entity,
    pub sweep: PathSweep,
}

/// Result of one flight tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightStep {
    pub position: Vec3,
    pub progress: f32,
    pub completed: bool,
}

/// Samples `obstacle_samples + 1` evenly spaced points on the leap arc and
/// probes each with the character capsule.
pub fn sweep_flight_path(
    plan: &FlightPlan,
    up: Vec3,
    capsule: CapsuleShape,
    collision: &impl CollisionQueryPort,
    config: &GrappleConfig,
) -> PathSweep {
    let samples = config.obstacle_samples.max(1);
    let direction = plan.direction();
    let spacing = plan.total_distance / samples as f32;

    let probes = (0..=samples)
        .map(|i| {
            let curve_value = config.vertical_arc.sample(i as f32 / samples as f32);
            let position = plan.start
                + direction * (i as f32 * spacing)
                + up * curve_value * config.arc_multiplier;
            ObstacleProbe {
                position,
                blocked: collision.sweep_capsule(position, capsule, CollisionChannel::Obstacle),
            }
        })
        .collect();

    PathSweep {
        capsule: Some(capsule),
        probes,
    }
}

impl GrappleController {
    pub fn phase(&self) -> GrapplePhase {
        self.phase
    }

    pub fn is_aligning(&self) -> bool {
        self.phase == GrapplePhase::Aligning
    }

    pub fn is_flying(&self) -> bool {
        self.phase == GrapplePhase::Flying
    }

    pub fn target_focused(&self) -> bool {
        self.target_focused
    }

    pub fn attach_point(&self) -> Option<AttachPoint> {
        self.attach_point
    }

    pub fn flight(&self) -> &FlightPlan {
        &self.flight
    }

    pub fn rope(&self) -> Option<Entity> {
        self.rope
    }

    /// Sweeps a near-zero box from the crosshair along the interactable
    /// channel and records the grapple point it lands on.
    ///
    /// The previously focused grapple point is not unfocused here.
    pub fn acquire_target(
        &mut self,
        view: &impl WorldQueryPort,
        collision: &impl CollisionQueryPort,
        config: &GrappleConfig,
    ) -> Acquisition {
        if self.phase != GrapplePhase::Idle {
            return Acquisition::Suspended;
        }

        let hit = view.deproject_screen_center().and_then(|ray| {
            collision.sweep_line(
                ray.origin,
                ray.direction,
                config.acquisition_range,
                CollisionChannel::Interactable,
            )
        });

        match hit {
            Some(LineHit {
                entity,
                component,
                component_position,
                point,
                interactable: Some(Interactable::Anchor { position }),
            }) => {
                self.target_focused = true;
                self.flight.end = position + Vec3::Y * config.end_vertical_offset;
                self.attach_point = Some(AttachPoint {
                    entity: component,
                    position: component_position,
                });
                Acquisition::Focused {
                    anchor: entity,
                    point,
                }
            }
            _ => {
                self.target_focused = false;
                Acquisition::Lost
            }
        }
    }

    /// Start gate. Checks the path for obstacles and, if clear, throws the rope
    /// and starts aligning. Nothing is touched unless the whole launch succeeds.
    pub fn start_grappling(
        &mut self,
        body: &impl CharacterBody,
        collision: &impl CollisionQueryPort,
        props: &mut impl PropRegistry,
        animation: &mut impl AnimationPort,
        config: &GrappleConfig,
    ) -> Result<FlightLaunch, GrappleRejection> {
        if !self.target_focused {
            return Err(GrappleRejection::NotFocused);
        }
        if self.phase != GrapplePhase::Idle {
            return Err(GrappleRejection::Busy(self.phase));
        }

        let start = body.position();
        let plan = FlightPlan::new(start, self.flight.end, config.flight_speed);

        let sweep = sweep_flight_path(&plan, body.up(), body.capsule(), collision, config);
        if !sweep.is_clear() {
            return Err(GrappleRejection::PathBlocked(sweep));
        }

        let guide_end = self
            .attach_point
            .map_or(plan.end, |attach_point| attach_point.position);
        let rope_guide = props.spawn_rope_guide(start, guide_end);
        let rope = props.spawn_rope(rope_guide, plan.total_distance / 2.0);

        self.flight = plan;
        self.rope = Some(rope);
        self.phase = self.phase.transition(GrappleEvent::GateCleared);
        animation.play_montage(Montage::GrappleThrow, THROW_SECTION);

        Ok(FlightLaunch {
            plan,
            rope,
            rope_guide,
            sweep,
        })
    }

    /// Turns the character towards the grapple point, yaw only.
    pub fn rotate_towards_grapple_point(
        &self,
        body: &mut impl CharacterBody,
        delta_secs: f32,
        config: &GrappleConfig,
    ) {
        if !self.is_aligning() {
            return;
        }

        let direction = self.flight.direction();
        let flat = Vec3::new(direction.x, 0.0, direction.z);
        // Straight up or down: no heading to face.
        if flat.length_squared() <= f32::EPSILON {
            return;
        }

        let target = Transform::IDENTITY.looking_to(flat, Vec3::Y).rotation;
        let alpha = (delta_secs * config.rotation_rate).clamp(0.0, 1.0);
        let interpolated = body.rotation().slerp(target, alpha);
        let (yaw, _, _) = interpolated.to_euler(EulerRot::YXZ);
        body.set_rotation(Quat::from_rotation_y(yaw));
    }

    /// Leap start, fired by the throw animation cue. The leap starts from
    /// where the character is now, not from where the gate ran.
    pub fn begin_leap(&mut self, current_position: Vec3) -> bool {
        if self.phase != GrapplePhase::Aligning {
            return false;
        }

        self.flight.start = current_position;
        self.flight.elapsed = 0.0;
        self.target_focused = false;
        self.phase = self.phase.transition(GrappleEvent::LeapCue);
        true
    }

    /// Advances the leap by `delta_secs` and moves the character along the arc.
    pub fn grapple(
        &mut self,
        body: &mut impl CharacterBody,
        props: &mut impl PropRegistry,
        delta_secs: f32,
        config: &GrappleConfig,
    ) -> Option<FlightStep> {
        if !self.is_flying() {
            return None;
        }

        self.flight.elapsed += delta_secs.max(0.0);
        let progress = self.flight.progress();
        let position = self.flight.arc_position(progress, body.up(), config);
        let rotation = body.rotation();
        body.move_collision_volume_to(position, rotation);

        let completed = self.flight.is_complete();
        if completed {
            self.phase = self.phase.transition(GrappleEvent::FlightCompleted);
            if let Some(rope) = self.rope.take() {
                props.release_rope(rope);
            }
        }

        Some(FlightStep {
            position,
            progress,
            completed,
        })
    }
}

#[cfg(test)]
impl GrappleController {
    /// Controller already committed to `flight`, for driving the ECS systems directly.
    pub(crate) fn committed(phase: GrapplePhase, flight: FlightPlan, rope: Option<Entity>) -> Self {
        Self {
            phase,
            flight,
            rope,
            ..default()
        }
    }
}
