use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_tnua::TnuaToggle;

use crate::game::configs::GrappleConfig;

use super::{
    anchor::{AnchorPoint, focus_anchor},
    bindings::{
        CameraView, CommandsPropRegistry, GrappleCollision, GrappleRig, MontageWriter,
        PlayMontage, PlayerBody, RopeGuideAssets,
    },
    controller::{Acquisition, GrappleController},
    debug::ObstacleProbeLog,
    error::GrappleRejection,
    state::GrapplePhase,
};

/// Crosshair acquisition for every idle grappler.
pub fn acquire_grapple_target(
    mut grapplers: Query<(Entity, &mut GrappleController)>,
    camera: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    collision: GrappleCollision,
    mut anchors: Query<&mut AnchorPoint>,
    config: Res<GrappleConfig>,
) {
    let Ok((camera, camera_transform)) = camera.single() else {
        return;
    };
    let view = CameraView {
        camera,
        transform: camera_transform,
    };

    for (entity, mut controller) in grapplers.iter_mut() {
        if controller.phase() != GrapplePhase::Idle {
            continue;
        }

        let was_focused = controller.target_focused();
        let port = collision.excluding(entity, &config);
        match controller.acquire_target(&view, &port, &config) {
            Acquisition::Focused { anchor, point } => {
                focus_anchor(&mut anchors, anchor);
                if !was_focused {
                    debug!("Grapple point {anchor} focused at {point}");
                }
            }
            Acquisition::Lost if was_focused => debug!("Grapple point lost"),
            Acquisition::Lost | Acquisition::Suspended => {}
        }
    }
}

/// Start gate, bound to the grapple input.
pub fn start_grappling(
    mut commands: Commands,
    mut grapplers: Query<(
        Entity,
        &mut GrappleController,
        &GrappleRig,
        &mut Transform,
        &mut LinearVelocity,
    )>,
    collision: GrappleCollision,
    mut montages: MessageWriter<PlayMontage>,
    guide_assets: Res<RopeGuideAssets>,
    mut probe_log: ResMut<ObstacleProbeLog>,
    time: Res<Time>,
    config: Res<GrappleConfig>,
) {
    for (entity, mut controller, rig, transform, velocity) in grapplers.iter_mut() {
        if !controller.target_focused() {
            continue;
        }

        let body = PlayerBody {
            transform,
            velocity,
            capsule: rig.capsule,
        };
        let mut props = CommandsPropRegistry {
            commands: &mut commands,
            assets: &guide_assets,
            hand_socket: rig.hand_socket,
            guide_duration: config.rope_guide_duration,
        };
        let mut animation = MontageWriter {
            character: entity,
            writer: &mut montages,
        };

        let result = controller.start_grappling(
            &body,
            &collision.excluding(entity, &config),
            &mut props,
            &mut animation,
            &config,
        );
        match result {
            Ok(launch) => {
                info!(
                    "Grapple launched: {:.1} units in {:.2}s",
                    launch.plan.total_distance, launch.plan.total_duration
                );
                if let Some(attach_point) = controller.attach_point() {
                    debug!("Rope thrown to {} at {}", attach_point.entity, attach_point.position);
                }
                probe_log.record(launch.sweep, time.elapsed_secs());
            }
            Err(rejection) => {
                debug!("Grapple rejected: {rejection}");
                if let GrappleRejection::PathBlocked(sweep) = rejection {
                    probe_log.record(sweep, time.elapsed_secs());
                }
            }
        }
    }
}

pub fn rotate_towards_grapple_point(
    mut grapplers: Query<(
        &GrappleController,
        &GrappleRig,
        &mut Transform,
        &mut LinearVelocity,
    )>,
    time: Res<Time>,
    config: Res<GrappleConfig>,
) {
    for (controller, rig, transform, velocity) in grapplers.iter_mut() {
        if !controller.is_aligning() {
            continue;
        }

        let mut body = PlayerBody {
            transform,
            velocity,
            capsule: rig.capsule,
        };
        controller.rotate_towards_grapple_point(&mut body, time.delta_secs(), &config);
    }
}

pub fn advance_grapple_flight(
    mut commands: Commands,
    mut grapplers: Query<(
        &mut GrappleController,
        &GrappleRig,
        &mut Transform,
        &mut LinearVelocity,
    )>,
    guide_assets: Res<RopeGuideAssets>,
    time: Res<Time>,
    config: Res<GrappleConfig>,
) {
    for (mut controller, rig, transform, velocity) in grapplers.iter_mut() {
        if !controller.is_flying() {
            continue;
        }

        let mut body = PlayerBody {
            transform,
            velocity,
            capsule: rig.capsule,
        };
        let mut props = CommandsPropRegistry {
            commands: &mut commands,
            assets: &guide_assets,
            hand_socket: rig.hand_socket,
            guide_duration: config.rope_guide_duration,
        };

        let rope = controller.rope();
        let step = controller.grapple(&mut body, &mut props, time.delta_secs(), &config);
        if step.is_some_and(|step| step.completed) {
            info!("Grapple flight completed");
            if let Some(rope) = rope {
                debug!("Rope {rope} released");
            }
        }
    }
}

/// Locomotion settings a flying character had before the leap.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct SuspendedLocomotion {
    pub toggle: TnuaToggle,
    pub gravity_scale: f32,
}

/// Hands the character to the scripted leap while flying and back to the
/// character controller afterwards, as it was before the leap.
pub fn suspend_locomotion_while_flying(
    mut commands: Commands,
    mut grapplers: Query<
        (
            Entity,
            &GrappleController,
            &mut TnuaToggle,
            &mut GravityScale,
            Option<&SuspendedLocomotion>,
        ),
        Changed<GrappleController>,
    >,
) {
    for (entity, controller, mut toggle, mut gravity, suspended) in grapplers.iter_mut() {
        match (controller.is_flying(), suspended) {
            (true, None) => {
                commands.entity(entity).insert(SuspendedLocomotion {
                    toggle: *toggle,
                    gravity_scale: gravity.0,
                });
                *toggle = TnuaToggle::Disabled;
                gravity.0 = 0.0;
            }
            (false, Some(suspended)) => {
                *toggle = suspended.toggle;
                gravity.0 = suspended.gravity_scale;
                commands.entity(entity).remove::<SuspendedLocomotion>();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::camera::{CameraProjection, RenderTargetInfo};

    use super::*;
    use crate::game::grapple::{
        VerticalArcCurve,
        anchor::clear_anchor_focus,
        controller::FlightPlan,
        ports::{CapsuleShape, Montage},
        rope::Rope,
        rope_guide::RopeGuide,
        testing,
    };

    fn flight_app(config: GrappleConfig) -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .insert_resource(config)
            .insert_resource(RopeGuideAssets {
                mesh: Handle::default(),
                material: Handle::default(),
            })
            .add_systems(
                Update,
                (advance_grapple_flight, suspend_locomotion_while_flying).chain(),
            );
        app
    }

    fn spawn_grappler(app: &mut App, controller: GrappleController) -> Entity {
        let hand_socket = app.world_mut().spawn_empty().id();
        app.world_mut()
            .spawn((
                controller,
                GrappleRig {
                    hand_socket,
                    capsule: CapsuleShape {
                        radius: 0.4,
                        half_height: 0.9,
                    },
                },
                Transform::default(),
                LinearVelocity(Vec3::new(0.0, -3.0, 0.0)),
                TnuaToggle::Enabled,
                GravityScale(1.0),
            ))
            .id()
    }

    fn tick(app: &mut App, millis: u64) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(millis));
        app.update();
    }

    #[test]
    fn test_flight_moves_character_and_releases_rope() {
        let mut app = flight_app(GrappleConfig {
            vertical_arc: VerticalArcCurve::flat(),
            ..default()
        });
        let rope = app
            .world_mut()
            .spawn(Rope::new(Entity::PLACEHOLDER, Entity::PLACEHOLDER, 1.0))
            .id();
        let plan = FlightPlan::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0), 20.0);
        let grappler = spawn_grappler(
            &mut app,
            GrappleController::committed(GrapplePhase::Flying, plan, Some(rope)),
        );

        tick(&mut app, 250);
        let world = app.world();
        assert!((world.get::<Transform>(grappler).unwrap().translation.z + 5.0).abs() < 1e-3);
        assert_eq!(world.get::<LinearVelocity>(grappler).unwrap().0, Vec3::ZERO);
        assert!(matches!(world.get::<TnuaToggle>(grappler).unwrap(), TnuaToggle::Disabled));
        assert_eq!(world.get::<GravityScale>(grappler).unwrap().0, 0.0);
        assert!(world.get_entity(rope).is_ok());

        tick(&mut app, 300);
        let world = app.world();
        let controller = world.get::<GrappleController>(grappler).unwrap();
        assert_eq!(controller.phase(), GrapplePhase::Idle);
        assert_eq!(controller.rope(), None);
        assert_eq!(
            world.get::<Transform>(grappler).unwrap().translation,
            Vec3::new(0.0, 0.0, -10.0)
        );
        assert!(world.get_entity(rope).is_err());
        assert!(matches!(world.get::<TnuaToggle>(grappler).unwrap(), TnuaToggle::Enabled));
        assert_eq!(world.get::<GravityScale>(grappler).unwrap().0, 1.0);
    }

    #[test]
    fn test_idle_grappler_is_left_alone() {
        let mut app = flight_app(GrappleConfig::default());
        let grappler = spawn_grappler(&mut app, GrappleController::default());

        tick(&mut app, 100);
        let world = app.world();
        assert_eq!(world.get::<Transform>(grappler).unwrap().translation, Vec3::ZERO);
        assert_eq!(
            world.get::<LinearVelocity>(grappler).unwrap().0,
            Vec3::new(0.0, -3.0, 0.0)
        );
        assert!(matches!(world.get::<TnuaToggle>(grappler).unwrap(), TnuaToggle::Enabled));
    }

    #[test]
    fn test_flight_restores_previous_gravity() {
        let mut app = flight_app(GrappleConfig {
            vertical_arc: VerticalArcCurve::flat(),
            ..default()
        });
        let plan = FlightPlan::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0), 20.0);
        let grappler = spawn_grappler(
            &mut app,
            GrappleController::committed(GrapplePhase::Flying, plan, None),
        );
        app.world_mut()
            .entity_mut(grappler)
            .insert((GravityScale(0.4), TnuaToggle::SenseOnly));

        tick(&mut app, 250);
        let world = app.world();
        assert_eq!(world.get::<GravityScale>(grappler).unwrap().0, 0.0);
        assert_eq!(*world.get::<TnuaToggle>(grappler).unwrap(), TnuaToggle::Disabled);

        tick(&mut app, 300);
        let world = app.world();
        assert_eq!(world.get::<GravityScale>(grappler).unwrap().0, 0.4);
        assert_eq!(*world.get::<TnuaToggle>(grappler).unwrap(), TnuaToggle::SenseOnly);
        assert!(world.get::<SuspendedLocomotion>(grappler).is_none());
    }

    /// Montage requests seen by the animation side.
    #[derive(Resource, Default)]
    struct PlayedMontages(Vec<PlayMontage>);

    fn record_montages(mut requests: MessageReader<PlayMontage>, mut played: ResMut<PlayedMontages>) {
        played.0.extend(requests.read().cloned());
    }

    const ANCHOR: Vec3 = Vec3::new(0.0, 6.0, -10.0);
    const START: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    /// Physics world with a camera aimed at a grapple point, running
    /// acquisition and the start gate every frame.
    fn gate_app() -> (App, Entity, Entity) {
        let mut app = testing::physics_app();
        app.add_message::<PlayMontage>()
            .init_resource::<ObstacleProbeLog>()
            .init_resource::<PlayedMontages>()
            .insert_resource(RopeGuideAssets {
                mesh: Handle::default(),
                material: Handle::default(),
            })
            .add_systems(
                Update,
                (
                    clear_anchor_focus,
                    acquire_grapple_target,
                    start_grappling,
                    record_montages,
                )
                    .chain(),
            );

        let projection = PerspectiveProjection::default();
        let mut camera = Camera::default();
        camera.computed.clip_from_view = projection.get_clip_from_view();
        camera.computed.target_info = Some(RenderTargetInfo {
            physical_size: UVec2::new(800, 600),
            scale_factor: 1.0,
        });

        let world = app.world_mut();
        world.spawn((
            Camera3d::default(),
            camera,
            Projection::Perspective(projection),
            // Off to the side, so the sight line clears the leap path
            Transform::from_xyz(3.0, 1.5, 2.0).looking_at(ANCHOR, Vec3::Y),
        ));
        testing::spawn_floor(world);
        let (anchor, _) = testing::spawn_anchor(world, ANCHOR);
        let grappler = testing::spawn_grappler(world, START);
        (app, anchor, grappler)
    }

    fn run_frames(app: &mut App, frames: usize) {
        for _ in 0..frames {
            app.update();
        }
    }

    fn count<C: Component>(app: &mut App) -> usize {
        app.world_mut()
            .query::<&C>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn test_crosshair_focuses_grapple_point_and_gate_throws_rope() {
        let (mut app, anchor, grappler) = gate_app();
        run_frames(&mut app, 4);

        let world = app.world();
        let controller = world.get::<GrappleController>(grappler).unwrap();
        assert_eq!(controller.phase(), GrapplePhase::Aligning);
        assert!(controller.target_focused());
        assert_eq!(controller.flight().start, START);
        assert_eq!(controller.flight().end, ANCHOR + Vec3::Y);
        // Still highlighted while the character turns to it
        assert!(world.get::<AnchorPoint>(anchor).unwrap().focused);

        // The gate keeps firing while aligning but only the first launch counts
        assert_eq!(count::<RopeGuide>(&mut app), 1);
        let ropes: Vec<Rope> = app
            .world_mut()
            .query::<&Rope>()
            .iter(app.world())
            .copied()
            .collect();
        assert_eq!(ropes.len(), 1);
        let distance = START.distance(ANCHOR + Vec3::Y);
        assert!((ropes[0].length - distance / 2.0).abs() < 1e-4);

        let played = &app.world().resource::<PlayedMontages>().0;
        assert_eq!(
            played,
            &vec![PlayMontage {
                character: grappler,
                montage: Montage::GrappleThrow,
                section: "Default".to_string(),
            }]
        );

        let log = app.world().resource::<ObstacleProbeLog>();
        assert_eq!(log.sweeps().count(), 1);
        assert!(log.sweeps().all(|sweep| sweep.is_clear()));
    }

    #[test]
    fn test_blocked_gate_only_logs_the_sweep() {
        let (mut app, anchor, grappler) = gate_app();
        // Sits on the middle of the leap arc, beside the camera's sight line
        testing::spawn_block(app.world_mut(), Vec3::new(0.0, 4.75, -5.0), Vec3::ONE);
        run_frames(&mut app, 4);

        let world = app.world();
        let controller = world.get::<GrappleController>(grappler).unwrap();
        assert_eq!(controller.phase(), GrapplePhase::Idle);
        assert!(controller.target_focused());
        assert_eq!(controller.rope(), None);
        assert!(world.get::<AnchorPoint>(anchor).unwrap().focused);
        assert!(world.resource::<PlayedMontages>().0.is_empty());

        let log = world.resource::<ObstacleProbeLog>();
        assert!(log.sweeps().count() >= 1);
        assert!(log.sweeps().all(|sweep| !sweep.is_clear()));

        assert_eq!(count::<RopeGuide>(&mut app), 0);
        assert_eq!(count::<Rope>(&mut app), 0);
    }
}
