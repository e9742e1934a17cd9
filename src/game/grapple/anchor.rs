use bevy::prelude::*;

use crate::game::configs::GrappleConfig;

use super::controller::GrappleController;

const MARKER_RADIUS: f32 = 0.15;
const FOCUSED_MARKER_RADIUS: f32 = 0.45;

/// World-placed point the player can grapple to.
///
/// The hook collider lives on a child entity tagged [`AnchorHook`]; the rope
/// attaches there.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnchorPoint {
    /// Set by the controller on frames where the crosshair rests on this point.
    pub focused: bool,
}

/// Collider child of an [`AnchorPoint`], the rope's attach point.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct AnchorHook;

/// Drops every focus flag. Runs before acquisition each frame, so a point the
/// crosshair left is never reported focused.
///
/// Left alone while someone is aligning: acquisition is suspended then and the
/// focused point is the one the rope was thrown at.
pub fn clear_anchor_focus(
    mut anchors: Query<&mut AnchorPoint>,
    grapplers: Query<&GrappleController>,
) {
    if grapplers.iter().any(GrappleController::is_aligning) {
        return;
    }

    for mut anchor in anchors.iter_mut() {
        // Avoid tripping change detection on every anchor every frame
        if anchor.focused {
            anchor.focused = false;
        }
    }
}

/// Marks `anchor` focused. Returns false if it is not a grapple point.
pub fn focus_anchor(anchors: &mut Query<&mut AnchorPoint>, anchor: Entity) -> bool {
    let Ok(mut point) = anchors.get_mut(anchor) else {
        return false;
    };
    point.focused = true;
    true
}

/// Small marker on every grapple point, enlarged while focused.
pub fn draw_anchor_markers(
    mut gizmos: Gizmos,
    anchors: Query<(&AnchorPoint, &GlobalTransform)>,
    config: Res<GrappleConfig>,
) {
    for (anchor, transform) in anchors.iter() {
        let isometry = Isometry3d::from_translation(transform.translation());
        if anchor.focused {
            gizmos.sphere(isometry, FOCUSED_MARKER_RADIUS, Color::srgb(1.0, 0.85, 0.1));
        } else if config.debug_draw {
            gizmos.sphere(isometry, MARKER_RADIUS, Color::srgba(1.0, 1.0, 1.0, 0.5));
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;
    use crate::game::grapple::{GrapplePhase, controller::FlightPlan};

    #[test]
    fn test_focus_then_clear() {
        let mut app = App::new();
        let anchor = app.world_mut().spawn(AnchorPoint::default()).id();
        let other = app.world_mut().spawn(AnchorPoint { focused: true }).id();
        let not_anchor = app.world_mut().spawn_empty().id();

        let focused = app
            .world_mut()
            .run_system_once(move |mut anchors: Query<&mut AnchorPoint>| {
                (
                    focus_anchor(&mut anchors, anchor),
                    focus_anchor(&mut anchors, not_anchor),
                )
            })
            .unwrap();
        assert_eq!(focused, (true, false));
        assert!(app.world().get::<AnchorPoint>(anchor).unwrap().focused);

        app.world_mut().run_system_once(clear_anchor_focus).unwrap();
        assert!(!app.world().get::<AnchorPoint>(anchor).unwrap().focused);
        assert!(!app.world().get::<AnchorPoint>(other).unwrap().focused);
    }

    #[test]
    fn test_focus_survives_alignment() {
        let mut app = App::new();
        let anchor = app.world_mut().spawn(AnchorPoint { focused: true }).id();
        let grappler = app
            .world_mut()
            .spawn(GrappleController::committed(
                GrapplePhase::Aligning,
                FlightPlan::default(),
                None,
            ))
            .id();

        app.world_mut().run_system_once(clear_anchor_focus).unwrap();
        assert!(app.world().get::<AnchorPoint>(anchor).unwrap().focused);

        app.world_mut().entity_mut(grappler).insert(GrappleController::committed(
            GrapplePhase::Flying,
            FlightPlan::default(),
            None,
        ));
        app.world_mut().run_system_once(clear_anchor_focus).unwrap();
        assert!(!app.world().get::<AnchorPoint>(anchor).unwrap().focused);
    }
}
