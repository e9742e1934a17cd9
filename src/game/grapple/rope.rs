use bevy::prelude::*;

const ROPE_SEGMENTS: usize = 16;
const ROPE_COLOR: Color = Color::srgb(0.55, 0.42, 0.25);

/// Cosmetic rope from the character's hand to the rope guide.
///
/// Owned by the [`GrappleController`](super::GrappleController) that threw it
/// and despawned when the leap completes. The guide may despawn first; the rope
/// then stays pinned to where the guide was last seen.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Rope {
    pub hand_socket: Entity,
    pub end: Entity,
    /// Rest length. Slack sags when the ends are closer than this.
    pub length: f32,
    pub last_end: Option<Vec3>,
}

impl Rope {
    pub fn new(hand_socket: Entity, end: Entity, length: f32) -> Self {
        Self {
            hand_socket,
            end,
            length,
            last_end: None,
        }
    }
}

/// Depth of the sag at the midpoint of a rope of `length` hung between two
/// points `span` apart. Parabolic approximation, zero when taut.
pub fn sag_depth(span: f32, length: f32) -> f32 {
    if length <= span {
        return 0.0;
    }
    (3.0 * span * (length - span) / 8.0).sqrt()
}

/// Polyline from `start` to `end` with `segments + 1` points, sagging
/// downwards by the slack in `length`.
pub fn rope_points(start: Vec3, end: Vec3, length: f32, segments: usize) -> Vec<Vec3> {
    let segments = segments.max(1);
    let sag = sag_depth(start.distance(end), length);

    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            start.lerp(end, t) - Vec3::Y * sag * 4.0 * t * (1.0 - t)
        })
        .collect()
}

/// Pins each rope to its guide while the guide exists.
pub fn track_rope_ends(mut ropes: Query<&mut Rope>, transforms: Query<&GlobalTransform>) {
    for mut rope in ropes.iter_mut() {
        if let Ok(end) = transforms.get(rope.end) {
            rope.last_end = Some(end.translation());
        }
    }
}

pub fn draw_ropes(mut gizmos: Gizmos, ropes: Query<&Rope>, transforms: Query<&GlobalTransform>) {
    for rope in ropes.iter() {
        let (Ok(hand), Some(end)) = (transforms.get(rope.hand_socket), rope.last_end) else {
            continue;
        };

        gizmos.linestrip(
            rope_points(hand.translation(), end, rope.length, ROPE_SEGMENTS),
            ROPE_COLOR,
        );
    }
}
