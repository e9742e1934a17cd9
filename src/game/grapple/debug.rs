use bevy::prelude::*;

use crate::game::configs::GrappleConfig;

use super::controller::PathSweep;

/// How long a gate's obstacle probes stay on screen.
pub const PROBE_LIFETIME_SECS: f32 = 2.0;

const BLOCKED_COLOR: Color = Color::srgb(1.0, 0.1, 0.1);
const CLEAR_COLOR: Color = Color::srgb(0.2, 0.4, 1.0);

/// Recent gate sweeps kept for drawing.
#[derive(Resource, Debug, Default)]
pub struct ObstacleProbeLog {
    entries: Vec<(PathSweep, f32)>,
}

impl ObstacleProbeLog {
    pub fn record(&mut self, sweep: PathSweep, now_secs: f32) {
        self.entries.push((sweep, now_secs + PROBE_LIFETIME_SECS));
    }

    pub fn expire(&mut self, now_secs: f32) {
        self.entries.retain(|(_, expires_at)| *expires_at > now_secs);
    }

    pub fn sweeps(&self) -> impl Iterator<Item = &PathSweep> {
        self.entries.iter().map(|(sweep, _)| sweep)
    }
}

pub fn draw_obstacle_probes(
    mut gizmos: Gizmos,
    mut log: ResMut<ObstacleProbeLog>,
    time: Res<Time>,
    config: Res<GrappleConfig>,
) {
    log.expire(time.elapsed_secs());
    if !config.debug_draw {
        return;
    }

    for sweep in log.sweeps() {
        let Some(capsule) = sweep.capsule else {
            continue;
        };
        let shape = Capsule3d::new(capsule.radius, capsule.segment_length());

        for probe in &sweep.probes {
            let color = if probe.blocked { BLOCKED_COLOR } else { CLEAR_COLOR };
            gizmos.primitive_3d(&shape, Isometry3d::from_translation(probe.position), color);
        }
    }
}
