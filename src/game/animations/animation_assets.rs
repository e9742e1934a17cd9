use bevy::prelude::*;

use crate::game::{configs::GrappleConfig, grapple::GrappleLeapStart};

/// Length of the idle loop in seconds
pub const IDLE_DURATION: f32 = 2.0;
/// Length of the rope throw in seconds
pub const THROW_DURATION: f32 = 0.8;

/// Clips for the stand-in player model. The throw carries the leap cue.
#[derive(Resource, Clone)]
pub struct PlayerAnimations {
    pub idle: Handle<AnimationClip>,
    pub throw: Handle<AnimationClip>,
}

impl FromWorld for PlayerAnimations {
    fn from_world(world: &mut World) -> Self {
        let cue_time = world
            .get_resource::<GrappleConfig>()
            .map_or(GrappleConfig::default().throw_cue_time, |config| {
                config.throw_cue_time
            });

        let mut clips = world.resource_mut::<Assets<AnimationClip>>();
        Self {
            idle: clips.add(idle_clip()),
            throw: clips.add(throw_clip(cue_time)),
        }
    }
}

fn idle_clip() -> AnimationClip {
    let mut clip = AnimationClip::default();
    clip.set_duration(IDLE_DURATION);
    clip
}

/// Throw clip with the leap cue at `cue_time`, clamped into the clip.
pub fn throw_clip(cue_time: f32) -> AnimationClip {
    let mut clip = AnimationClip::default();
    clip.add_event(cue_time.clamp(0.0, THROW_DURATION), GrappleLeapStart);
    clip.set_duration(THROW_DURATION);
    clip
}

/// Moves the leap cue when the grapple config changes
pub fn sync_throw_cue(
    config: Res<GrappleConfig>,
    animations: Res<PlayerAnimations>,
    mut clips: ResMut<Assets<AnimationClip>>,
) {
    if let Some(clip) = clips.get_mut(&animations.throw) {
        *clip = throw_clip(config.throw_cue_time);
        debug!("Throw cue set to {:.2}s", config.throw_cue_time);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::{animation::AnimationPlugin, time::TimeUpdateStrategy};

    use super::*;

    /// Animation players that fired the leap cue, in order.
    #[derive(Resource, Default)]
    struct LeapCues(Vec<Entity>);

    /// Plays `clip` once, advancing 100ms per frame after the first.
    fn playing(clip: AnimationClip) -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), AnimationPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .init_resource::<LeapCues>()
            .add_observer(|cue: On<GrappleLeapStart>, mut cues: ResMut<LeapCues>| {
                cues.0.push(cue.trigger().animation_player);
            });
        app.finish();

        let clip = app
            .world_mut()
            .resource_mut::<Assets<AnimationClip>>()
            .add(clip);
        let mut graph = AnimationGraph::new();
        let root = graph.root;
        let node = graph.add_clip(clip, 1.0, root);
        let graph = app
            .world_mut()
            .resource_mut::<Assets<AnimationGraph>>()
            .add(graph);

        let mut player = AnimationPlayer::default();
        player.play(node);
        let player = app
            .world_mut()
            .spawn((player, AnimationGraphHandle(graph)))
            .id();
        (app, player)
    }

    fn cues(app: &App) -> &[Entity] {
        &app.world().resource::<LeapCues>().0
    }

    #[test]
    fn test_throw_clip_keeps_its_length() {
        assert_eq!(throw_clip(0.35).duration(), THROW_DURATION);
        assert_eq!(throw_clip(5.0).duration(), THROW_DURATION);
        assert_eq!(idle_clip().duration(), IDLE_DURATION);
    }

    #[test]
    fn test_throw_fires_leap_cue_at_cue_time() {
        let (mut app, player) = playing(throw_clip(0.35));

        // First frame has no delta, so the clip sits at 0.3s after four frames
        for _ in 0..4 {
            app.update();
        }
        assert!(cues(&app).is_empty());

        for _ in 0..4 {
            app.update();
        }
        assert_eq!(cues(&app), [player]);
    }

    #[test]
    fn test_late_cue_is_clamped_into_the_throw() {
        let (mut app, player) = playing(throw_clip(5.0));

        for _ in 0..8 {
            app.update();
        }
        assert!(cues(&app).is_empty());

        for _ in 0..3 {
            app.update();
        }
        assert_eq!(cues(&app), [player]);
    }
}
