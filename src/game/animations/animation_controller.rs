use std::time::Duration;

use bevy::prelude::*;

use crate::game::{
    grapple::{Montage, PlayMontage},
    player::PlayerRig,
};

use super::{animation_assets::PlayerAnimations, models::CharacterAnimationController};

const MONTAGE_BLEND: Duration = Duration::from_millis(100);
const IDLE_BLEND: Duration = Duration::from_millis(200);

/// Stores the indices of animation nodes in the animation graph
#[derive(Resource)]
pub struct AnimationNodes {
    pub graph: Handle<AnimationGraph>,
    pub idle: AnimationNodeIndex,
    pub throw: AnimationNodeIndex,
}

/// Creates the animation graph with all clips
pub fn setup_animation_graph(
    mut commands: Commands,
    animations: Res<PlayerAnimations>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
) {
    let mut graph = AnimationGraph::new();
    let root_node = graph.root;
    let idle = graph.add_clip(animations.idle.clone(), 1.0, root_node);
    let throw = graph.add_clip(animations.throw.clone(), 1.0, root_node);

    commands.insert_resource(AnimationNodes {
        graph: graphs.add(graph),
        idle,
        throw,
    });
    info!("Player animation graph created");
}

/// Gives each new player rig an animation player, starting in idle
pub fn attach_animation_controller(
    mut commands: Commands,
    rigs: Query<(Entity, &ChildOf), Added<PlayerRig>>,
    nodes: Res<AnimationNodes>,
) {
    for (rig, child_of) in rigs.iter() {
        let mut animation_player = AnimationPlayer::default();
        let mut transitions = AnimationTransitions::new();
        transitions
            .play(&mut animation_player, nodes.idle, Duration::ZERO)
            .repeat();

        commands.entity(rig).insert((
            animation_player,
            transitions,
            AnimationGraphHandle(nodes.graph.clone()),
        ));
        commands
            .entity(child_of.parent())
            .insert(CharacterAnimationController {
                animation_player: rig,
            });
    }
}

/// Start time of a named montage section, `None` if the montage has no such section
pub fn montage_section_start(montage: Montage, section: &str) -> Option<f32> {
    match (montage, section) {
        (Montage::GrappleThrow, "Default") => Some(0.0),
        _ => None,
    }
}

pub fn play_requested_montages(
    mut requests: MessageReader<PlayMontage>,
    characters: Query<&CharacterAnimationController>,
    mut players: Query<(&mut AnimationPlayer, &mut AnimationTransitions)>,
    nodes: Res<AnimationNodes>,
) {
    for request in requests.read() {
        let Ok(controller) = characters.get(request.character) else {
            warn!("No animation controller on {} for {:?}", request.character, request.montage);
            continue;
        };
        let Ok((mut animation_player, mut transitions)) =
            players.get_mut(controller.animation_player)
        else {
            continue;
        };

        let node = match request.montage {
            Montage::GrappleThrow => nodes.throw,
        };
        let start = montage_section_start(request.montage, &request.section).unwrap_or_else(|| {
            warn!(
                "Unknown section {:?} in {:?}, playing from the start",
                request.section, request.montage
            );
            0.0
        });

        transitions
            .play(&mut animation_player, node, MONTAGE_BLEND)
            .seek_to(start);
        debug!("Playing {:?} from section {:?}", request.montage, request.section);
    }
}

/// Blends back to idle once a one-shot montage ends
pub fn return_to_idle(
    mut players: Query<(&mut AnimationPlayer, &mut AnimationTransitions)>,
    nodes: Res<AnimationNodes>,
) {
    for (mut animation_player, mut transitions) in players.iter_mut() {
        if transitions.get_main_animation() != Some(nodes.throw) {
            continue;
        }
        let finished = animation_player
            .animation(nodes.throw)
            .is_some_and(|animation| animation.is_finished());
        if finished {
            transitions
                .play(&mut animation_player, nodes.idle, IDLE_BLEND)
                .repeat();
        }
    }
}
