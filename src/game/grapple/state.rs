use bevy::prelude::*;

/// Where a character is in the grapple cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum GrapplePhase {
    /// Free movement; target acquisition runs.
    #[default]
    Idle,
    /// Rope thrown, turning to face the grapple point until the throw animation cue.
    Aligning,
    /// Leaping along the arc towards the grapple point.
    Flying,
}

/// Inputs that move the grapple cycle forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrappleEvent {
    /// The start gate found a clear path.
    GateCleared,
    /// The throw animation reached its leap keyframe.
    LeapCue,
    /// Flight time reached the planned duration.
    FlightCompleted,
}

impl GrapplePhase {
    /// Idle -> Aligning -> Flying -> Idle. Any other pairing leaves the phase as is.
    pub fn transition(self, event: GrappleEvent) -> Self {
        match (self, event) {
            (GrapplePhase::Idle, GrappleEvent::GateCleared) => GrapplePhase::Aligning,
            (GrapplePhase::Aligning, GrappleEvent::LeapCue) => GrapplePhase::Flying,
            (GrapplePhase::Flying, GrappleEvent::FlightCompleted) => GrapplePhase::Idle,
            (phase, _) => phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let phase = GrapplePhase::Idle
            .transition(GrappleEvent::GateCleared)
            .transition(GrappleEvent::LeapCue)
            .transition(GrappleEvent::FlightCompleted);
        assert_eq!(phase, GrapplePhase::Idle);
    }

    #[test]
    fn test_out_of_order_events_are_ignored() {
        assert_eq!(GrapplePhase::Idle.transition(GrappleEvent::LeapCue), GrapplePhase::Idle);
        assert_eq!(
            GrapplePhase::Idle.transition(GrappleEvent::FlightCompleted),
            GrapplePhase::Idle
        );
        assert_eq!(
            GrapplePhase::Aligning.transition(GrappleEvent::GateCleared),
            GrapplePhase::Aligning
        );
        assert_eq!(
            GrapplePhase::Aligning.transition(GrappleEvent::FlightCompleted),
            GrapplePhase::Aligning
        );
        assert_eq!(
            GrapplePhase::Flying.transition(GrappleEvent::GateCleared),
            GrapplePhase::Flying
        );
        assert_eq!(GrapplePhase::Flying.transition(GrappleEvent::LeapCue), GrapplePhase::Flying);
    }
}
