use thiserror::Error;

use super::{controller::PathSweep, state::GrapplePhase};

/// Why a grapple request was turned down. Every variant is a silent no-op for
/// the controller; callers only log it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrappleRejection {
    #[error("no grapple point is focused")]
    NotFocused,
    #[error("grapple already in progress ({0:?})")]
    Busy(GrapplePhase),
    #[error("path to grapple point is blocked at {} of {} samples", .0.blocked_count(), .0.probes.len())]
    PathBlocked(PathSweep),
}

/// Invalid tuning data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrappleConfigError {
    #[error("vertical arc key ({time}, {value}) is not finite")]
    NonFiniteKey { time: f32, value: f32 },
    #[error("vertical arc needs at least two keys at distinct times, got {keys}")]
    DegenerateArc { keys: usize },
}
