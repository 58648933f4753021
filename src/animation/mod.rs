//! Measure rotation: the flip state machine and the virtual timers that feed it.

mod rotation;
mod timers;

pub use rotation::{
    FLIP_EDGE_ANGLE, RotationEvent, RotationOutput, RotationPhase, RotationStateMachine,
};
pub use timers::{IntervalTimers, TimerCommand, TimerFired, TimerKind};
