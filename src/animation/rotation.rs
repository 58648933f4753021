use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::style::{
    AnimationSettings, MAX_ANIMATION_DURATION_SECONDS, MIN_ANIMATION_DURATION_SECONDS,
};

use super::{TimerCommand, TimerFired, TimerKind};

/// Flip angle at which the chart is edge-on and the next measure is swapped in.
pub const FLIP_EDGE_ANGLE: i32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationPhase {
    /// No timer armed.
    Idle,
    /// Advance timer armed, waiting for the next measure.
    Waiting,
    /// Frame timer driving the flip.
    Flipping,
}

/// Inputs to the rotation state machine, applied in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RotationEvent {
    /// Stop both timers and settle unrotated; the measure index is kept.
    Cancel,
    /// New data or style arrived.
    Reset {
        measure_count: usize,
        animation: AnimationSettings,
    },
    Timer(TimerFired),
    /// The user clicked the chart.
    ManualAdvance,
}

/// What the owner must do after one event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RotationOutput {
    pub commands: SmallVec<[TimerCommand; 3]>,
    /// The flip angle moved; the frame transform needs redrawing.
    pub transform_changed: bool,
    /// The measure index moved; the view model must be rebuilt.
    pub measure_changed: bool,
}

/// Owns measure rotation and the flip animation.
///
/// Every armed timer carries a fresh generation number. Firings from a
/// cancelled or replaced timer no longer match and are dropped, so a
/// superseded cycle can never touch the current state.
#[derive(Debug, Clone)]
pub struct RotationStateMachine {
    phase: RotationPhase,
    measure_index: usize,
    measure_count: usize,
    angle: i32,
    animation: AnimationSettings,
    frame_interval: Duration,
    next_generation: u64,
    advance_generation: Option<u64>,
    frame_generation: Option<u64>,
}

impl RotationStateMachine {
    #[must_use]
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            phase: RotationPhase::Idle,
            measure_index: 0,
            measure_count: 0,
            angle: 0,
            animation: AnimationSettings::default(),
            frame_interval,
            next_generation: 0,
            advance_generation: None,
            frame_generation: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> RotationPhase {
        self.phase
    }

    #[must_use]
    pub fn measure_index(&self) -> usize {
        self.measure_index
    }

    #[must_use]
    pub fn measure_count(&self) -> usize {
        self.measure_count
    }

    #[must_use]
    pub fn angle(&self) -> i32 {
        self.angle
    }

    /// Moves back to a measure that rendered successfully after the one the
    /// last flip advanced to could not be drawn. Out-of-range indexes are
    /// ignored.
    pub fn restore_measure_index(&mut self, measure_index: usize) {
        if measure_index < self.measure_count {
            debug!(
                from = self.measure_index,
                to = measure_index,
                "measure index restored"
            );
            self.measure_index = measure_index;
        }
    }

    /// Rotation applied around the horizontal axis, in degrees.
    #[must_use]
    pub fn rotate_x_degrees(&self) -> f64 {
        -f64::from(self.angle)
    }

    pub fn handle(&mut self, event: RotationEvent) -> RotationOutput {
        let mut output = RotationOutput::default();
        match event {
            RotationEvent::Cancel => self.cancel_all(&mut output),
            RotationEvent::Reset {
                measure_count,
                animation,
            } => self.reset(measure_count, animation, &mut output),
            RotationEvent::ManualAdvance => {
                if self.measure_count > 1 && self.phase != RotationPhase::Flipping {
                    debug!(measure_index = self.measure_index, "manual advance");
                    self.start_flip(&mut output);
                }
            }
            RotationEvent::Timer(fired) => self.on_timer(fired, &mut output),
        }
        output
    }

    fn reset(
        &mut self,
        measure_count: usize,
        animation: AnimationSettings,
        output: &mut RotationOutput,
    ) {
        self.cancel_all(output);
        self.measure_count = measure_count;
        self.animation = animation;
        if self.measure_index >= measure_count {
            self.measure_index = 0;
        }
        if self.auto_rotates() {
            self.arm_advance(output);
        }
        debug!(
            measure_count,
            measure_index = self.measure_index,
            phase = ?self.phase,
            "rotation reset"
        );
    }

    fn cancel_all(&mut self, output: &mut RotationOutput) {
        self.cancel(TimerKind::Advance, output);
        self.cancel(TimerKind::Frame, output);
        if self.angle != 0 {
            output.transform_changed = true;
        }
        self.phase = RotationPhase::Idle;
        self.angle = 0;
    }

    fn auto_rotates(&self) -> bool {
        self.animation.show && self.measure_count > 1
    }

    fn on_timer(&mut self, fired: TimerFired, output: &mut RotationOutput) {
        let current = match fired.timer {
            TimerKind::Advance => self.advance_generation,
            TimerKind::Frame => self.frame_generation,
        };
        if current != Some(fired.generation) {
            trace!(timer = ?fired.timer, generation = fired.generation, "stale timer dropped");
            return;
        }

        match (fired.timer, self.phase) {
            (TimerKind::Advance, RotationPhase::Waiting) => self.start_flip(output),
            (TimerKind::Frame, RotationPhase::Flipping) => self.flip_frame(output),
            (timer, phase) => {
                trace!(?timer, ?phase, "timer fired outside its phase");
            }
        }
    }

    fn start_flip(&mut self, output: &mut RotationOutput) {
        self.cancel(TimerKind::Advance, output);
        self.phase = RotationPhase::Flipping;
        self.angle = 1;
        self.next_generation += 1;
        self.frame_generation = Some(self.next_generation);
        output.commands.push(TimerCommand::Arm {
            timer: TimerKind::Frame,
            interval: self.frame_interval,
            generation: self.next_generation,
        });
        output.transform_changed = true;
    }

    fn flip_frame(&mut self, output: &mut RotationOutput) {
        match self.angle {
            FLIP_EDGE_ANGLE => {
                self.measure_index = (self.measure_index + 1) % self.measure_count.max(1);
                self.angle = -FLIP_EDGE_ANGLE;
                output.measure_changed = true;
                output.transform_changed = true;
                debug!(measure_index = self.measure_index, "flip reached edge, measure advanced");
            }
            0 => {
                self.cancel(TimerKind::Frame, output);
                if self.auto_rotates() {
                    self.arm_advance(output);
                } else {
                    self.phase = RotationPhase::Idle;
                }
                trace!(phase = ?self.phase, "flip settled");
            }
            _ => {
                self.angle += 1;
                output.transform_changed = true;
            }
        }
    }

    fn arm_advance(&mut self, output: &mut RotationOutput) {
        self.next_generation += 1;
        self.advance_generation = Some(self.next_generation);
        self.phase = RotationPhase::Waiting;
        output.commands.push(TimerCommand::Arm {
            timer: TimerKind::Advance,
            interval: advance_interval(self.animation),
            generation: self.next_generation,
        });
    }

    fn cancel(&mut self, timer: TimerKind, output: &mut RotationOutput) {
        match timer {
            TimerKind::Advance => self.advance_generation = None,
            TimerKind::Frame => self.frame_generation = None,
        }
        output.commands.push(TimerCommand::Cancel { timer });
    }
}

fn advance_interval(animation: AnimationSettings) -> Duration {
    let seconds = if animation.duration_seconds.is_finite() {
        animation
            .duration_seconds
            .clamp(MIN_ANIMATION_DURATION_SECONDS, MAX_ANIMATION_DURATION_SECONDS)
    } else {
        AnimationSettings::default().duration_seconds
    };
    Duration::from_secs_f64(seconds)
}
