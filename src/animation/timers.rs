use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The two interval timers driving rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// Slow timer: advance to the next measure.
    Advance,
    /// Fast timer: one flip animation frame.
    Frame,
}

/// Instruction emitted by the state machine for whoever owns the timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerCommand {
    Arm {
        timer: TimerKind,
        interval: Duration,
        generation: u64,
    },
    Cancel {
        timer: TimerKind,
    },
}

/// A timer firing, tagged with the generation it was armed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerFired {
    pub timer: TimerKind,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArmedTimer {
    interval: Duration,
    next_fire: Duration,
    generation: u64,
}

/// Deterministic virtual-time interval timers.
///
/// Time only moves when the owner pulls due firings with [`Self::next_due`]
/// or calls [`Self::advance_to`], so tests and headless hosts can replay an
/// animation exactly.
#[derive(Debug, Clone, Default)]
pub struct IntervalTimers {
    now: Duration,
    advance: Option<ArmedTimer>,
    frame: Option<ArmedTimer>,
}

impl IntervalTimers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn is_armed(&self, timer: TimerKind) -> bool {
        self.slot(timer).is_some()
    }

    fn slot(&self, timer: TimerKind) -> &Option<ArmedTimer> {
        match timer {
            TimerKind::Advance => &self.advance,
            TimerKind::Frame => &self.frame,
        }
    }

    fn slot_mut(&mut self, timer: TimerKind) -> &mut Option<ArmedTimer> {
        match timer {
            TimerKind::Advance => &mut self.advance,
            TimerKind::Frame => &mut self.frame,
        }
    }

    /// Applies one command. Cancelling an idle timer is a no-op; arming an
    /// armed timer replaces it.
    pub fn apply(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::Arm {
                timer,
                interval,
                generation,
            } => {
                let interval = interval.max(Duration::from_millis(1));
                *self.slot_mut(timer) = Some(ArmedTimer {
                    interval,
                    next_fire: self.now + interval,
                    generation,
                });
            }
            TimerCommand::Cancel { timer } => {
                *self.slot_mut(timer) = None;
            }
        }
    }

    /// Pops the earliest firing due at or before `deadline` and moves the
    /// clock to its fire time. The advance timer wins ties.
    pub fn next_due(&mut self, deadline: Duration) -> Option<TimerFired> {
        let candidate = [TimerKind::Advance, TimerKind::Frame]
            .into_iter()
            .filter_map(|kind| self.slot(kind).map(|armed| (kind, armed)))
            .filter(|(_, armed)| armed.next_fire <= deadline)
            .min_by_key(|(_, armed)| armed.next_fire);

        let (timer, armed) = candidate?;
        self.now = armed.next_fire;
        if let Some(slot) = self.slot_mut(timer) {
            slot.next_fire += slot.interval;
        }
        Some(TimerFired {
            timer,
            generation: armed.generation,
        })
    }

    /// Moves the clock forward without firing anything.
    pub fn advance_to(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}
