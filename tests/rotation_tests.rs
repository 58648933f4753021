use std::time::Duration;

use proptest::prelude::*;
use rotating_chart::animation::{
    IntervalTimers, RotationEvent, RotationOutput, RotationPhase, RotationStateMachine,
    TimerCommand, TimerFired, TimerKind,
};
use rotating_chart::style::AnimationSettings;

struct Harness {
    machine: RotationStateMachine,
    timers: IntervalTimers,
    measure_changes: usize,
}

impl Harness {
    fn new() -> Self {
        Self {
            machine: RotationStateMachine::new(Duration::from_millis(5)),
            timers: IntervalTimers::new(),
            measure_changes: 0,
        }
    }

    fn send(&mut self, event: RotationEvent) -> RotationOutput {
        let output = self.machine.handle(event);
        for command in &output.commands {
            self.timers.apply(*command);
        }
        if output.measure_changed {
            self.measure_changes += 1;
        }
        output
    }

    fn reset(&mut self, measure_count: usize, show: bool) -> RotationOutput {
        self.send(RotationEvent::Reset {
            measure_count,
            animation: AnimationSettings {
                show,
                duration_seconds: 6.0,
            },
        })
    }

    fn run_for(&mut self, elapsed: Duration) {
        let deadline = self.timers.now() + elapsed;
        while let Some(fired) = self.timers.next_due(deadline) {
            self.send(RotationEvent::Timer(fired));
        }
        self.timers.advance_to(deadline);
    }
}

fn armed_advance_interval(output: &RotationOutput) -> Option<Duration> {
    output.commands.iter().find_map(|command| match command {
        TimerCommand::Arm {
            timer: TimerKind::Advance,
            interval,
            ..
        } => Some(*interval),
        _ => None,
    })
}

#[test]
fn reset_cancels_both_timers_then_arms_advance() {
    let mut harness = Harness::new();
    let output = harness.reset(3, true);

    assert_eq!(output.commands.len(), 3);
    assert_eq!(output.commands[0], TimerCommand::Cancel {
        timer: TimerKind::Advance
    });
    assert_eq!(output.commands[1], TimerCommand::Cancel {
        timer: TimerKind::Frame
    });
    assert_eq!(armed_advance_interval(&output), Some(Duration::from_secs(6)));
    assert_eq!(harness.machine.phase(), RotationPhase::Waiting);
}

#[test]
fn advance_timer_flips_to_next_measure_at_the_edge() {
    let mut harness = Harness::new();
    harness.reset(3, true);

    harness.run_for(Duration::from_millis(5_999));
    assert_eq!(harness.machine.phase(), RotationPhase::Waiting);

    harness.run_for(Duration::from_millis(1));
    assert_eq!(harness.machine.phase(), RotationPhase::Flipping);
    assert_eq!(harness.machine.angle(), 1);
    assert_eq!(harness.machine.measure_index(), 0);

    // 89 frames take the angle from 1 to 90.
    harness.run_for(Duration::from_millis(445));
    assert_eq!(harness.machine.angle(), 90);
    assert_eq!(harness.machine.rotate_x_degrees(), -90.0);
    assert_eq!(harness.machine.measure_index(), 0);

    harness.run_for(Duration::from_millis(5));
    assert_eq!(harness.machine.measure_index(), 1);
    assert_eq!(harness.machine.angle(), -90);
    assert_eq!(harness.machine.rotate_x_degrees(), 90.0);
    assert_eq!(harness.measure_changes, 1);

    // 90 frames back to zero, one more to settle.
    harness.run_for(Duration::from_millis(450));
    assert_eq!(harness.machine.angle(), 0);
    assert_eq!(harness.machine.phase(), RotationPhase::Flipping);
    harness.run_for(Duration::from_millis(5));
    assert_eq!(harness.machine.phase(), RotationPhase::Waiting);
    assert!(harness.timers.is_armed(TimerKind::Advance));
    assert!(!harness.timers.is_armed(TimerKind::Frame));
}

#[test]
fn auto_rotation_wraps_around_all_measures() {
    let mut harness = Harness::new();
    harness.reset(3, true);

    let cycle = Duration::from_millis(6_000 + 905);
    harness.run_for(cycle * 3);
    assert_eq!(harness.measure_changes, 3);
    assert_eq!(harness.machine.measure_index(), 0);
    assert_eq!(harness.machine.phase(), RotationPhase::Waiting);
}

#[test]
fn single_measure_never_arms_a_timer() {
    let mut harness = Harness::new();
    let output = harness.reset(1, true);
    assert_eq!(armed_advance_interval(&output), None);
    assert_eq!(harness.machine.phase(), RotationPhase::Idle);

    let click = harness.send(RotationEvent::ManualAdvance);
    assert!(click.commands.is_empty());
    harness.run_for(Duration::from_secs(60));
    assert_eq!(harness.measure_changes, 0);
}

#[test]
fn disabled_animation_waits_for_clicks_and_settles_idle() {
    let mut harness = Harness::new();
    harness.reset(2, false);
    assert_eq!(harness.machine.phase(), RotationPhase::Idle);

    harness.run_for(Duration::from_secs(30));
    assert_eq!(harness.measure_changes, 0);

    let click = harness.send(RotationEvent::ManualAdvance);
    assert!(click.transform_changed);
    assert_eq!(harness.machine.phase(), RotationPhase::Flipping);
    harness.run_for(Duration::from_secs(1));
    assert_eq!(harness.machine.measure_index(), 1);
    assert_eq!(harness.machine.phase(), RotationPhase::Idle);
}

#[test]
fn click_cancels_pending_advance_and_is_ignored_mid_flip() {
    let mut harness = Harness::new();
    harness.reset(3, true);
    harness.run_for(Duration::from_secs(2));

    let click = harness.send(RotationEvent::ManualAdvance);
    assert!(click.commands.contains(&TimerCommand::Cancel {
        timer: TimerKind::Advance
    }));
    assert!(!harness.timers.is_armed(TimerKind::Advance));

    let second = harness.send(RotationEvent::ManualAdvance);
    assert_eq!(second, RotationOutput::default());
    assert_eq!(harness.machine.angle(), 1);
}

#[test]
fn stale_generation_is_dropped() {
    let mut harness = Harness::new();
    let first = harness.reset(3, true);
    let stale_generation = first
        .commands
        .iter()
        .find_map(|command| match command {
            TimerCommand::Arm { generation, .. } => Some(*generation),
            TimerCommand::Cancel { .. } => None,
        })
        .expect("advance armed");
    harness.reset(3, true);

    let output = harness.send(RotationEvent::Timer(TimerFired {
        timer: TimerKind::Advance,
        generation: stale_generation,
    }));
    assert_eq!(output, RotationOutput::default());
    assert_eq!(harness.machine.phase(), RotationPhase::Waiting);
    assert_eq!(harness.machine.angle(), 0);
}

#[test]
fn cancel_mid_flip_settles_unrotated_and_keeps_measure() {
    let mut harness = Harness::new();
    harness.reset(3, false);
    harness.send(RotationEvent::ManualAdvance);
    harness.run_for(Duration::from_millis(600));
    assert_eq!(harness.machine.measure_index(), 1);
    assert!(harness.machine.angle() < 0);

    let output = harness.send(RotationEvent::Cancel);
    assert!(output.transform_changed);
    assert_eq!(harness.machine.angle(), 0);
    assert_eq!(harness.machine.phase(), RotationPhase::Idle);
    assert_eq!(harness.machine.measure_index(), 1);
    assert!(!harness.timers.is_armed(TimerKind::Frame));

    harness.run_for(Duration::from_secs(10));
    assert_eq!(harness.machine.measure_index(), 1);
}

#[test]
fn reset_keeps_index_in_range_and_wraps_otherwise() {
    let mut harness = Harness::new();
    harness.reset(3, false);
    for _ in 0..2 {
        harness.send(RotationEvent::ManualAdvance);
        harness.run_for(Duration::from_secs(1));
    }
    assert_eq!(harness.machine.measure_index(), 2);

    harness.reset(3, false);
    assert_eq!(harness.machine.measure_index(), 2);
    harness.reset(2, false);
    assert_eq!(harness.machine.measure_index(), 0);
}

#[test]
fn advance_interval_is_clamped_to_allowed_delay() {
    let mut harness = Harness::new();
    let output = harness.send(RotationEvent::Reset {
        measure_count: 2,
        animation: AnimationSettings {
            show: true,
            duration_seconds: 0.5,
        },
    });
    assert_eq!(armed_advance_interval(&output), Some(Duration::from_secs(2)));

    let output = harness.send(RotationEvent::Reset {
        measure_count: 2,
        animation: AnimationSettings {
            show: true,
            duration_seconds: f64::NAN,
        },
    });
    assert_eq!(armed_advance_interval(&output), Some(Duration::from_secs(6)));
}

proptest! {
    #[test]
    fn measure_index_cycles_modulo_count(measure_count in 2usize..7, flips in 0usize..15) {
        let mut harness = Harness::new();
        harness.reset(measure_count, false);
        for _ in 0..flips {
            harness.send(RotationEvent::ManualAdvance);
            harness.run_for(Duration::from_secs(1));
            prop_assert_eq!(harness.machine.phase(), RotationPhase::Idle);
        }
        prop_assert_eq!(harness.machine.measure_index(), flips % measure_count);
        prop_assert_eq!(harness.measure_changes, flips);
    }
}
