//! The experiment abstraction.
//!
//! An experiment is one procedural animation with private, evolving state.
//! Variants implement [`Behavior`]: what happens on a clock tick, on new input
//! and when one of their timers fires. [`Mounted`] wraps a behavior with the
//! machinery every variant shares (its [`Clock`], its [`Timers`] queue and an
//! [`InputCursor`]) and exposes the object-safe [`Experiment`] interface the
//! controller drives.
//!
//! Within one [`Experiment::advance`] call, input is handled first (stamped at
//! the previous time), then ticks and timers fire in chronological order.
//! A timer and a tick due at the same instant fire timer first. Every handler
//! runs to completion before the next one starts.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::config::LabConfig;
use crate::input::{InputCursor, InputDelta, InputField};
use crate::time::Clock;
use crate::timer::Timers;
use crate::visuals::VisualState;

/// Tag for the six experiment variants, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExperimentKind {
    ColorHarmonics,
    MotionStudies,
    TypographyLab,
    InteractiveParticles,
    SoundVisualizer,
    GeometryLab,
}

impl ExperimentKind {
    pub const ALL: [ExperimentKind; 6] = [
        ExperimentKind::ColorHarmonics,
        ExperimentKind::MotionStudies,
        ExperimentKind::TypographyLab,
        ExperimentKind::InteractiveParticles,
        ExperimentKind::SoundVisualizer,
        ExperimentKind::GeometryLab,
    ];

    /// Human-readable name shown by hosts.
    pub fn name(self) -> &'static str {
        match self {
            ExperimentKind::ColorHarmonics => "Color Harmonics",
            ExperimentKind::MotionStudies => "Motion Studies",
            ExperimentKind::TypographyLab => "Typography Lab",
            ExperimentKind::InteractiveParticles => "Interactive Particles",
            ExperimentKind::SoundVisualizer => "Sound Visualizer",
            ExperimentKind::GeometryLab => "Geometry Lab",
        }
    }
}

impl fmt::Display for ExperimentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Experiment-local user selections forwarded by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pick one of the Color Harmonics patterns (0..3).
    SelectPattern(usize),
    /// Jump straight to one of the Typography Lab words (0..8).
    SelectText(usize),
}

/// Handler context: the current instant, the shared input and the instance's timers.
pub struct Context<'a, E> {
    pub now: Duration,
    pub input: &'a InputField,
    pub timers: &'a mut Timers<E>,
}

/// Per-variant behavior.
///
/// Implementors only describe state transitions; scheduling is handled by
/// [`Mounted`].
pub trait Behavior {
    /// Payload carried by this variant's one-shot timers.
    type Event;

    const KIND: ExperimentKind;

    /// Tick interval of this variant's clock.
    fn cadence(&self) -> Duration;

    /// One clock tick. Only called while playing.
    fn on_tick(&mut self, cx: &mut Context<'_, Self::Event>);

    /// New clicks or pointer movement. Called regardless of play state.
    fn on_input(&mut self, _delta: InputDelta, _cx: &mut Context<'_, Self::Event>) {}

    /// A timer scheduled by this instance fired.
    fn on_timer(&mut self, _event: Self::Event, _cx: &mut Context<'_, Self::Event>) {}

    /// A host command. Returns `false` if the command does not apply.
    fn on_command(&mut self, _command: Command, _cx: &mut Context<'_, Self::Event>) -> bool {
        false
    }

    /// Describe the current state for rendering.
    fn view(&self, now: Duration) -> VisualState;
}

/// Object-safe interface the controller drives.
pub trait Experiment {
    fn kind(&self) -> ExperimentKind;

    /// Observe input, then run every tick and timer due up to `now`.
    fn advance(&mut self, now: Duration, input: &InputField);

    /// Start the clock at the instance's current time.
    fn start(&mut self);

    /// Stop the clock. Pending timers keep their deadlines.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Number of one-shot timers still pending.
    fn pending_timers(&self) -> usize;

    /// Apply a host command at the instance's current time.
    fn command(&mut self, command: Command, input: &InputField) -> bool;

    fn snapshot(&self) -> VisualState;
}

/// A behavior mounted with its own clock, timers and input cursor.
pub struct Mounted<B: Behavior> {
    behavior: B,
    clock: Clock,
    timers: Timers<B::Event>,
    cursor: InputCursor,
    now: Duration,
}

impl<B: Behavior> Mounted<B> {
    /// Mount `behavior` at `now`, baselining the input so earlier clicks never fire.
    pub fn new(behavior: B, input: &InputField, now: Duration) -> Self {
        let clock = Clock::new(behavior.cadence());
        Self {
            behavior,
            clock,
            timers: Timers::new(),
            cursor: InputCursor::new(input),
            now,
        }
    }

    /// Borrow the behavior state.
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }

    /// The instance's current time.
    pub fn now(&self) -> Duration {
        self.now
    }
}

impl<B: Behavior> Experiment for Mounted<B> {
    fn kind(&self) -> ExperimentKind {
        B::KIND
    }

    fn advance(&mut self, now: Duration, input: &InputField) {
        let delta = self.cursor.observe(input);
        if delta != InputDelta::default() {
            let mut cx = Context {
                now: self.now,
                input,
                timers: &mut self.timers,
            };
            self.behavior.on_input(delta, &mut cx);
        }

        loop {
            let tick = self.clock.next_due().filter(|t| *t <= now);
            let timer = self.timers.next_due().filter(|t| *t <= now);
            let timer_first = match (timer, tick) {
                (Some(t), Some(k)) => t <= k,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };

            if timer_first {
                if let Some((at, event)) = self.timers.pop_due(now) {
                    self.now = self.now.max(at);
                    let mut cx = Context {
                        now: at,
                        input,
                        timers: &mut self.timers,
                    };
                    self.behavior.on_timer(event, &mut cx);
                }
            } else if let Some(at) = self.clock.fire(now) {
                self.now = self.now.max(at);
                let mut cx = Context {
                    now: at,
                    input,
                    timers: &mut self.timers,
                };
                self.behavior.on_tick(&mut cx);
            }
        }

        self.now = self.now.max(now);
    }

    fn start(&mut self) {
        self.clock.start(self.now);
    }

    fn stop(&mut self) {
        self.clock.stop();
    }

    fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn command(&mut self, command: Command, input: &InputField) -> bool {
        let mut cx = Context {
            now: self.now,
            input,
            timers: &mut self.timers,
        };
        self.behavior.on_command(command, &mut cx)
    }

    fn snapshot(&self) -> VisualState {
        self.behavior.view(self.now)
    }
}

/// Constructor signature stored in the registry.
pub type Constructor = fn(&LabConfig, &InputField, Duration) -> Box<dyn Experiment>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visuals::{GeometryView, OrbView};

    /// Records the order in which handlers ran.
    #[derive(Default)]
    struct Probe {
        log: Vec<(&'static str, u64)>,
    }

    impl Behavior for Probe {
        type Event = ();
        const KIND: ExperimentKind = ExperimentKind::GeometryLab;

        fn cadence(&self) -> Duration {
            Duration::from_millis(100)
        }

        fn on_tick(&mut self, cx: &mut Context<'_, ()>) {
            self.log.push(("tick", cx.now.as_millis() as u64));
        }

        fn on_input(&mut self, delta: InputDelta, cx: &mut Context<'_, ()>) {
            for _ in 0..delta.clicks {
                cx.timers.schedule(cx.now, Duration::from_millis(100), ());
            }
            self.log.push(("input", cx.now.as_millis() as u64));
        }

        fn on_timer(&mut self, _event: (), cx: &mut Context<'_, ()>) {
            self.log.push(("timer", cx.now.as_millis() as u64));
        }

        fn view(&self, _now: Duration) -> VisualState {
            VisualState::GeometryLab(GeometryView {
                rotation: 0.0,
                complexity: 3,
                rings: Vec::new(),
                core: OrbView { scale: 1.0, rotation: 0.0 },
            })
        }
    }

    #[test]
    fn test_events_fire_in_time_order() {
        let mut input = InputField::new();
        let mut exp = Mounted::new(Probe::default(), &input, Duration::ZERO);
        exp.start();

        input.register_click();
        exp.advance(Duration::from_millis(250), &input);

        assert_eq!(
            exp.behavior().log,
            vec![("input", 0), ("timer", 100), ("tick", 100), ("tick", 200)]
        );
        assert_eq!(exp.now(), Duration::from_millis(250));
    }

    #[test]
    fn test_stopped_clock_still_runs_timers() {
        let mut input = InputField::new();
        let mut exp = Mounted::new(Probe::default(), &input, Duration::ZERO);

        input.register_click();
        exp.advance(Duration::from_millis(500), &input);

        assert!(!exp.is_running());
        assert_eq!(exp.behavior().log, vec![("input", 0), ("timer", 100)]);
        assert_eq!(exp.pending_timers(), 0);
    }

    #[test]
    fn test_time_never_runs_backwards() {
        let input = InputField::new();
        let mut exp = Mounted::new(Probe::default(), &input, Duration::from_millis(300));
        exp.advance(Duration::from_millis(100), &input);
        assert_eq!(exp.now(), Duration::from_millis(300));
    }
}
