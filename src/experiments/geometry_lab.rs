//! Geometry Lab: nested rotating rings whose count grows with clicks.
//!
//! Rotation grows by 3° per 16ms tick. Each click adds a ring, up to 8, and
//! restarts a 2000ms countdown that drops the count back to 3. Only the
//! latest click's countdown is ever pending.

use std::time::Duration;

use crate::config::LabConfig;
use crate::experiment::{Behavior, Context, Experiment, ExperimentKind, Mounted};
use crate::input::{InputDelta, InputField};
use crate::timer::TimerHandle;
use crate::visuals::{wrap_angle, GeometryRingView, GeometryView, Hsla, OrbView, VisualState};

pub const MIN_COMPLEXITY: u32 = 3;
pub const MAX_COMPLEXITY: u32 = 8;
pub const DECAY_DELAY: Duration = Duration::from_millis(2000);

const CADENCE: Duration = Duration::from_millis(16);
const ROTATION_STEP: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryEvent {
    Decay,
}

#[derive(Debug)]
pub struct GeometryLab {
    /// Accumulated degrees. Kept in `f64` so steps still register after hours of play.
    rotation: f64,
    complexity: u32,
    decay: Option<TimerHandle>,
}

impl GeometryLab {
    pub fn new(_config: &LabConfig) -> Self {
        Self {
            rotation: 0.0,
            complexity: MIN_COMPLEXITY,
            decay: None,
        }
    }

    /// Registry constructor.
    pub fn mount(config: &LabConfig, input: &InputField, now: Duration) -> Box<dyn Experiment> {
        Box::new(Mounted::new(Self::new(config), input, now))
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn complexity(&self) -> u32 {
        self.complexity
    }
}

impl Behavior for GeometryLab {
    type Event = GeometryEvent;
    const KIND: ExperimentKind = ExperimentKind::GeometryLab;

    fn cadence(&self) -> Duration {
        CADENCE
    }

    fn on_tick(&mut self, _cx: &mut Context<'_, GeometryEvent>) {
        self.rotation += ROTATION_STEP;
    }

    fn on_input(&mut self, delta: InputDelta, cx: &mut Context<'_, GeometryEvent>) {
        if delta.clicks == 0 {
            return;
        }
        let added = delta.clicks.min(u64::from(MAX_COMPLEXITY)) as u32;
        self.complexity = (self.complexity + added).min(MAX_COMPLEXITY);

        if let Some(previous) = self.decay.take() {
            cx.timers.cancel(previous);
        }
        self.decay = Some(cx.timers.schedule(cx.now, DECAY_DELAY, GeometryEvent::Decay));
    }

    fn on_timer(&mut self, event: GeometryEvent, _cx: &mut Context<'_, GeometryEvent>) {
        match event {
            GeometryEvent::Decay => {
                self.decay = None;
                self.complexity = MIN_COMPLEXITY;
                log::debug!("geometry complexity decayed");
            }
        }
    }

    fn view(&self, _now: Duration) -> VisualState {
        let r = self.rotation;
        let rings = (0..self.complexity)
            .map(|i| {
                let fi = i as f32;
                GeometryRingView {
                    inset: fi * 20.0,
                    rotation: wrap_angle(r * (1.0 + f64::from(fi) * 0.3)),
                    color: Hsla::new(wrap_angle(r + f64::from(fi) * 60.0), 0.8, 0.6),
                    stroke: 4.0 - fi * 0.3,
                    blur: fi * 0.5,
                    glow: 20.0 + fi * 5.0,
                }
            })
            .collect();

        VisualState::GeometryLab(GeometryView {
            rotation: wrap_angle(r),
            complexity: self.complexity,
            rings,
            core: OrbView {
                scale: (1.0 + (r * 0.05).sin() * 0.3) as f32,
                rotation: wrap_angle(r * 2.0),
            },
        })
    }
}
