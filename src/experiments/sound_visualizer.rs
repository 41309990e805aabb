//! Sound Visualizer: twenty bars pumping to a fake beat.
//!
//! Every 100ms tick each bar is recomputed from a wall-time sine plus noise,
//! and an independent 30% coin decides whether this step is a beat. Nothing
//! else persists between ticks.

use std::time::Duration;

use rand::Rng;

use crate::config::LabConfig;
use crate::experiment::{Behavior, Context, Experiment, ExperimentKind, Mounted};
use crate::input::InputField;
use crate::visuals::{BarView, Hsla, SoundView, VisualState};

pub const BAR_COUNT: usize = 20;
pub const MIN_HEIGHT: f32 = 10.0;
pub const MAX_HEIGHT: f32 = 140.0;

const CADENCE: Duration = Duration::from_millis(100);
const BEAT_PROBABILITY: f64 = 0.3;
const NOISE: f32 = 60.0;

/// Height of bar `index` at `wall_ms` given a noise sample in `[0, 60)`.
pub fn bar_height(wall_ms: f64, index: usize, noise: f32) -> f32 {
    let base = ((wall_ms * 0.01 + index as f64 * 0.5).sin() * 50.0 + 50.0) as f32;
    (base + noise).clamp(MIN_HEIGHT, MAX_HEIGHT)
}

#[derive(Debug)]
pub struct SoundVisualizer {
    bars: [f32; BAR_COUNT],
    beat: bool,
}

impl SoundVisualizer {
    pub fn new(_config: &LabConfig) -> Self {
        Self {
            bars: [MIN_HEIGHT; BAR_COUNT],
            beat: false,
        }
    }

    /// Registry constructor.
    pub fn mount(config: &LabConfig, input: &InputField, now: Duration) -> Box<dyn Experiment> {
        Box::new(Mounted::new(Self::new(config), input, now))
    }

    pub fn bars(&self) -> &[f32; BAR_COUNT] {
        &self.bars
    }

    pub fn beat(&self) -> bool {
        self.beat
    }
}

impl Behavior for SoundVisualizer {
    type Event = ();
    const KIND: ExperimentKind = ExperimentKind::SoundVisualizer;

    fn cadence(&self) -> Duration {
        CADENCE
    }

    fn on_tick(&mut self, cx: &mut Context<'_, ()>) {
        let mut rng = rand::thread_rng();
        let wall_ms = cx.now.as_secs_f64() * 1000.0;
        for (i, bar) in self.bars.iter_mut().enumerate() {
            *bar = bar_height(wall_ms, i, rng.gen_range(0.0..NOISE));
        }
        self.beat = rng.gen_bool(BEAT_PROBABILITY);
    }

    fn view(&self, _now: Duration) -> VisualState {
        let bars = self
            .bars
            .iter()
            .enumerate()
            .map(|(i, height)| {
                let hue = i as f32 * 18.0;
                BarView {
                    height: *height,
                    display_height: height + 30.0,
                    gradient: [
                        Hsla::new(hue, 0.8, 0.5),
                        Hsla::new(hue + 60.0, 0.8, 0.7),
                        Hsla::new(hue + 120.0, 0.8, 0.9),
                    ],
                    scale_y: if self.beat && i % 3 == 0 { 1.3 } else { 1.0 },
                }
            })
            .collect();

        VisualState::SoundVisualizer(SoundView {
            beat: self.beat,
            scale: if self.beat { 1.1 } else { 1.0 },
            bars,
        })
    }
}
