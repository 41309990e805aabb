//! Motion Studies: eight concentric rings spinning around a pulsing orb.
//!
//! A phase accumulator grows by 0.15 per 16ms tick. Ring rotation speed is
//! scaled by `magnetism`, which is resampled from a wall-time oscillation
//! every time the pointer moves, not on a timer.

use std::time::Duration;

use crate::config::LabConfig;
use crate::experiment::{Behavior, Context, Experiment, ExperimentKind, Mounted};
use crate::input::{InputDelta, InputField};
use crate::visuals::{wrap_angle, Hsla, MotionStudiesView, OrbView, RingView, VisualState};

const RINGS: usize = 8;
const PHASE_STEP: f64 = 0.15;
const CADENCE: Duration = Duration::from_millis(16);

/// Magnetism at a given wall time in milliseconds. Always within `[0.5, 1.5]`.
pub fn magnetism_at(wall_ms: f64) -> f32 {
    (1.0 + (wall_ms * 0.005).sin() * 0.5) as f32
}

#[derive(Debug)]
pub struct MotionStudies {
    /// Phase accumulator. `f64` keeps `sin(time + i)` smooth over long sessions.
    time: f64,
    magnetism: f32,
}

impl MotionStudies {
    pub fn new(_config: &LabConfig) -> Self {
        Self {
            time: 0.0,
            magnetism: 1.0,
        }
    }

    /// Registry constructor.
    pub fn mount(config: &LabConfig, input: &InputField, now: Duration) -> Box<dyn Experiment> {
        Box::new(Mounted::new(Self::new(config), input, now))
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn magnetism(&self) -> f32 {
        self.magnetism
    }
}

impl Behavior for MotionStudies {
    type Event = ();
    const KIND: ExperimentKind = ExperimentKind::MotionStudies;

    fn cadence(&self) -> Duration {
        CADENCE
    }

    fn on_tick(&mut self, _cx: &mut Context<'_, ()>) {
        self.time += PHASE_STEP;
    }

    fn on_input(&mut self, delta: InputDelta, cx: &mut Context<'_, ()>) {
        if delta.pointer_moved {
            self.magnetism = magnetism_at(cx.now.as_secs_f64() * 1000.0);
        }
    }

    fn view(&self, _now: Duration) -> VisualState {
        let t = self.time;
        let magnetism = f64::from(self.magnetism);
        let rings = (0..RINGS)
            .map(|i| {
                let fi = i as f32;
                let wave = (t + f64::from(fi)).sin() as f32;
                RingView {
                    diameter: 60.0 + fi * 30.0,
                    opacity: 0.8 - fi * 0.08,
                    rotation: wrap_angle(t * (20.0 + f64::from(fi) * 8.0) * magnetism),
                    scale: 1.0 + wave * 0.3,
                    color: Hsla::new(wrap_angle(t * 30.0 + f64::from(fi) * 45.0), 0.8, 0.6),
                    stroke: (2.0 + wave * 2.0).max(0.0),
                    blur: (wave * 2.0).max(0.0),
                }
            })
            .collect();

        VisualState::MotionStudies(MotionStudiesView {
            time: t as f32,
            magnetism: self.magnetism,
            rings,
            core: OrbView {
                scale: (1.0 + (t * 3.0).sin() * 0.4) as f32,
                rotation: wrap_angle(t * 50.0),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_phase_accumulates_per_tick() {
        let input = InputField::new();
        let mut exp = Mounted::new(MotionStudies::new(&LabConfig::default()), &input, Duration::ZERO);
        exp.start();
        exp.advance(ms(160), &input);
        assert!((exp.behavior().time() - 1.5).abs() < 1e-4);

        exp.stop();
        exp.advance(ms(1000), &input);
        assert!((exp.behavior().time() - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_magnetism_follows_pointer_moves_even_when_paused() {
        let mut input = InputField::new();
        let mut exp = Mounted::new(MotionStudies::new(&LabConfig::default()), &input, ms(0));
        exp.advance(ms(300), &input);
        assert_eq!(exp.behavior().magnetism(), 1.0);

        // Observed at 300ms
        input.set_pointer(10.0, 10.0);
        exp.advance(ms(316), &input);
        assert!((exp.behavior().magnetism() - magnetism_at(300.0)).abs() < 1e-6);

        // No move, no resample
        exp.advance(ms(900), &input);
        assert!((exp.behavior().magnetism() - magnetism_at(300.0)).abs() < 1e-6);
    }

    #[test]
    fn test_magnetism_range() {
        for step in 0..2000 {
            let m = magnetism_at(step as f64 * 7.3);
            assert!((0.5..=1.5).contains(&m));
        }
    }

    #[test]
    fn test_ring_view() {
        let input = InputField::new();
        let exp = Mounted::new(MotionStudies::new(&LabConfig::default()), &input, Duration::ZERO);
        let VisualState::MotionStudies(view) = exp.snapshot() else {
            panic!("wrong variant");
        };
        assert_eq!(view.rings.len(), 8);
        assert_eq!(view.rings[0].diameter, 60.0);
        assert_eq!(view.rings[7].diameter, 270.0);
        assert!((view.rings[7].opacity - 0.24).abs() < 1e-6);
        assert!(view.rings.iter().all(|r| r.stroke >= 0.0 && r.blur >= 0.0));
    }

    #[test]
    fn test_ring_rotation_follows_magnetism() {
        let mut input = InputField::new();
        let mut exp = Mounted::new(MotionStudies::new(&LabConfig::default()), &input, ms(0));
        exp.start();
        exp.advance(ms(300), &input);

        // Move observed at 300ms, then ten more ticks
        input.set_pointer(42.0, 24.0);
        exp.advance(ms(480), &input);
        let magnetism = magnetism_at(300.0);
        assert_eq!(exp.behavior().magnetism(), magnetism);
        let time = exp.behavior().time();
        assert!((time - 30.0 * 0.15).abs() < 1e-9);

        let VisualState::MotionStudies(view) = exp.snapshot() else {
            panic!("wrong variant");
        };
        for (i, ring) in view.rings.iter().enumerate() {
            let expected = (time * (20.0 + i as f64 * 8.0) * f64::from(magnetism)).rem_euclid(360.0);
            assert!((f64::from(ring.rotation) - expected).abs() < 1e-3, "ring {}", i);
        }
    }

    #[test]
    fn test_phase_keeps_precision_when_large() {
        let input = InputField::new();
        let mut exp = Mounted::new(MotionStudies::new(&LabConfig::default()), &input, Duration::ZERO);
        exp.behavior_mut().time = 1.0e6;
        exp.start();
        exp.advance(ms(16), &input);
        assert!((exp.behavior().time() - (1.0e6 + 0.15)).abs() < 1e-9);
    }
}
