//! Interactive Particles: twenty particles drawn towards the pointer.
//!
//! Particles live in a 400×300 toroidal frame. The pointer is compared
//! against particle positions shifted by a fixed (200, 200), so the frame
//! origin sits at pointer coordinate (200, 200).
//!
//! Per 16ms tick, for every particle:
//!
//! 1. Within 200px of the pointer, add an impulse along the unit vector
//!    towards it: `(200 - d) / 200 * 0.8 * 0.15`.
//! 2. Integrate position by the new velocity and wrap both axes.
//! 3. Damp the stored velocity by 0.99.
//! 4. Advance the hue by 2°.
//! 5. Push the new position onto the trail, keeping the newest 8.

use std::collections::VecDeque;
use std::time::Duration;

use glam::Vec2;
use rand::Rng;

use crate::config::LabConfig;
use crate::experiment::{Behavior, Context, Experiment, ExperimentKind, Mounted};
use crate::input::InputField;
use crate::visuals::{wrap_hue, Hsla, ParticleView, ParticlesView, TrailDot, VisualState};

/// Size of the toroidal frame.
pub const FRAME: Vec2 = Vec2::new(400.0, 300.0);
/// Offset between pointer coordinates and frame coordinates.
pub const POINTER_OFFSET: Vec2 = Vec2::splat(200.0);
pub const PARTICLE_COUNT: usize = 20;
pub const TRAIL_LENGTH: usize = 8;

const CADENCE: Duration = Duration::from_millis(16);
const ATTRACTION_RADIUS: f32 = 200.0;
const ATTRACTION_STRENGTH: f32 = 0.8;
const IMPULSE_SCALE: f32 = 0.15;
const DAMPING: f32 = 0.99;
const HUE_STEP: f32 = 2.0;
/// Below this distance the direction to the pointer is undefined.
const MIN_DISTANCE: f32 = 1e-6;

/// Wrap a coordinate into `[0, size)`.
#[inline]
pub fn wrap(value: f32, size: f32) -> f32 {
    let v = value.rem_euclid(size);
    if v >= size || !v.is_finite() {
        0.0
    } else {
        v
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: usize,
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub hue: f32,
    trail: VecDeque<Vec2>,
}

impl Particle {
    pub fn new(id: usize, position: Vec2, velocity: Vec2, size: f32, hue: f32) -> Self {
        Self {
            id,
            position: Vec2::new(wrap(position.x, FRAME.x), wrap(position.y, FRAME.y)),
            velocity,
            size,
            hue: wrap_hue(hue),
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Uniformly random particle inside the frame.
    pub fn random(id: usize, rng: &mut impl Rng) -> Self {
        Self::new(
            id,
            Vec2::new(rng.gen_range(0.0..FRAME.x), rng.gen_range(0.0..FRAME.y)),
            Vec2::new(rng.gen_range(-1.5..1.5), rng.gen_range(-1.5..1.5)),
            rng.gen_range(4.0..12.0),
            rng.gen_range(0.0..360.0),
        )
    }

    /// Recent positions, oldest first.
    pub fn trail(&self) -> &VecDeque<Vec2> {
        &self.trail
    }

    /// Attraction impulse towards `target` (frame coordinates).
    pub fn attraction(&self, target: Vec2) -> Vec2 {
        let offset = target - self.position;
        let distance = offset.length();
        if !(MIN_DISTANCE..ATTRACTION_RADIUS).contains(&distance) {
            return Vec2::ZERO;
        }
        let force = (ATTRACTION_RADIUS - distance) / ATTRACTION_RADIUS * ATTRACTION_STRENGTH;
        offset / distance * force * IMPULSE_SCALE
    }

    /// Advance one tick towards `target` (frame coordinates).
    pub fn step(&mut self, target: Vec2) {
        let mut velocity = self.velocity + self.attraction(target);
        if !velocity.is_finite() {
            velocity = Vec2::ZERO;
        }

        let moved = self.position + velocity;
        self.position = Vec2::new(wrap(moved.x, FRAME.x), wrap(moved.y, FRAME.y));
        self.velocity = velocity * DAMPING;
        self.hue = wrap_hue(self.hue + HUE_STEP);

        self.trail.push_back(self.position);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    fn view(&self) -> ParticleView {
        let color = Hsla::new(self.hue, 0.7, 0.6);
        let len = self.trail.len() as f32;
        let trail = self
            .trail
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let t = i as f32 / len;
                TrailDot {
                    position: *point,
                    size: self.size * t,
                    alpha: t * 0.5,
                }
            })
            .collect();

        ParticleView {
            id: self.id,
            position: self.position,
            size: self.size,
            color,
            glow: self.size * 3.0,
            trail,
        }
    }
}

#[derive(Debug)]
pub struct InteractiveParticles {
    particles: Vec<Particle>,
}

impl InteractiveParticles {
    /// Seed twenty random particles.
    pub fn new(_config: &LabConfig) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            particles: (0..PARTICLE_COUNT).map(|i| Particle::random(i, &mut rng)).collect(),
        }
    }

    /// Start from explicit particles instead of a random seed.
    pub fn with_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    /// Registry constructor.
    pub fn mount(config: &LabConfig, input: &InputField, now: Duration) -> Box<dyn Experiment> {
        Box::new(Mounted::new(Self::new(config), input, now))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Pointer position expressed in frame coordinates.
    pub fn frame_target(pointer: Vec2) -> Vec2 {
        pointer - POINTER_OFFSET
    }
}

impl Behavior for InteractiveParticles {
    type Event = ();
    const KIND: ExperimentKind = ExperimentKind::InteractiveParticles;

    fn cadence(&self) -> Duration {
        CADENCE
    }

    fn on_tick(&mut self, cx: &mut Context<'_, ()>) {
        let target = Self::frame_target(cx.input.pointer());
        for particle in &mut self.particles {
            particle.step(target);
        }
    }

    fn view(&self, _now: Duration) -> VisualState {
        VisualState::InteractiveParticles(ParticlesView {
            frame: FRAME,
            particles: self.particles.iter().map(Particle::view).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still(position: Vec2) -> Particle {
        Particle::new(0, position, Vec2::ZERO, 8.0, 0.0)
    }

    #[test]
    fn test_seeding_ranges() {
        let exp = InteractiveParticles::new(&LabConfig::default());
        assert_eq!(exp.particles().len(), PARTICLE_COUNT);
        for p in exp.particles() {
            assert!((0.0..400.0).contains(&p.position.x));
            assert!((0.0..300.0).contains(&p.position.y));
            assert!(p.velocity.x.abs() <= 1.5 && p.velocity.y.abs() <= 1.5);
            assert!((4.0..12.0).contains(&p.size));
            assert!((0.0..360.0).contains(&p.hue));
            assert!(p.trail().is_empty());
        }
    }

    #[test]
    fn test_wrap_at_boundary() {
        let mut p = Particle::new(0, Vec2::new(399.5, 10.0), Vec2::new(2.0, 0.0), 8.0, 0.0);
        // Pointer far away: no attraction
        p.step(Vec2::new(-10_000.0, -10_000.0));
        assert!((p.position.x - 1.5).abs() < 1e-4);

        let mut q = Particle::new(0, Vec2::new(0.5, 0.5), Vec2::new(-2.0, -2.0), 8.0, 0.0);
        q.step(Vec2::new(-10_000.0, -10_000.0));
        assert!((q.position.x - 398.5).abs() < 1e-4);
        assert!((q.position.y - 298.5).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_edge_cases() {
        assert_eq!(wrap(400.0, 400.0), 0.0);
        assert_eq!(wrap(-1e-9, 400.0), 0.0);
        assert_eq!(wrap(-1.0, 400.0), 399.0);
        assert_eq!(wrap(f32::NAN, 400.0), 0.0);
    }

    #[test]
    fn test_attraction_points_at_target() {
        let p = still(Vec2::new(150.0, 150.0));
        let impulse = p.attraction(Vec2::new(100.0, 100.0));
        assert!(impulse.x < 0.0 && impulse.y < 0.0);
        assert!((impulse.x - impulse.y).abs() < 1e-6);

        let d = 50.0 * std::f32::consts::SQRT_2;
        let expected = (200.0 - d) / 200.0 * 0.8 * 0.15;
        assert!((impulse.length() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_no_attraction_out_of_range() {
        let p = still(Vec2::new(0.0, 0.0));
        assert_eq!(p.attraction(Vec2::new(200.0, 0.0)), Vec2::ZERO);
        assert_ne!(p.attraction(Vec2::new(199.0, 0.0)), Vec2::ZERO);
    }

    #[test]
    fn test_zero_distance_is_guarded() {
        let mut p = still(Vec2::new(100.0, 100.0));
        assert_eq!(p.attraction(Vec2::new(100.0, 100.0)), Vec2::ZERO);
        p.step(Vec2::new(100.0, 100.0));
        assert!(p.position.is_finite());
        assert!(p.velocity.is_finite());
        assert_eq!(p.position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_damping_and_hue() {
        let mut p = Particle::new(0, Vec2::new(10.0, 10.0), Vec2::new(1.0, 0.0), 8.0, 359.0);
        p.step(Vec2::new(-10_000.0, -10_000.0));
        assert!((p.position.x - 11.0).abs() < 1e-5);
        assert!((p.velocity.x - 0.99).abs() < 1e-6);
        assert!((p.hue - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_trail_is_bounded_fifo() {
        let mut p = Particle::new(0, Vec2::new(10.0, 10.0), Vec2::new(1.0, 0.0), 8.0, 0.0);
        let far = Vec2::new(-10_000.0, -10_000.0);
        for tick in 1..=20usize {
            p.step(far);
            assert_eq!(p.trail().len(), tick.min(TRAIL_LENGTH));
            assert_eq!(*p.trail().back().unwrap(), p.position);
        }
        // Oldest first
        let xs: Vec<f32> = p.trail().iter().map(|v| v.x).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ticks_use_pointer_offset() {
        let mut input = InputField::new();
        input.set_pointer(300.0, 300.0);
        let particles = InteractiveParticles::with_particles(vec![still(Vec2::new(150.0, 150.0))]);
        let mut exp = Mounted::new(particles, &input, Duration::ZERO);
        exp.start();
        exp.advance(Duration::from_millis(16), &input);

        let p = &exp.behavior().particles()[0];
        // Pointer (300, 300) is (100, 100) in frame coordinates
        assert!(p.velocity.x < 0.0 && p.velocity.y < 0.0);
        assert!(p.position.x < 150.0 && p.position.y < 150.0);
    }

    #[test]
    fn test_trail_view_fades_towards_oldest() {
        let mut p = Particle::new(0, Vec2::new(10.0, 10.0), Vec2::new(1.0, 0.0), 8.0, 0.0);
        for _ in 0..4 {
            p.step(Vec2::new(-10_000.0, -10_000.0));
        }
        let view = p.view();
        assert_eq!(view.trail.len(), 4);
        assert_eq!(view.trail[0].size, 0.0);
        assert_eq!(view.trail[0].alpha, 0.0);
        assert_eq!(view.trail[2].size, 4.0);
        assert_eq!(view.trail[2].alpha, 0.25);
        assert_eq!(view.glow, 24.0);
    }
}
